use std::collections::{BTreeMap, HashSet};

use lopdf::content::Content;

use crate::PdfError;

/// A page identifier mirroring `lopdf::ObjectId`: (object number, generation number).
pub type PageId = (u32, u16);

/// Page height used when a page declares no usable MediaBox (US Letter).
pub const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// A font resource of a page: the `/F1`-style key, base font and encoding names.
#[derive(Debug, Clone)]
pub struct FontResource {
    pub key: Vec<u8>,
    pub base_font: Option<String>,
    pub encoding: Option<String>,
}

/// Operand values of a content-stream operation, detached from `lopdf`.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Dict(Vec<(Vec<u8>, PdfValue)>),
    Reference(PageId),
}

impl PdfValue {
    /// Numeric value of `Integer` and `Real` operands.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(f) => Some(*f),
            _ => None,
        }
    }
}

impl From<&lopdf::Object> for PdfValue {
    fn from(obj: &lopdf::Object) -> Self {
        match obj {
            lopdf::Object::Null => PdfValue::Null,
            lopdf::Object::Boolean(b) => PdfValue::Bool(*b),
            lopdf::Object::Integer(i) => PdfValue::Integer(*i),
            lopdf::Object::Real(f) => PdfValue::Real(*f),
            lopdf::Object::Name(n) => PdfValue::Name(n.clone()),
            lopdf::Object::String(s, _) => PdfValue::Str(s.clone()),
            lopdf::Object::Array(arr) => PdfValue::Array(arr.iter().map(PdfValue::from).collect()),
            lopdf::Object::Dictionary(dict) => PdfValue::Dict(
                dict.iter()
                    .map(|(k, v)| (k.clone(), PdfValue::from(v)))
                    .collect(),
            ),
            lopdf::Object::Stream(stream) => PdfValue::Dict(
                stream
                    .dict
                    .iter()
                    .map(|(k, v)| (k.clone(), PdfValue::from(v)))
                    .collect(),
            ),
            lopdf::Object::Reference(id) => PdfValue::Reference(*id),
        }
    }
}

/// One content-stream operator with its operands.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

/// Decode PDF string bytes: UTF-16BE with BOM, then UTF-8, then Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, payload @ ..] = bytes {
        let code_units: Vec<u16> = payload
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&code_units);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// What the text extractor needs from a parsed document.
///
/// The layout code only talks to this trait so it can be driven by
/// pre-decoded operations in tests.
pub trait PdfBackend {
    /// 1-based page number to page object id, in document order.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    fn page_fonts(&self, page: PageId) -> Result<Vec<FontResource>, PdfError>;

    fn page_operations(&self, page: PageId) -> Result<Vec<ContentOp>, PdfError>;

    /// Page height in points.
    fn page_height(&self, page: PageId) -> Result<f32, PdfError>;

    /// Decode the bytes of a text-showing operand in a font with `encoding`.
    fn decode_text(&self, encoding: Option<&str>, bytes: &[u8]) -> String;
}

/// [`PdfBackend`] over an in-memory [`lopdf::Document`].
pub struct LopdfBackend {
    doc: lopdf::Document,
}

impl LopdfBackend {
    pub fn load_bytes(data: &[u8]) -> Result<Self, PdfError> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(PdfError::Encrypted);
        }

        Ok(Self { doc })
    }

    /// Walk up the page tree until a MediaBox is found.
    ///
    /// A `/Parent` chain that revisits a node ends the walk with `None`.
    fn find_media_box(&self, page: PageId, dict: &lopdf::Dictionary) -> Option<Vec<lopdf::Object>> {
        let mut visited = HashSet::from([page]);
        let mut current = dict;

        loop {
            if let Some(arr) = current
                .get(b"MediaBox")
                .ok()
                .and_then(|obj| self.resolve_array(obj))
            {
                return Some(arr);
            }

            let parent_id = current.get(b"Parent").ok()?.as_reference().ok()?;
            if !visited.insert(parent_id) {
                log::debug!("page tree cycle at object {:?}", parent_id);
                return None;
            }
            current = self.doc.get_object(parent_id).ok()?.as_dict().ok()?;
        }
    }

    fn resolve_array(&self, obj: &lopdf::Object) -> Option<Vec<lopdf::Object>> {
        match obj {
            lopdf::Object::Array(arr) => Some(arr.clone()),
            lopdf::Object::Reference(id) => self
                .doc
                .get_object(*id)
                .ok()
                .and_then(|resolved| resolved.as_array().ok())
                .cloned(),
            _ => None,
        }
    }

    fn resolve_number(&self, obj: &lopdf::Object) -> Result<f32, PdfError> {
        let resolved = match obj {
            lopdf::Object::Reference(id) => self
                .doc
                .get_object(*id)
                .map_err(|e| PdfError::Parse(e.to_string()))?,
            other => other,
        };
        PdfValue::from(resolved)
            .as_number()
            .ok_or_else(|| PdfError::Parse(format!("expected number, got {:?}", resolved)))
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<FontResource>, PdfError> {
        let fonts = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page fonts: {}", e)))?;

        let name_of = |dict: &lopdf::Dictionary, key: &[u8]| {
            dict.get(key)
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).into_owned())
        };

        Ok(fonts
            .iter()
            .map(|(key, dict)| FontResource {
                key: key.clone(),
                base_font: name_of(dict, b"BaseFont"),
                encoding: name_of(dict, b"Encoding"),
            })
            .collect())
    }

    fn page_operations(&self, page: PageId) -> Result<Vec<ContentOp>, PdfError> {
        let data = self
            .doc
            .get_page_content(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page content: {}", e)))?;

        let content = Content::decode(&data)
            .map_err(|e| PdfError::Parse(format!("content stream decode error: {}", e)))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operands: op.operands.iter().map(PdfValue::from).collect(),
                operator: op.operator,
            })
            .collect())
    }

    /// `ury - lly` of the MediaBox, inherited through the page tree.
    fn page_height(&self, page: PageId) -> Result<f32, PdfError> {
        let page_dict = self
            .doc
            .get_object(page)
            .and_then(|obj| obj.as_dict())
            .map_err(|e| PdfError::Parse(format!("page object is not a dictionary: {}", e)))?;

        let media_box = self
            .find_media_box(page, page_dict)
            .ok_or_else(|| PdfError::Parse("MediaBox not found for page".into()))?;

        if media_box.len() < 4 {
            return Err(PdfError::Parse(format!(
                "MediaBox has {} elements, expected 4",
                media_box.len()
            )));
        }

        let lly = self.resolve_number(&media_box[1])?;
        let ury = self.resolve_number(&media_box[3])?;
        Ok(ury - lly)
    }

    fn decode_text(&self, encoding: Option<&str>, bytes: &[u8]) -> String {
        // Identity-H/V fonts carry 2-byte codes; try them as UTF-16BE first.
        let identity = encoding.is_some_and(|enc| enc.contains("Identity"));

        if identity && bytes.len() >= 2 && bytes.len().is_multiple_of(2) {
            let code_units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            let decoded = String::from_utf16_lossy(&code_units);
            if !decoded.chars().all(|c| c == '\u{FFFD}' || c == '\0') {
                return decoded;
            }
        }

        decode_text_simple(bytes)
    }
}
