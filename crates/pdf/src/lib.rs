//! PDF decoding into [`outline_core::Page`]s.
//!
//! Each page is reduced to the positioned text lines and styled words the
//! heading detector consumes. Embedded outlines and bookmarks are ignored.

use thiserror::Error;

use outline_core::Page;
use parser::backend::{LopdfBackend, PdfBackend, DEFAULT_PAGE_HEIGHT};

pub mod parser;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decode PDF bytes into pages, in document order.
pub fn decode(bytes: &[u8]) -> Result<Vec<Page>, PdfError> {
    let backend = LopdfBackend::load_bytes(bytes)?;
    decode_pages(&backend)
}

/// Decode every page a backend exposes.
pub fn decode_pages(backend: &dyn PdfBackend) -> Result<Vec<Page>, PdfError> {
    let page_map = backend.pages();
    let mut pages = Vec::with_capacity(page_map.len());

    for (&number, &page_id) in &page_map {
        let height = backend.page_height(page_id).unwrap_or_else(|e| {
            log::warn!("page {}: {}, assuming {}pt", number, e, DEFAULT_PAGE_HEIGHT);
            DEFAULT_PAGE_HEIGHT
        });

        let spans = parser::layout::extract_page_spans(backend, page_id)?;
        let page = parser::layout::build_page(spans, height);

        log::debug!(
            "page {}: {} line(s), {} word(s)",
            number,
            page.lines.len(),
            page.words.len()
        );
        pages.push(page);
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::backend::tests::{one_page_pdf, self_parented_page_pdf, show};

    #[test]
    fn decodes_lines_and_words() {
        let mut ops = show("F1", 24, 72, 700, "Hello World");
        ops.extend(show("F2", 12, 72, 670, "Body text here"));
        let bytes = one_page_pdf(Some([0, 0, 595, 842]), ops);

        let pages = decode(&bytes).unwrap();
        assert_eq!(pages.len(), 1);

        let page = &pages[0];
        assert_eq!(page.lines.len(), 2);

        let heading = &page.lines[0];
        assert_eq!(heading.text, "Hello World");
        assert_eq!(heading.top, 118.0);
        assert_eq!(heading.chars.len(), 10);
        assert_eq!(heading.chars[0].font_name, "Helvetica-Bold");
        assert_eq!(heading.chars[0].size, 24.0);

        let body = &page.lines[1];
        assert_eq!(body.text, "Body text here");
        assert_eq!(body.top, 160.0);

        let words: Vec<&str> = page.words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(words, vec!["Hello", "World", "Body", "text", "here"]);
        assert_eq!(page.words[2].font_name, "Times-Roman");
        assert_eq!(page.words[2].size, 12.0);
    }

    #[test]
    fn missing_media_box_falls_back_to_letter() {
        let bytes = one_page_pdf(None, show("F2", 10, 72, 700, "Line"));
        let pages = decode(&bytes).unwrap();
        assert_eq!(pages[0].lines[0].top, 82.0);
    }

    #[test]
    fn parent_cycle_falls_back_to_letter() {
        let pages = decode(&self_parented_page_pdf()).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines[0].text, "Loop");
        assert_eq!(pages[0].lines[0].top, 82.0);
    }

    #[test]
    fn page_without_text_is_empty() {
        let bytes = one_page_pdf(Some([0, 0, 612, 792]), vec![]);
        let pages = decode(&bytes).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].lines.is_empty());
        assert!(pages[0].words.is_empty());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(decode(b"%PDF-1.4 truncated"), Err(PdfError::Parse(_))));
        assert!(matches!(decode(&[]), Err(PdfError::Parse(_))));
    }
}
