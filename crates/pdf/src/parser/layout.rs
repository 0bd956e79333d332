//! Text extraction and line assembly.
//!
//! Content-stream operators are replayed through a small text-state machine
//! that emits positioned [`TextSpan`]s. Spans sharing a baseline are then
//! assembled into [`Line`]s and [`Word`]s.
//!
//! ```text
//! content ops  ->  TextSpan[]  ->  Line[] + Word[]
//!   (per page)   extract_page_spans   build_page
//! ```

use outline_core::{CharStyle, Line, Page, Word};

use super::backend::{FontResource, PageId, PdfBackend, PdfValue};
use super::cleanup::clean_span_text;
use crate::PdfError;

/// A run of text drawn with one font at one position.
#[derive(Debug, Clone)]
pub struct TextSpan {
    pub text: String,
    pub x: f32,
    /// Baseline, in PDF user space (origin at the bottom of the page).
    pub y: f32,
    pub width: f32,
    pub font_size: f32,
    pub font_name: String,
}

impl TextSpan {
    fn same_style(&self, other: &TextSpan) -> bool {
        self.font_name == other.font_name && self.font_size == other.font_size
    }
}

/// Spans whose baselines differ by at most this many points share a line.
const Y_TOLERANCE: f32 = 3.0;

/// Horizontal gap, in points, at which adjacent spans are separated by a space.
const X_TOLERANCE: f32 = 3.0;

/// Approximate glyph advance as a fraction of the font size. Glyph width
/// tables are not consulted.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Returns `true` if `c` belongs to a script written without inter-word
/// spaces (CJK, kana, Hangul, Thai and neighbours).
pub fn is_spaceless_script_char(c: char) -> bool {
    matches!(
        c as u32,
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2A6DF
        | 0xF900..=0xFAFF
        | 0x3040..=0x309F
        | 0x30A0..=0x30FF
        | 0x31F0..=0x31FF
        | 0xAC00..=0xD7AF
        | 0x1100..=0x11FF
        | 0x3130..=0x318F
        | 0x3000..=0x303F
        | 0xFF00..=0xFFEF
        | 0x0E00..=0x0EFF
        | 0x1000..=0x109F
        | 0x1780..=0x17FF
        | 0x0F00..=0x0FFF
    )
}

// ---------------------------------------------------------------------------
// Text-state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct TextState {
    font_name: String,
    font_encoding: Option<String>,
    font_size: f32,
    /// [a, b, c, d, tx, ty]
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_name: String::new(),
            font_encoding: None,
            font_size: 0.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn x(&self) -> f32 {
        self.text_matrix[4]
    }

    fn baseline(&self) -> f32 {
        self.text_matrix[5] + self.text_rise
    }

    /// `font_size * sqrt(b^2 + d^2)` of the text matrix.
    fn effective_font_size(&self) -> f32 {
        let scale = (self.text_matrix[1].powi(2) + self.text_matrix[3].powi(2)).sqrt();
        (self.font_size * scale).abs()
    }

    fn char_advance(&self) -> f32 {
        self.font_size * APPROX_CHAR_WIDTH_RATIO * self.horiz_scale
    }

    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// `Td`: translate the line matrix and reset the text matrix to it.
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let m = self.line_matrix;
        self.line_matrix[4] = m[0] * tx + m[2] * ty + m[4];
        self.line_matrix[5] = m[1] * tx + m[3] * ty + m[5];
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.translate_line(0.0, -self.leading);
    }

    /// Rendered width of `text`, scaled to user space.
    fn text_width(&self, text: &str) -> f32 {
        let scale = (self.text_matrix[0].powi(2) + self.text_matrix[1].powi(2)).sqrt();
        text.chars().count() as f32 * self.char_advance() * scale
    }

    /// Move past `text` after it has been shown.
    fn advance_after_show(&mut self, text: &str) {
        let dx: f32 = text
            .chars()
            .map(|ch| {
                let spacing = if ch == ' ' { self.word_spacing } else { 0.0 };
                self.char_advance() + self.char_spacing + spacing
            })
            .sum();
        self.advance_x(dx);
    }

    fn span(&self, text: String, x: f32, y: f32) -> TextSpan {
        TextSpan {
            width: self.text_width(&text),
            text,
            x,
            y,
            font_size: self.effective_font_size(),
            font_name: self.font_name.clone(),
        }
    }
}

fn number(operands: &[PdfValue], index: usize) -> Option<f32> {
    operands.get(index).and_then(PdfValue::as_number)
}

fn decode_string(val: &PdfValue, backend: &dyn PdfBackend, state: &TextState) -> String {
    match val {
        PdfValue::Str(bytes) => {
            clean_span_text(&backend.decode_text(state.font_encoding.as_deref(), bytes))
        }
        _ => String::new(),
    }
}

fn handle_tf(operands: &[PdfValue], fonts: &[FontResource], state: &mut TextState) {
    let key = match operands.first() {
        Some(PdfValue::Name(n)) | Some(PdfValue::Str(n)) => n.clone(),
        _ => return,
    };
    let size = number(operands, 1).unwrap_or(0.0);

    let resource = fonts.iter().find(|font| font.key == key);

    // Unknown resources keep their key as the font name.
    state.font_name = resource
        .and_then(|font| font.base_font.clone())
        .unwrap_or_else(|| String::from_utf8_lossy(&key).into_owned());
    state.font_encoding = resource.and_then(|font| font.encoding.clone());
    state.font_size = size;
}

fn handle_tm(operands: &[PdfValue], state: &mut TextState) {
    let vals: Vec<f32> = operands.iter().take(6).filter_map(PdfValue::as_number).collect();
    if let [a, b, c, d, e, f] = vals[..] {
        state.text_matrix = [a, b, c, d, e, f];
        state.line_matrix = state.text_matrix;
    }
}

fn emit_show_string(
    operand: &PdfValue,
    backend: &dyn PdfBackend,
    state: &mut TextState,
    spans: &mut Vec<TextSpan>,
) {
    let text = decode_string(operand, backend, state);
    if text.is_empty() {
        return;
    }
    spans.push(state.span(text.clone(), state.x(), state.baseline()));
    state.advance_after_show(&text);
}

/// `TJ`: strings interleaved with kerning adjustments in thousandths of a
/// text-space unit. A large negative adjustment reads as a word gap.
fn handle_tj_array(
    arr: &[PdfValue],
    backend: &dyn PdfBackend,
    state: &mut TextState,
    spans: &mut Vec<TextSpan>,
) {
    let mut buf = String::new();
    let mut span_x = state.x();
    let span_y = state.baseline();

    for elem in arr {
        match elem {
            PdfValue::Str(_) => {
                let fragment = decode_string(elem, backend, state);
                if buf.is_empty() {
                    span_x = state.x();
                }
                buf.push_str(&fragment);
                state.advance_after_show(&fragment);
            }
            val => {
                if let Some(adj) = val.as_number() {
                    let dx = -adj / 1000.0 * state.font_size * state.horiz_scale;
                    if dx > state.char_advance() * 0.3 && !buf.is_empty() {
                        buf.push(' ');
                    }
                    state.advance_x(dx);
                }
            }
        }
    }

    let text = buf.trim_end();
    if !text.is_empty() {
        spans.push(state.span(text.to_string(), span_x, span_y));
    }
}

/// Replay a page's content stream and collect its text spans.
///
/// Handles `BT ET Tf Tm Td TD T* TL Tc Tw Tz Ts Tj TJ ' "`; every other
/// operator is ignored.
pub fn extract_page_spans(backend: &dyn PdfBackend, page: PageId) -> Result<Vec<TextSpan>, PdfError> {
    let ops = backend.page_operations(page)?;
    let fonts = backend.page_fonts(page).unwrap_or_default();

    let mut state = TextState::default();
    let mut spans: Vec<TextSpan> = Vec::new();

    for op in &ops {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            // Font state survives ET; some producers rely on it.
            "ET" => {}
            "Tf" => handle_tf(operands, &fonts, &mut state),
            "Tm" => handle_tm(operands, &mut state),
            "Td" | "TD" => {
                if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.translate_line(tx, ty);
                }
            }
            "T*" => state.next_line(),
            "TL" => {
                if let Some(v) = number(operands, 0) {
                    state.leading = v;
                }
            }
            "Tc" => {
                if let Some(v) = number(operands, 0) {
                    state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = number(operands, 0) {
                    state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = number(operands, 0) {
                    state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = number(operands, 0) {
                    state.text_rise = v;
                }
            }
            "Tj" => {
                if let Some(first) = operands.first() {
                    emit_show_string(first, backend, &mut state, &mut spans);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(arr)) = operands.first() {
                    handle_tj_array(arr, backend, &mut state, &mut spans);
                }
            }
            "'" => {
                state.next_line();
                if let Some(first) = operands.first() {
                    emit_show_string(first, backend, &mut state, &mut spans);
                }
            }
            "\"" => {
                if let [aw, ac, text, ..] = operands {
                    if let Some(aw) = aw.as_number() {
                        state.word_spacing = aw;
                    }
                    if let Some(ac) = ac.as_number() {
                        state.char_spacing = ac;
                    }
                    state.next_line();
                    emit_show_string(text, backend, &mut state, &mut spans);
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

// ---------------------------------------------------------------------------
// Lines and words
// ---------------------------------------------------------------------------

/// Assemble a page's spans into lines (top to bottom) and words (reading order).
///
/// `page_height` converts PDF baselines into distances from the top edge.
/// Whitespace-only spans carry no glyphs and are dropped.
pub fn build_page(spans: Vec<TextSpan>, page_height: f32) -> Page {
    let mut page = Page::default();

    for group in group_spans(spans) {
        let (line, words) = assemble_line(group, page_height);
        page.lines.push(line);
        page.words.extend(words);
    }

    page
}

/// Group spans by baseline. Each group is anchored on its first span.
fn group_spans(mut spans: Vec<TextSpan>) -> Vec<Vec<TextSpan>> {
    spans.retain(|s| !s.text.trim().is_empty());

    // Top of page first, then left to right.
    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut groups: Vec<Vec<TextSpan>> = Vec::new();
    let mut anchor_y = f32::NAN;

    for span in spans {
        if (span.y - anchor_y).abs() <= Y_TOLERANCE {
            if let Some(group) = groups.last_mut() {
                group.push(span);
                continue;
            }
        }
        anchor_y = span.y;
        groups.push(vec![span]);
    }

    groups
}

fn boundary_is_spaceless(prev: &TextSpan, next: &TextSpan) -> bool {
    match (prev.text.chars().next_back(), next.text.chars().next()) {
        (Some(l), Some(f)) => is_spaceless_script_char(l) && is_spaceless_script_char(f),
        _ => false,
    }
}

/// Collects glyphs into words, splitting on whitespace and style changes.
#[derive(Default)]
struct WordBuilder {
    words: Vec<Word>,
    current: Option<Word>,
}

impl WordBuilder {
    fn push(&mut self, ch: char, span: &TextSpan) {
        let size = f64::from(span.font_size);
        match self.current.as_mut() {
            Some(word) if word.size == size && word.font_name == span.font_name => {
                word.text.push(ch);
            }
            _ => {
                self.flush();
                self.current = Some(Word::new(ch.to_string(), size, span.font_name.clone()));
            }
        }
    }

    fn flush(&mut self) {
        if let Some(word) = self.current.take() {
            self.words.push(word);
        }
    }

    fn finish(mut self) -> Vec<Word> {
        self.flush();
        self.words
    }
}

fn assemble_line(mut spans: Vec<TextSpan>, page_height: f32) -> (Line, Vec<Word>) {
    spans.sort_by(|a, b| a.x.total_cmp(&b.x));

    let mut text = String::new();
    let mut chars: Vec<CharStyle> = Vec::new();
    let mut words = WordBuilder::default();
    let mut highest_top_edge = f32::MIN;

    let mut prev: Option<&TextSpan> = None;

    for span in &spans {
        if let Some(prev) = prev {
            let gap = span.x - (prev.x + prev.width);
            if gap >= X_TOLERANCE && !boundary_is_spaceless(prev, span) {
                text.push(' ');
                words.flush();
            } else if !prev.same_style(span) {
                words.flush();
            }
        }

        for ch in span.text.chars() {
            text.push(ch);
            if ch.is_whitespace() {
                words.flush();
            } else {
                chars.push(CharStyle::new(f64::from(span.font_size), span.font_name.clone()));
                words.push(ch, span);
            }
        }

        highest_top_edge = highest_top_edge.max(span.y + span.font_size);
        prev = Some(span);
    }

    let line = Line {
        text,
        top: f64::from(page_height - highest_top_edge),
        chars,
    };

    (line, words.finish())
}
