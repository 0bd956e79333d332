use std::collections::HashMap;

use crate::config::BodyFallback;
use crate::text::{is_bold_font, round_half_even};
use crate::types::{BodyStyle, Page};

/// Find the most frequent `(rounded size, font name)` pair among all words.
///
/// Words whose text is blank after trimming are ignored. Ties go to the
/// style encountered first. Documents without any usable word get the
/// fallback style.
pub fn analyze_body_style(pages: &[Page], fallback: &BodyFallback) -> BodyStyle {
    // (size, font) -> (count, first position seen)
    let mut counts: HashMap<(i64, &str), (usize, usize)> = HashMap::new();

    let words = pages
        .iter()
        .flat_map(|page| page.words.iter())
        .filter(|word| !word.text.trim().is_empty());

    for (position, word) in words.enumerate() {
        let key = (round_half_even(word.size), word.font_name.as_str());
        counts.entry(key).or_insert((0, position)).0 += 1;
    }

    let dominant = counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(key, _)| key);

    match dominant {
        Some((size, font_name)) => BodyStyle {
            size,
            font_name: font_name.to_string(),
            is_bold: is_bold_font(font_name),
        },
        None => BodyStyle {
            size: fallback.size,
            font_name: fallback.font_name.clone(),
            is_bold: fallback.is_bold,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Word;

    fn page(words: Vec<Word>) -> Page {
        Page {
            words,
            lines: vec![],
        }
    }

    #[test]
    fn most_frequent_style_wins() {
        let pages = vec![
            page(vec![
                Word::new("Title", 24.0, "Helvetica-Bold"),
                Word::new("body", 11.8, "Times"),
                Word::new("text", 12.2, "Times"),
            ]),
            page(vec![Word::new("more", 12.0, "Times")]),
        ];

        let style = analyze_body_style(&pages, &BodyFallback::default());
        assert_eq!(style.size, 12);
        assert_eq!(style.font_name, "Times");
        assert!(!style.is_bold);
    }

    #[test]
    fn bold_body_font_is_flagged() {
        let pages = vec![page(vec![
            Word::new("a", 10.0, "Arial-BoldMT"),
            Word::new("b", 10.0, "Arial-BoldMT"),
            Word::new("c", 14.0, "Arial"),
        ])];

        let style = analyze_body_style(&pages, &BodyFallback::default());
        assert_eq!(style.size, 10);
        assert!(style.is_bold);
    }

    #[test]
    fn ties_go_to_first_seen_style() {
        let pages = vec![page(vec![
            Word::new("x", 9.0, "Serif"),
            Word::new("y", 11.0, "Sans"),
            Word::new("z", 11.0, "Sans"),
            Word::new("w", 9.0, "Serif"),
        ])];

        let style = analyze_body_style(&pages, &BodyFallback::default());
        assert_eq!(style.size, 9);
        assert_eq!(style.font_name, "Serif");
    }

    #[test]
    fn blank_words_are_ignored() {
        let pages = vec![page(vec![
            Word::new("   ", 30.0, "Huge"),
            Word::new("", 30.0, "Huge"),
            Word::new("real", 10.0, "Body"),
        ])];

        let style = analyze_body_style(&pages, &BodyFallback::default());
        assert_eq!(style.size, 10);
        assert_eq!(style.font_name, "Body");
    }

    #[test]
    fn empty_document_uses_fallback() {
        let style = analyze_body_style(&[], &BodyFallback::default());
        assert_eq!(
            style,
            BodyStyle {
                size: 12,
                font_name: "default".to_string(),
                is_bold: false,
            }
        );

        let blank_only = vec![page(vec![Word::new(" ", 20.0, "X")])];
        assert_eq!(analyze_body_style(&blank_only, &BodyFallback::default()).size, 12);
    }
}
