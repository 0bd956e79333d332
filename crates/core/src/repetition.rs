//! Running header and footer detection.
//!
//! Headers and footers repeat with the same text at the same vertical
//! position on many pages. Long documents are sampled at both ends only.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::config::RepetitionConfig;
use crate::text::{is_page_number, normalize_whitespace, round_half_even};
use crate::types::Page;

/// Lower-cased texts of lines that recur at a stable position.
pub type RepeatedLines = HashSet<String>;

/// Indices of the pages inspected for repetition.
///
/// Documents with more than `2 * edge_pages` pages contribute their first and
/// last `edge_pages` pages; shorter documents contribute every page.
pub fn sample_page_indices(page_count: usize, edge_pages: usize) -> Vec<usize> {
    if page_count > edge_pages * 2 {
        (0..edge_pages)
            .chain(page_count - edge_pages..page_count)
            .collect()
    } else {
        (0..page_count).collect()
    }
}

/// Collect lines that appear at the same rounded `top` on enough pages.
///
/// A line is repeated when its `(text, position)` pair occurs on at least
/// `max(min_occurrences, page_count / page_divisor)` distinct sampled pages,
/// where `page_count` is the full document length. Short numeric lines (page
/// numbers) never count.
pub fn detect_repeated_lines(pages: &[Page], config: &RepetitionConfig) -> RepeatedLines {
    let page_count = pages.len();
    let mut positions: HashMap<(String, i64), BTreeSet<usize>> = HashMap::new();

    for index in sample_page_indices(page_count, config.edge_pages) {
        for line in &pages[index].lines {
            let text = normalize_whitespace(&line.text).to_lowercase();
            if text.is_empty() || is_page_number(&text, config.max_page_number_len) {
                continue;
            }
            positions
                .entry((text, round_half_even(line.top)))
                .or_default()
                .insert(index);
        }
    }

    let min_occurrences = config
        .min_occurrences
        .max(page_count / config.page_divisor.max(1));

    let repeated: RepeatedLines = positions
        .into_iter()
        .filter(|(_, seen_on)| seen_on.len() >= min_occurrences)
        .map(|((text, _), _)| text)
        .collect();

    log::debug!(
        "{} repeated line(s) across {} page(s), threshold {}",
        repeated.len(),
        page_count,
        min_occurrences
    );

    repeated
}

/// Whether a normalized candidate text was marked as a header or footer.
pub fn is_repeated(repeated: &RepeatedLines, normalized_text: &str) -> bool {
    repeated.contains(&normalized_text.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CharStyle, Line};

    fn line(text: &str, top: f64) -> Line {
        Line {
            text: text.to_string(),
            top,
            chars: vec![CharStyle::new(10.0, "Body")],
        }
    }

    fn page(lines: Vec<Line>) -> Page {
        Page {
            words: vec![],
            lines,
        }
    }

    #[test]
    fn sampling_short_documents_uses_every_page() {
        assert_eq!(sample_page_indices(6, 3), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(sample_page_indices(0, 3), Vec::<usize>::new());
    }

    #[test]
    fn sampling_long_documents_uses_both_ends() {
        assert_eq!(sample_page_indices(7, 3), vec![0, 1, 2, 4, 5, 6]);
        assert_eq!(sample_page_indices(20, 3), vec![0, 1, 2, 17, 18, 19]);
    }

    #[test]
    fn header_on_five_of_eight_pages_is_repeated() {
        // 8 pages: sampled pages are 0,1,2 and 5,6,7. Threshold = max(2, 8/4) = 2.
        let pages: Vec<Page> = (0..8)
            .map(|i| {
                let mut lines = vec![line(&format!("Body text {}", i), 300.0)];
                if [0, 2, 4, 5, 7].contains(&i) {
                    lines.push(line("ACME  Corp   Annual Report", 20.4));
                }
                page(lines)
            })
            .collect();

        let repeated = detect_repeated_lines(&pages, &RepetitionConfig::default());
        assert!(repeated.contains("acme corp annual report"));
        assert!(is_repeated(&repeated, "ACME Corp Annual Report"));
        assert!(!repeated.iter().any(|t| t.starts_with("body text")));
    }

    #[test]
    fn same_text_at_different_positions_is_not_repeated() {
        let pages = vec![
            page(vec![line("Overview", 50.0)]),
            page(vec![line("Overview", 400.0)]),
            page(vec![line("Overview", 700.0)]),
        ];

        let repeated = detect_repeated_lines(&pages, &RepetitionConfig::default());
        assert!(repeated.is_empty());
    }

    #[test]
    fn positions_are_rounded_before_grouping() {
        let pages = vec![
            page(vec![line("Confidential", 780.2)]),
            page(vec![line("Confidential", 779.8)]),
        ];

        let repeated = detect_repeated_lines(&pages, &RepetitionConfig::default());
        assert!(repeated.contains("confidential"));
    }

    #[test]
    fn page_numbers_are_ignored() {
        let pages = vec![
            page(vec![line("12", 780.0), line("1234", 760.0)]),
            page(vec![line("12", 780.0), line("1234", 760.0)]),
        ];

        let repeated = detect_repeated_lines(&pages, &RepetitionConfig::default());
        assert!(!repeated.contains("12"));
        assert!(repeated.contains("1234"));
    }

    #[test]
    fn numeral_symbols_are_not_page_numbers() {
        let pages = vec![
            page(vec![line("\u{2163}", 780.0)]),
            page(vec![line("\u{2163}", 780.0)]),
        ];

        let repeated = detect_repeated_lines(&pages, &RepetitionConfig::default());
        assert!(is_repeated(&repeated, "\u{2163}"));
    }

    #[test]
    fn threshold_scales_with_document_length() {
        // 16 pages -> threshold 4; a line on 3 sampled pages is not enough.
        let pages: Vec<Page> = (0..16)
            .map(|i| {
                if [0, 1, 15].contains(&i) {
                    page(vec![line("Draft", 10.0)])
                } else {
                    page(vec![])
                }
            })
            .collect();

        let repeated = detect_repeated_lines(&pages, &RepetitionConfig::default());
        assert!(repeated.is_empty());
    }

    #[test]
    fn single_page_documents_have_no_repeats() {
        let pages = vec![page(vec![line("Title", 50.0), line("Title", 50.0)])];
        let repeated = detect_repeated_lines(&pages, &RepetitionConfig::default());
        assert!(repeated.is_empty());
    }
}
