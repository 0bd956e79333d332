//! Small text predicates shared by the analyzers.
//!
//! Casing predicates follow the usual "cased character" definition: a
//! character is cased when it has an uppercase or lowercase form. Uncased
//! characters (digits, punctuation, CJK ideographs) never affect the result
//! except as word separators for title case.

/// Collapse every run of whitespace to a single space and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Round half to even, the rounding used for sizes and positions.
///
/// `12.5` rounds to `12`, `13.5` to `14`.
pub fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// A font is bold when its name contains "bold" in any case.
pub fn is_bold_font(font_name: &str) -> bool {
    font_name.to_lowercase().contains("bold")
}

/// At least one cased character, and none of them lowercase.
pub fn is_all_upper(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Every word starts with an uppercase character and continues in lowercase.
///
/// Words are delimited by any uncased character, so `"1. Introduction"` and
/// `"Self-Test"` are title case while `"IBM Report"` is not.
pub fn is_title_case(text: &str) -> bool {
    let mut cased = false;
    let mut previous_cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else {
            previous_cased = false;
        }
    }
    cased
}

/// Page numbers: non-empty, every character a decimal digit, shorter than `max_len`.
///
/// Roman numerals, fractions and other numeric symbols are not digits.
pub fn is_page_number(text: &str, max_len: usize) -> bool {
    !text.is_empty() && text.chars().count() < max_len && text.chars().all(is_decimal_digit)
}

/// ASCII and fullwidth `0`-`9`.
fn is_decimal_digit(c: char) -> bool {
    c.is_ascii_digit() || ('\u{FF10}'..='\u{FF19}').contains(&c)
}
