use unicode_normalization::UnicodeNormalization;

const LIGATURES: [(char, &str); 5] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

/// Normalize the text of one span: Unicode NFC, ligatures expanded,
/// replacement characters dropped. Spacing is left untouched.
pub fn clean_span_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for ch in text.nfc() {
        match LIGATURES.iter().find(|(lig, _)| *lig == ch) {
            Some((_, expansion)) => result.push_str(expansion),
            None if ch == '\u{FFFD}' => {}
            None => result.push(ch),
        }
    }

    result
}
