//! Heuristic heading score for a single line.
//!
//! The score is a sum of independent signals read from the line's first
//! glyph and its normalized text:
//!
//! | Signal               | Condition                                   |
//! |----------------------|---------------------------------------------|
//! | large font           | size > body size × `font_size_multiplier`   |
//! | bold                 | first glyph bold and body text not bold     |
//! | short                | fewer than `max_heading_words` words        |
//! | all caps             | cased language, all uppercase, > 1 word     |
//! | title case           | otherwise: cased language, title case, > 1  |
//! | numbered             | starts with `1.`, `2.3`, `IV.` …            |
//! | trailing punctuation | ends with `.`, `:` or `,` (penalty)         |
//!
//! Empty lines and lines longer than `max_heading_words × long_line_factor`
//! words score zero without evaluating any signal.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::ScoringConfig;
use crate::language::{LanguageProfile, WordCounter};
use crate::text::{is_all_upper, is_bold_font, is_title_case, normalize_whitespace, round_half_even};
use crate::types::{BodyStyle, HeadingCandidate, Line};
use crate::OutlineError;

/// Everything the scorer needs besides the line itself.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub body: &'a BodyStyle,
    pub profile: &'a LanguageProfile,
    pub counter: WordCounter<'a>,
    pub config: &'a ScoringConfig,
}

fn numbering_regex() -> &'static Regex {
    static RE_NUMBERING: OnceLock<Regex> = OnceLock::new();
    RE_NUMBERING.get_or_init(|| Regex::new(r"^((\b[IVXLCDM]+\b\.)|\d+(\.\d+)*\.?)").unwrap())
}

/// Whether the text opens with a section number (`3.`, `2.1.4`, `XII.`).
pub fn is_numbered(text: &str) -> bool {
    numbering_regex().is_match(text)
}

fn has_trailing_punctuation(text: &str) -> bool {
    text.ends_with(['.', ':', ','])
}

/// Compute the heading score of a line. Zero means "not a heading".
pub fn score_line(line: &Line, ctx: &ScoringContext<'_>) -> Result<f64, OutlineError> {
    let text = normalize_whitespace(&line.text);
    if text.is_empty() {
        return Ok(0.0);
    }

    let word_count = ctx.counter.count_words(&text)?;
    if word_count as f64 > ctx.config.long_line_limit() {
        return Ok(0.0);
    }

    let Some(first) = line.leading_style() else {
        return Ok(0.0);
    };

    let config = ctx.config;
    let line_size = round_half_even(first.size);
    let mut score = 0.0;

    if line_size as f64 > ctx.body.size as f64 * config.font_size_multiplier {
        score += config.font_score;
    }

    if is_bold_font(&first.font_name) && !ctx.body.is_bold {
        score += config.bold_score;
    }

    if word_count < config.max_heading_words {
        score += config.word_count_score;
    }

    if ctx.profile.has_case && word_count > 1 {
        if is_all_upper(&text) {
            score += config.all_caps_score;
        } else if is_title_case(&text) {
            score += config.title_case_score;
        }
    }

    if is_numbered(&text) {
        score += config.numbering_score;
    }

    if has_trailing_punctuation(&text) {
        score += config.period_penalty;
    }

    Ok(score)
}

/// Score a line and turn it into a candidate when it clears the threshold.
pub fn evaluate_line(
    line: &Line,
    page: usize,
    ctx: &ScoringContext<'_>,
) -> Result<Option<HeadingCandidate>, OutlineError> {
    let score = score_line(line, ctx)?;
    if score < ctx.config.score_threshold {
        return Ok(None);
    }

    // A positive score implies a leading glyph exists.
    let Some(first) = line.leading_style() else {
        return Ok(None);
    };

    Ok(Some(HeadingCandidate {
        text: normalize_whitespace(&line.text),
        size: round_half_even(first.size),
        page,
        score,
    }))
}
