//! Static configuration for the outline pipeline.
//!
//! Every weight, threshold and the language-profile table lives in one
//! immutable [`OutlineConfig`] handed to the extractor at construction.
//! Configurations can be loaded from TOML; missing sections and fields fall
//! back to the defaults below.
//!
//! ```toml
//! [scoring]
//! score_threshold = 6.0
//!
//! [language.profiles.ko]
//! has_case = false
//! tokenizer = "default"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::language::TokenizerKind;
use crate::types::HeadingLevel;
use crate::OutlineError;

/// Key of the profile used for languages the table does not list.
pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    pub scoring: ScoringConfig,
    pub repetition: RepetitionConfig,
    pub levels: LevelConfig,
    pub language: LanguageConfig,
    pub body_fallback: BodyFallback,
}

/// Weights and thresholds of the heading scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Minimum total score for a line to become a candidate.
    pub score_threshold: f64,
    /// Lines under this many words earn `word_count_score`.
    pub max_heading_words: usize,
    /// Lines over `max_heading_words * long_line_factor` words score zero.
    pub long_line_factor: f64,
    /// A line is "large" above `body_size * font_size_multiplier`.
    pub font_size_multiplier: f64,
    pub font_score: f64,
    pub bold_score: f64,
    pub all_caps_score: f64,
    pub title_case_score: f64,
    pub numbering_score: f64,
    pub word_count_score: f64,
    /// Applied to lines ending in `.`, `:` or `,`.
    pub period_penalty: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            score_threshold: 5.0,
            max_heading_words: 12,
            long_line_factor: 1.5,
            font_size_multiplier: 1.15,
            font_score: 4.0,
            bold_score: 3.5,
            all_caps_score: 2.5,
            title_case_score: 1.5,
            numbering_score: 6.0,
            word_count_score: 2.0,
            period_penalty: -5.0,
        }
    }
}

impl ScoringConfig {
    /// Word count above which a line is rejected outright (18 by default).
    pub fn long_line_limit(&self) -> f64 {
        self.max_heading_words as f64 * self.long_line_factor
    }
}

/// Header/footer detection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepetitionConfig {
    /// Pages sampled from each end of long documents.
    pub edge_pages: usize,
    /// Floor for the number of pages a line must recur on.
    pub min_occurrences: usize,
    /// The recurrence requirement is `max(min_occurrences, pages / page_divisor)`.
    pub page_divisor: usize,
    /// Purely numeric lines shorter than this are page numbers and ignored.
    pub max_page_number_len: usize,
}

impl Default for RepetitionConfig {
    fn default() -> Self {
        Self {
            edge_pages: 3,
            min_occurrences: 2,
            page_divisor: 4,
            max_page_number_len: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Number of sizes below the title size that receive a level.
    pub max_levels: u8,
    /// Last 0-based page on which title-sized candidates form the title.
    pub title_max_page: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            max_levels: HeadingLevel::MAX,
            title_max_page: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Number of leading words joined into the detection sample.
    pub sample_words: usize,
    /// Code assumed when detection fails.
    pub fallback_code: String,
    pub profiles: BTreeMap<String, ProfileEntry>,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        let profiles = [
            ("en", true, TokenizerKind::Default),
            ("ja", false, TokenizerKind::Japanese),
            ("zh-cn", false, TokenizerKind::Chinese),
            ("zh-tw", false, TokenizerKind::Chinese),
            (DEFAULT_PROFILE, true, TokenizerKind::Default),
        ]
        .into_iter()
        .map(|(code, has_case, tokenizer)| {
            (
                code.to_string(),
                ProfileEntry {
                    has_case,
                    tokenizer,
                },
            )
        })
        .collect();

        Self {
            sample_words: 500,
            fallback_code: "en".to_string(),
            profiles,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEntry {
    pub has_case: bool,
    pub tokenizer: TokenizerKind,
}

/// Body style assumed for documents without any words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyFallback {
    pub size: i64,
    pub font_name: String,
    pub is_bold: bool,
}

impl Default for BodyFallback {
    fn default() -> Self {
        Self {
            size: 12,
            font_name: "default".to_string(),
            is_bold: false,
        }
    }
}

impl OutlineConfig {
    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(source: &str) -> Result<Self, OutlineError> {
        let config: OutlineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), OutlineError> {
        let scoring = &self.scoring;
        if !scoring.score_threshold.is_finite() {
            return Err(OutlineError::Config(
                "scoring.score_threshold must be finite".into(),
            ));
        }
        if scoring.font_size_multiplier <= 0.0 || scoring.long_line_factor <= 0.0 {
            return Err(OutlineError::Config(
                "scoring.font_size_multiplier and scoring.long_line_factor must be positive"
                    .into(),
            ));
        }
        if self.repetition.page_divisor == 0 {
            return Err(OutlineError::Config(
                "repetition.page_divisor must be at least 1".into(),
            ));
        }
        if !(1..=HeadingLevel::MAX).contains(&self.levels.max_levels) {
            return Err(OutlineError::Config(format!(
                "levels.max_levels must be between 1 and {}",
                HeadingLevel::MAX
            )));
        }
        if !self.language.profiles.contains_key(DEFAULT_PROFILE) {
            return Err(OutlineError::Config(format!(
                "language.profiles must contain a '{}' entry",
                DEFAULT_PROFILE
            )));
        }
        Ok(())
    }
}
