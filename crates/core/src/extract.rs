use std::path::Path;

use crate::assemble::assemble_outline;
use crate::config::OutlineConfig;
use crate::language::{resolve_profile, text_sample, LanguageDetector, Tokenizers, WhatlangDetector};
use crate::levels::assign_levels;
use crate::repetition::{detect_repeated_lines, is_repeated};
use crate::scoring::{evaluate_line, ScoringContext};
use crate::style::analyze_body_style;
use crate::text::normalize_whitespace;
use crate::types::{HeadingCandidate, OutlineDocument, Page};
use crate::OutlineError;

/// Runs the outline pipeline over decoded pages.
///
/// The configuration is fixed at construction. Segmentation dictionaries are
/// loaded on first use and reused for every later document.
pub struct OutlineExtractor {
    config: OutlineConfig,
    detector: Box<dyn LanguageDetector>,
    tokenizers: Tokenizers,
}

impl OutlineExtractor {
    pub fn new(config: OutlineConfig) -> Self {
        Self {
            config,
            detector: Box::new(WhatlangDetector),
            tokenizers: Tokenizers::new(),
        }
    }

    /// Replace the language detector.
    pub fn with_detector(mut self, detector: Box<dyn LanguageDetector>) -> Self {
        self.detector = detector;
        self
    }

    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// Extract `{title, outline}` from a document's pages.
    ///
    /// `file_stem` is the title used when no title-sized heading appears on
    /// the first pages.
    pub fn extract(&self, pages: &[Page], file_stem: &str) -> Result<OutlineDocument, OutlineError> {
        let candidates = self.candidates(pages)?;
        let assignment = assign_levels(&candidates, self.config.levels.max_levels);
        Ok(assemble_outline(
            &candidates,
            &assignment,
            file_stem,
            self.config.levels.title_max_page,
        ))
    }

    /// Every line that scores as a heading, in page and line order.
    pub fn candidates(&self, pages: &[Page]) -> Result<Vec<HeadingCandidate>, OutlineError> {
        let config = &self.config;

        let sample = text_sample(pages, config.language.sample_words);
        let profile = resolve_profile(&sample, self.detector.as_ref(), &config.language);
        log::info!("Detected language: {}", profile.lang_code.to_uppercase());

        let body = analyze_body_style(pages, &config.body_fallback);
        let repeated = detect_repeated_lines(pages, &config.repetition);
        let counter = self.tokenizers.counter(profile.tokenizer_kind)?;

        let ctx = ScoringContext {
            body: &body,
            profile: &profile,
            counter,
            config: &config.scoring,
        };

        let mut candidates = Vec::new();
        for (index, page) in pages.iter().enumerate() {
            for line in &page.lines {
                let text = normalize_whitespace(&line.text);
                if text.is_empty() || is_repeated(&repeated, &text) {
                    continue;
                }
                if let Some(candidate) = evaluate_line(line, index, &ctx)? {
                    candidates.push(candidate);
                }
            }
        }

        log::debug!(
            "body style {}pt '{}' (bold: {}), {} candidate(s)",
            body.size,
            body.font_name,
            body.is_bold,
            candidates.len()
        );

        Ok(candidates)
    }
}

/// Base filename without its extension: `/in/Report.PDF` -> `Report`.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
