//! Language profile resolution and language-aware word counting.
//!
//! The document language is detected once from a sample of its first words
//! and mapped through the configured profile table. The resulting
//! [`LanguageProfile`] decides whether casing signals apply and which
//! [`WordCounter`] the scorer uses.

use std::cell::OnceCell;
use std::fmt;

use lindera::dictionary::load_dictionary;
use lindera::mode::Mode;
use lindera::segmenter::Segmenter;
use lindera::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{LanguageConfig, DEFAULT_PROFILE};
use crate::types::Page;
use crate::OutlineError;

const IPADIC_URI: &str = "embedded://ipadic";
const CC_CEDICT_URI: &str = "embedded://cc-cedict";

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// How a language splits text into countable units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    /// Whitespace-delimited words.
    Default,
    /// Morphological segmentation with the IPADIC dictionary.
    #[serde(alias = "janome")]
    Japanese,
    /// Dictionary segmentation with CC-CEDICT.
    #[serde(alias = "jieba")]
    Chinese,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageProfile {
    /// Code returned by detection (or the fallback code).
    pub lang_code: String,
    pub has_case: bool,
    pub tokenizer_kind: TokenizerKind,
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DetectionError {
    #[error("Sample is empty")]
    EmptySample,
    #[error("Language could not be determined")]
    Inconclusive,
}

/// Identifies the language of a text sample.
///
/// Implementations must be deterministic: the same sample always yields the
/// same code.
pub trait LanguageDetector {
    fn detect(&self, sample: &str) -> Result<String, DetectionError>;
}

/// Trigram-based detector backed by `whatlang`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, sample: &str) -> Result<String, DetectionError> {
        if sample.trim().is_empty() {
            return Err(DetectionError::EmptySample);
        }
        let info = whatlang::detect(sample).ok_or(DetectionError::Inconclusive)?;
        Ok(short_code(info.lang()).to_string())
    }
}

/// Map a detected language onto the short codes used by the profile table.
fn short_code(lang: whatlang::Lang) -> &'static str {
    use whatlang::Lang;

    match lang {
        Lang::Eng => "en",
        Lang::Jpn => "ja",
        Lang::Cmn => "zh-cn",
        Lang::Kor => "ko",
        Lang::Spa => "es",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Nld => "nl",
        Lang::Rus => "ru",
        Lang::Ara => "ar",
        Lang::Hin => "hi",
        other => other.code(),
    }
}

/// Join the text of the first `limit` words across all pages.
pub fn text_sample(pages: &[Page], limit: usize) -> String {
    pages
        .iter()
        .flat_map(|page| page.words.iter())
        .take(limit)
        .map(|word| word.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Detect the sample's language and look up its profile.
///
/// Detection failures fall back to `config.fallback_code`; codes missing
/// from the table use the `default` profile.
pub fn resolve_profile(
    sample: &str,
    detector: &dyn LanguageDetector,
    config: &LanguageConfig,
) -> LanguageProfile {
    let lang_code = match detector.detect(sample) {
        Ok(code) => code,
        Err(e) => {
            log::debug!("language detection failed ({}), using '{}'", e, config.fallback_code);
            config.fallback_code.clone()
        }
    };

    let entry = config
        .profiles
        .get(&lang_code)
        .or_else(|| config.profiles.get(DEFAULT_PROFILE));

    match entry {
        Some(entry) => LanguageProfile {
            lang_code,
            has_case: entry.has_case,
            tokenizer_kind: entry.tokenizer,
        },
        None => LanguageProfile {
            lang_code,
            has_case: true,
            tokenizer_kind: TokenizerKind::Default,
        },
    }
}

// ---------------------------------------------------------------------------
// Word counting
// ---------------------------------------------------------------------------

/// Counts word-like units in a line of text.
#[derive(Clone, Copy)]
pub enum WordCounter<'a> {
    Whitespace,
    Segmented(&'a Tokenizer),
}

impl WordCounter<'_> {
    pub fn count_words(&self, text: &str) -> Result<usize, OutlineError> {
        match self {
            WordCounter::Whitespace => Ok(text.split_whitespace().count()),
            WordCounter::Segmented(tokenizer) => tokenizer
                .tokenize(text)
                .map(|tokens| tokens.len())
                .map_err(|e| OutlineError::Tokenizer(e.to_string())),
        }
    }
}

impl fmt::Debug for WordCounter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordCounter::Whitespace => write!(f, "Whitespace"),
            WordCounter::Segmented(_) => write!(f, "Segmented"),
        }
    }
}

/// Lazily loaded segmenters, shared across documents.
///
/// Each dictionary is loaded the first time a document needs it and reused
/// afterwards. Segmenters hold no per-document state.
#[derive(Default)]
pub struct Tokenizers {
    japanese: OnceCell<Tokenizer>,
    chinese: OnceCell<Tokenizer>,
}

impl Tokenizers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, kind: TokenizerKind) -> Result<WordCounter<'_>, OutlineError> {
        match kind {
            TokenizerKind::Default => Ok(WordCounter::Whitespace),
            TokenizerKind::Japanese => {
                get_or_load(&self.japanese, IPADIC_URI).map(WordCounter::Segmented)
            }
            TokenizerKind::Chinese => {
                get_or_load(&self.chinese, CC_CEDICT_URI).map(WordCounter::Segmented)
            }
        }
    }
}

impl fmt::Debug for Tokenizers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizers")
            .field("japanese_loaded", &self.japanese.get().is_some())
            .field("chinese_loaded", &self.chinese.get().is_some())
            .finish()
    }
}

fn get_or_load<'a>(cell: &'a OnceCell<Tokenizer>, uri: &str) -> Result<&'a Tokenizer, OutlineError> {
    if let Some(tokenizer) = cell.get() {
        return Ok(tokenizer);
    }
    log::debug!("loading segmentation dictionary {}", uri);
    let dictionary =
        load_dictionary(uri).map_err(|e| OutlineError::Tokenizer(format!("{}: {}", uri, e)))?;
    let segmenter = Segmenter::new(Mode::Normal, dictionary, None);
    Ok(cell.get_or_init(|| Tokenizer::new(segmenter)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutlineConfig;
    use crate::types::Word;

    struct FixedDetector(Result<String, DetectionError>);

    impl LanguageDetector for FixedDetector {
        fn detect(&self, _sample: &str) -> Result<String, DetectionError> {
            self.0.clone()
        }
    }

    fn page_of(words: &[&str]) -> Page {
        Page {
            words: words.iter().map(|w| Word::new(*w, 12.0, "Body")).collect(),
            lines: vec![],
        }
    }

    #[test]
    fn sample_takes_first_words_across_pages() {
        let pages = vec![page_of(&["one", "two"]), page_of(&["three", "four"])];
        assert_eq!(text_sample(&pages, 3), "one two three");
        assert_eq!(text_sample(&pages, 10), "one two three four");
        assert_eq!(text_sample(&[], 10), "");
    }

    #[test]
    fn known_code_resolves_to_its_profile() {
        let config = OutlineConfig::default().language;
        let profile = resolve_profile("x", &FixedDetector(Ok("ja".into())), &config);
        assert_eq!(profile.lang_code, "ja");
        assert!(!profile.has_case);
        assert_eq!(profile.tokenizer_kind, TokenizerKind::Japanese);
    }

    #[test]
    fn unknown_code_uses_default_profile() {
        let config = OutlineConfig::default().language;
        let profile = resolve_profile("x", &FixedDetector(Ok("fr".into())), &config);
        assert_eq!(profile.lang_code, "fr");
        assert!(profile.has_case);
        assert_eq!(profile.tokenizer_kind, TokenizerKind::Default);
    }

    #[test]
    fn detection_failure_falls_back_to_english() {
        let config = OutlineConfig::default().language;
        let profile = resolve_profile(
            "",
            &FixedDetector(Err(DetectionError::Inconclusive)),
            &config,
        );
        assert_eq!(profile.lang_code, "en");
        assert!(profile.has_case);
        assert_eq!(profile.tokenizer_kind, TokenizerKind::Default);
    }

    #[test]
    fn whatlang_rejects_empty_sample() {
        assert_eq!(WhatlangDetector.detect("   "), Err(DetectionError::EmptySample));
    }

    #[test]
    fn whatlang_detects_english_deterministically() {
        let sample = "The quick brown fox jumps over the lazy dog while the farmer \
                      watches from the porch and drinks his morning coffee slowly";
        let first = WhatlangDetector.detect(sample).unwrap();
        let second = WhatlangDetector.detect(sample).unwrap();
        assert_eq!(first, "en");
        assert_eq!(first, second);
    }

    #[test]
    fn whitespace_counter_splits_on_whitespace() {
        let counter = WordCounter::Whitespace;
        assert_eq!(counter.count_words("1. Introduction").unwrap(), 2);
        assert_eq!(counter.count_words("  a  b\tc ").unwrap(), 3);
        assert_eq!(counter.count_words("").unwrap(), 0);
    }

    #[test]
    fn default_kind_needs_no_dictionary() {
        let tokenizers = Tokenizers::new();
        let counter = tokenizers.counter(TokenizerKind::Default).unwrap();
        assert!(matches!(counter, WordCounter::Whitespace));
        assert_eq!(
            format!("{:?}", tokenizers),
            "Tokenizers { japanese_loaded: false, chinese_loaded: false }"
        );
    }

    #[test]
    fn japanese_counter_segments_and_is_reused() {
        let tokenizers = Tokenizers::new();
        let counter = tokenizers.counter(TokenizerKind::Japanese).unwrap();
        let count = counter.count_words("関西国際空港限定トートバッグ").unwrap();
        assert!(count > 1, "expected several segments, got {}", count);

        // Second lookup reuses the loaded dictionary and gives the same answer.
        let again = tokenizers.counter(TokenizerKind::Japanese).unwrap();
        assert_eq!(again.count_words("関西国際空港限定トートバッグ").unwrap(), count);
    }

    #[test]
    fn chinese_counter_segments_and_is_reused() {
        let tokenizers = Tokenizers::new();
        let text = "我们在北京大学学习中文";
        let counter = tokenizers.counter(TokenizerKind::Chinese).unwrap();
        let count = counter.count_words(text).unwrap();
        assert!(count > 1, "expected several segments, got {}", count);
        assert_eq!(WordCounter::Whitespace.count_words(text).unwrap(), 1);

        let again = tokenizers.counter(TokenizerKind::Chinese).unwrap();
        assert_eq!(again.count_words(text).unwrap(), count);
        assert_eq!(
            format!("{:?}", tokenizers),
            "Tokenizers { japanese_loaded: false, chinese_loaded: true }"
        );
    }
}
