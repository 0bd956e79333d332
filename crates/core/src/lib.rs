//! Core library for pdfoutline
//!
//! This crate implements the **Functional Core** of the outline extractor,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`outline_core`** (this crate): heading detection over decoded pages, no I/O
//! - **`pdf`**: turns PDF bytes into [`Page`]s
//! - **`pdfoutline`**: reads the input directory and writes JSON (the Imperative Shell)
//!
//! Every function here takes decoded pages and returns data. The same pages
//! and configuration always produce the same outline.
//!
//! # Pipeline
//!
//! 1. [`style`]: the dominant body text style
//! 2. [`repetition`]: running headers and footers to exclude
//! 3. [`language`]: language profile and word counting
//! 4. [`scoring`]: a heuristic heading score per line
//! 5. [`levels`]: font sizes mapped to the title and H1 to H3
//! 6. [`assemble`]: the final `{title, outline}` document
//!
//! [`extract::OutlineExtractor`] runs the stages in order.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use outline_core::{OutlineConfig, OutlineExtractor, Page};
//!
//! let pages: Vec<Page> = decode_somehow();
//! let extractor = OutlineExtractor::new(OutlineConfig::default());
//! let doc = extractor.extract(&pages, "report")?;
//!
//! println!("{}", serde_json::to_string_pretty(&doc)?);
//! ```

pub mod assemble;
pub mod config;
pub mod error;
pub mod extract;
pub mod language;
pub mod levels;
pub mod repetition;
pub mod scoring;
pub mod style;
pub mod text;
pub mod types;

pub use config::OutlineConfig;
pub use error::OutlineError;
pub use extract::{file_stem, OutlineExtractor};
pub use language::{LanguageDetector, LanguageProfile, TokenizerKind};
pub use types::*;
