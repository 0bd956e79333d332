use std::path::PathBuf;

/// Why a single document produced no output file.
#[derive(thiserror::Error, Debug)]
pub enum ProcessingError {
    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot decode PDF: {0}")]
    Decode(#[from] pdf::PdfError),

    #[error("Outline extraction failed: {0}")]
    Extract(#[from] outline_core::OutlineError),

    #[error("Cannot serialize outline: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
