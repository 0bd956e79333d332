use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<toml::de::Error> for OutlineError {
    fn from(e: toml::de::Error) -> Self {
        OutlineError::Config(e.to_string())
    }
}
