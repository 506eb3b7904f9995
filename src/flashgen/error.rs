use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum FlashError {
    #[error("No extractable text remains after normalization")]
    EmptyInput,

    #[error("Input too short: {len} characters (at least {min} needed)")]
    InputTooShort { len: usize, min: usize },

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Could not parse backend response: {0}")]
    Parse(String),

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(Uuid),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, FlashError>;
