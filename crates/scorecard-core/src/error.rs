use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}
