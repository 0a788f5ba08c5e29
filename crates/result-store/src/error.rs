use scorecard_core::ScoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("csv export error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json export error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for ScoreError {
    fn from(err: StoreError) -> Self {
        ScoreError::Persistence(err.to_string())
    }
}
