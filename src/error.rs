use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    #[error("Cannot summarise {date}: no hourly records for that day")]
    EmptyDay { date: NaiveDate },

    #[error("Hourly record at {timestamp} reached aggregation without a condition")]
    UnclassifiedRecord { timestamp: NaiveDateTime },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] ::config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Beach preset '{0}' not found")]
    PresetNotFound(String),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
