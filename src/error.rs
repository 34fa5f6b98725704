use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SalesInsightError {
    #[error("Malformed date expression '{input}': {details}")]
    MalformedDate { input: String, details: String },

    #[error("Reversed range: start {start} is after end {end}")]
    ReversedRange { start: NaiveDate, end: NaiveDate },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("Insufficient history for forecasting: need at least {required} monthly totals, got {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

pub type Result<T> = std::result::Result<T, SalesInsightError>;
