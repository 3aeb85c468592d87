use thiserror::Error;

#[derive(Error, Debug)]
pub enum BudgieError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Transaction has no id; it was never stored")]
    MissingId,

    #[error("Invalid {field}: {value:?}")]
    InvalidCriterion { field: &'static str, value: String },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BudgieError>;
