use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("No data: {0}")]
    NoData(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
