use thiserror::Error;

pub type LiftResult<T> = Result<T, LiftError>;

#[derive(Error, Debug)]
pub enum LiftError {
    /// A source table is missing required columns. Fatal for the whole
    /// run; raised before any row is parsed or aggregated.
    #[error("Schema error in {table}: missing required columns {missing:?}")]
    Schema { table: String, missing: Vec<String> },

    /// A row or argument violates data integrity (malformed grouping key,
    /// zero trial counts, success count above trials, unparseable field).
    /// Fatal for the affected row; callers choose abort or skip.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
