use connectors::error::DbError;
use planner::error::PaginationConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaginatorError {
    #[error("Invalid pagination config: {0}")]
    Config(#[from] PaginationConfigError),

    /// Failures from the executor, passed through unchanged.
    #[error("Query execution failed: {0}")]
    Execution(#[from] DbError),

    #[error("Invalid column expression: {0:?}")]
    InvalidColumn(String),

    #[error("Column '{0}' is missing from a result row")]
    MissingColumn(String),

    #[error("Cursor column '{0}' is NULL in a result row")]
    NullCursor(String),

    #[error("Invalid paginator state: {0}")]
    State(#[from] serde_json::Error),
}
