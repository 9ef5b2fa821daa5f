use thiserror::Error;

/// Misconfigured pagination directives. These are programming errors and
/// are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaginationConfigError {
    /// An order-by boundary needs the cursor column as its tie-break.
    #[error("order-by value supplied without a cursor value")]
    MissingCursor,

    #[error("order-by value supplied but no order-by column is configured")]
    MissingOrderByColumn,

    #[error("page size must be a positive integer, got {0}")]
    InvalidPageSize(usize),
}
