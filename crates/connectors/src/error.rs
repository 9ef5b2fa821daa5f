use thiserror::Error;

/// All errors coming from executing a query.
#[derive(Debug, Error)]
pub enum DbError {
    /// Any error reported by the Postgres driver.
    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// The query selects from a table the executor does not know.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// The query uses a construct the executor cannot evaluate.
    #[error("Unsupported query: {0}")]
    Unsupported(String),

    /// LIMIT or OFFSET did not evaluate to a non-negative integer.
    #[error("Invalid LIMIT/OFFSET: {0}")]
    InvalidLimit(String),
}

/// Errors happening during connection setup.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("Postgres connection failed: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}
