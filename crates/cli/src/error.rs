use connectors::error::ConnectorError;
use paginator::PaginatorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read or write a file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to deserialize the configuration file as JSON: {0}")]
    ConfigDeserialize(#[from] serde_json::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Missing required setting: {0}")]
    MissingSetting(&'static str),

    #[error("Invalid column expression: {0:?}")]
    InvalidColumn(String),

    #[error("Unsupported SQL dialect: {0}")]
    UnsupportedDialect(String),

    #[error("Connection failed: {0}")]
    Connector(#[from] ConnectorError),

    #[error("Pagination failed: {0}")]
    Paginator(#[from] PaginatorError),
}
