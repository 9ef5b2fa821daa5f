pub mod config;
pub mod error;
pub mod paginator;

pub use config::{FetchOptions, PaginatorConfig};
pub use error::PaginatorError;
pub use paginator::{Direction, Paginator, page_query};
