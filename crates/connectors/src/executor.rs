use crate::error::DbError;
use async_trait::async_trait;
use model::records::row::RowData;
use planner::query::ast::select::Select;

/// Runs a shaped `SELECT` and returns its rows, each keyed by output column
/// name, in the order the query produces them.
///
/// Implementations must honour WHERE, ORDER BY, LIMIT and OFFSET exactly as
/// SQL does; pagination correctness rests on it.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn fetch(&self, query: &Select) -> Result<Vec<RowData>, DbError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}
