use crate::{error::DbError, executor::QueryExecutor, memory::eval};
use async_trait::async_trait;
use model::records::row::RowData;
use planner::query::ast::select::Select;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::debug;

/// Named tables of rows held in memory. Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryDb {
    tables: Arc<RwLock<HashMap<String, Vec<RowData>>>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table, leaving an existing one untouched.
    pub async fn create_table(&self, table: &str) {
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default();
    }

    /// Appends rows to `table`, creating it if needed.
    pub async fn insert(&self, table: &str, rows: Vec<RowData>) {
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().extend(rows);
    }

    pub async fn truncate(&self, table: &str) {
        if let Some(rows) = self.tables.write().await.get_mut(table) {
            rows.clear();
        }
    }

    pub async fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl QueryExecutor for MemoryDb {
    async fn fetch(&self, query: &Select) -> Result<Vec<RowData>, DbError> {
        let from = query
            .from
            .as_ref()
            .ok_or_else(|| DbError::Unsupported("SELECT without FROM".into()))?;

        let tables = self.tables.read().await;
        let rows = tables
            .get(&from.table.name)
            .ok_or_else(|| DbError::TableNotFound(from.table.name.clone()))?;

        let result = eval::run(query, rows)?;
        debug!(
            table = %from.table.name,
            scanned = rows.len(),
            returned = result.len(),
            "In-memory query evaluated"
        );
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{core::value::Value, records::row::FieldValue};
    use planner::{
        query::{ast::expr::Expr, builder::select::SelectBuilder},
        table_ref,
    };

    fn select_all(table: &str) -> Select {
        SelectBuilder::new()
            .select(vec![Expr::Wildcard])
            .from(table_ref!(table), None)
            .build()
    }

    #[tokio::test]
    async fn test_fetch_unknown_table() {
        let db = MemoryDb::new();
        let err = db.fetch(&select_all("missing")).await.unwrap_err();
        assert!(matches!(err, DbError::TableNotFound(name) if name == "missing"));
    }

    #[tokio::test]
    async fn test_clones_share_tables() {
        let db = MemoryDb::new();
        db.create_table("items").await;
        assert!(db.fetch(&select_all("items")).await.unwrap().is_empty());

        let other = db.clone();
        other
            .insert(
                "items",
                vec![RowData::new("items", vec![FieldValue::new("id", 1)])],
            )
            .await;

        let rows = db.fetch(&select_all("items")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_value("id"), Value::Int(1));

        db.truncate("items").await;
        assert_eq!(other.row_count("items").await, 0);
    }
}
