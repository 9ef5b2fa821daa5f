use crate::error::PaginatorError;
use model::{
    core::{column::ColumnDescriptor, value::Value},
    pagination::{order::SortOrder, state::Boundary, state::PaginatorState},
};
use planner::error::PaginationConfigError;
use serde::{Deserialize, Serialize};

/// Construction input for a [`crate::Paginator`].
///
/// Column fields hold raw expressions such as `"t.id as idAlias"`. An optional
/// `cursor` / `order_by_value` pair starts forward paging just after a known
/// row instead of at the beginning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginatorConfig {
    pub cursor_column: String,
    #[serde(default)]
    pub order_by_column: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
    pub page_size: usize,
    #[serde(default)]
    pub cursor: Option<Value>,
    #[serde(default)]
    pub order_by_value: Option<Value>,
}

impl PaginatorConfig {
    pub fn new(cursor_column: impl Into<String>, page_size: usize) -> Self {
        Self {
            cursor_column: cursor_column.into(),
            order_by_column: None,
            order: SortOrder::Asc,
            page_size,
            cursor: None,
            order_by_value: None,
        }
    }

    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by_column = Some(column.into());
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn starting_after(mut self, cursor: Value, order_by_value: Option<Value>) -> Self {
        self.cursor = Some(cursor);
        self.order_by_value = order_by_value;
        self
    }

    /// Parses the column expressions and checks the starting boundary.
    pub fn into_state(self) -> Result<PaginatorState, PaginatorError> {
        if self.page_size == 0 {
            return Err(PaginationConfigError::InvalidPageSize(0).into());
        }

        let cursor_column = ColumnDescriptor::parse(&self.cursor_column)
            .ok_or_else(|| PaginatorError::InvalidColumn(self.cursor_column.clone()))?;
        // a blank order-by expression means "no order-by column"
        let order_by_column = self
            .order_by_column
            .as_deref()
            .and_then(ColumnDescriptor::parse);

        let order_by_value = self.order_by_value.filter(|v| !v.is_null());
        if order_by_value.is_some() && order_by_column.is_none() {
            return Err(PaginationConfigError::MissingOrderByColumn.into());
        }

        let state = PaginatorState::new(cursor_column, order_by_column, self.order, self.page_size);
        match (self.cursor.filter(|v| !v.is_null()), order_by_value) {
            (None, None) => Ok(state),
            (None, Some(_)) => Err(PaginationConfigError::MissingCursor.into()),
            (Some(cursor), order_by_value) => {
                Ok(state.with_head(Boundary::new(cursor, order_by_value)))
            }
        }
    }
}

/// Per-call overrides for a single fetch. Never stored in the state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Skip this many whole pages past the boundary.
    pub page_offset: Option<usize>,
}

impl FetchOptions {
    pub fn page_offset(page_offset: usize) -> Self {
        Self {
            page_offset: Some(page_offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_aliased_columns() {
        let state = PaginatorConfig::new("t.id as idAlias", 2)
            .order_by("t.name AS nameAlias")
            .into_state()
            .unwrap();

        assert_eq!(state.cursor_column, ColumnDescriptor::new("t.id", "idAlias"));
        assert_eq!(
            state.order_by_column,
            Some(ColumnDescriptor::new("t.name", "nameAlias"))
        );
        assert!(!state.is_positioned());
    }

    #[test]
    fn test_blank_order_by_is_ignored() {
        let state = PaginatorConfig::new("id", 2).order_by("  ").into_state().unwrap();
        assert!(state.order_by_column.is_none());
    }

    #[test]
    fn test_blank_cursor_column_is_rejected() {
        let err = PaginatorConfig::new(" ", 2).into_state().unwrap_err();
        assert!(matches!(err, PaginatorError::InvalidColumn(_)));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let err = PaginatorConfig::new("id", 0).into_state().unwrap_err();
        assert!(matches!(
            err,
            PaginatorError::Config(PaginationConfigError::InvalidPageSize(0))
        ));
    }

    #[test]
    fn test_starting_boundary_becomes_head() {
        let state = PaginatorConfig::new("id", 2)
            .order_by("name")
            .starting_after(Value::Int(3), Some(Value::from("c")))
            .into_state()
            .unwrap();

        assert_eq!(state.head(), Boundary::new(Value::Int(3), Some(Value::from("c"))));
        assert_eq!(state.tail(), Boundary::default());
    }

    #[test]
    fn test_order_by_value_needs_cursor() {
        let mut config = PaginatorConfig::new("id", 2).order_by("name");
        config.order_by_value = Some(Value::from("c"));

        let err = config.into_state().unwrap_err();
        assert!(matches!(
            err,
            PaginatorError::Config(PaginationConfigError::MissingCursor)
        ));
    }

    #[test]
    fn test_deserializes_with_defaults() {
        let config: PaginatorConfig =
            serde_json::from_str(r#"{"cursor_column": "id", "page_size": 10}"#).unwrap();
        assert_eq!(config, PaginatorConfig::new("id", 10));
    }
}
