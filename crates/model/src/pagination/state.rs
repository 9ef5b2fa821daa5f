//! The serializable state behind a paginator.
//!
//! A state is a plain value: fetching a page produces a new state through
//! [`PaginatorState::advance`] instead of mutating the old one in place. Its
//! JSON form is the opaque cursor token handed to API clients.

use crate::{
    core::{column::ColumnDescriptor, value::Value},
    pagination::order::SortOrder,
};
use serde::{Deserialize, Serialize};

/// A position between two rows, expressed as the sort-key values of the row
/// on its near side.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Boundary {
    pub cursor: Option<Value>,
    pub order_by_value: Option<Value>,
}

impl Boundary {
    pub fn new(cursor: Value, order_by_value: Option<Value>) -> Self {
        Self {
            cursor: Some(cursor),
            // a NULL order-by value carries no boundary information
            order_by_value: order_by_value.filter(|v| !v.is_null()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.is_none() && self.order_by_value.is_none()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PaginatorState {
    pub cursor_column: ColumnDescriptor,
    pub order_by_column: Option<ColumnDescriptor>,
    pub order: SortOrder,
    pub page_size: usize,

    /// Boundary for the next forward page (last row of the current window).
    #[serde(default)]
    pub head_cursor: Option<Value>,
    #[serde(default)]
    pub head_order_by_value: Option<Value>,

    /// Boundary for the next backward page (first row of the current window).
    #[serde(default)]
    pub tail_cursor: Option<Value>,
    #[serde(default)]
    pub tail_order_by_value: Option<Value>,
}

impl PaginatorState {
    pub fn new(
        cursor_column: ColumnDescriptor,
        order_by_column: Option<ColumnDescriptor>,
        order: SortOrder,
        page_size: usize,
    ) -> Self {
        Self {
            cursor_column,
            order_by_column,
            order,
            page_size,
            head_cursor: None,
            head_order_by_value: None,
            tail_cursor: None,
            tail_order_by_value: None,
        }
    }

    /// Starts forward pagination from an explicit boundary instead of the
    /// beginning of the result set.
    pub fn with_head(mut self, head: Boundary) -> Self {
        self.head_cursor = head.cursor;
        self.head_order_by_value = head.order_by_value;
        self
    }

    pub fn head(&self) -> Boundary {
        Boundary {
            cursor: self.head_cursor.clone(),
            order_by_value: self.head_order_by_value.clone(),
        }
    }

    pub fn tail(&self) -> Boundary {
        Boundary {
            cursor: self.tail_cursor.clone(),
            order_by_value: self.tail_order_by_value.clone(),
        }
    }

    /// True once a non-empty page has been fetched.
    pub fn is_positioned(&self) -> bool {
        self.head_cursor.is_some() || self.tail_cursor.is_some()
    }

    /// Returns the state after a page whose first and last rows (in display
    /// order) carry the given keys.
    pub fn advance(&self, first: Boundary, last: Boundary) -> Self {
        Self {
            head_cursor: last.cursor,
            head_order_by_value: last.order_by_value,
            tail_cursor: first.cursor,
            tail_order_by_value: first.order_by_value,
            ..self.clone()
        }
    }

    pub fn to_token(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_token(token: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(token)
    }
}
