//! Defines common, reusable AST nodes for building SQL queries.

use model::pagination::order::SortOrder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub schema: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDir {
    Asc,
    Desc,
}

impl From<SortOrder> for OrderDir {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => OrderDir::Asc,
            SortOrder::Desc => OrderDir::Desc,
        }
    }
}
