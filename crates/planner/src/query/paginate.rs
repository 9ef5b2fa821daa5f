//! Shapes a base SELECT into a single keyset page.
//!
//! Given `(order_by?, cursor)` sort keys and a boundary row, the shaped query
//! returns the rows strictly after the boundary in that lexicographic order:
//!
//! ```text
//! -- single key, ascending
//! WHERE cursor > :cursor ORDER BY cursor ASC LIMIT :page_size
//!
//! -- two keys, ascending
//! WHERE order_by >= :value
//!   AND NOT (order_by = :value AND cursor <= :cursor)
//! ORDER BY order_by ASC, cursor ASC LIMIT :page_size
//! ```
//!
//! The cursor column is always the final tie-break, so it must be unique for
//! the ordering to be total.

use crate::{
    error::PaginationConfigError,
    query::{
        ast::{common::OrderDir, expr::BinaryOperator, expr::Expr},
        builder::select::{FromState, SelectBuilder},
        column, value,
    },
};
use model::{
    core::{column::ColumnDescriptor, value::Value},
    pagination::{order::SortOrder, state::Boundary},
};
use tracing::debug;

/// A single page request: sort keys, direction, window and boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginateConfig {
    pub cursor_column: ColumnDescriptor,
    pub order_by_column: Option<ColumnDescriptor>,
    pub order: SortOrder,
    pub page_size: usize,
    pub cursor: Option<Value>,
    pub order_by_value: Option<Value>,
    pub page_offset: Option<usize>,
}

impl PaginateConfig {
    pub fn new(cursor_column: ColumnDescriptor, order: SortOrder, page_size: usize) -> Self {
        Self {
            cursor_column,
            order_by_column: None,
            order,
            page_size,
            cursor: None,
            order_by_value: None,
            page_offset: None,
        }
    }

    pub fn order_by(mut self, column: Option<ColumnDescriptor>) -> Self {
        self.order_by_column = column;
        self
    }

    /// Positions the page just after `boundary`.
    pub fn after(mut self, boundary: Boundary) -> Self {
        self.cursor = boundary.cursor;
        self.order_by_value = boundary.order_by_value;
        self
    }

    pub fn page_offset(mut self, page_offset: Option<usize>) -> Self {
        self.page_offset = page_offset;
        self
    }

    pub fn validate(&self) -> Result<(), PaginationConfigError> {
        if self.page_size == 0 {
            return Err(PaginationConfigError::InvalidPageSize(self.page_size));
        }
        if self.order_by_value.is_some() {
            if self.cursor.is_none() {
                return Err(PaginationConfigError::MissingCursor);
            }
            if self.order_by_column.is_none() {
                return Err(PaginationConfigError::MissingOrderByColumn);
            }
        }
        Ok(())
    }
}

/// Applies the boundary predicate, ordering and window of `config` to `query`.
///
/// The builder is consumed and a new one returned; callers keep their
/// template by passing a clone. Nothing is executed here.
pub fn paginate(
    mut query: SelectBuilder<FromState>,
    config: &PaginateConfig,
) -> Result<SelectBuilder<FromState>, PaginationConfigError> {
    config.validate()?;

    let cursor_col = column(&config.cursor_column);

    // (strictly after, at-or-after, at-or-before) for the configured direction
    let (after, at_or_after, at_or_before) = match config.order {
        SortOrder::Asc => (BinaryOperator::Gt, BinaryOperator::GtEq, BinaryOperator::LtEq),
        SortOrder::Desc => (BinaryOperator::Lt, BinaryOperator::LtEq, BinaryOperator::GtEq),
    };

    match (&config.cursor, &config.order_by_value) {
        // first page
        (None, None) => {}

        (None, Some(_)) => return Err(PaginationConfigError::MissingCursor),

        (Some(cursor), None) => {
            query = query.and_where(Expr::binary(
                cursor_col.clone(),
                after,
                value(cursor.clone()),
            ));
        }

        (Some(cursor), Some(order_by_value)) => {
            let order_by_col = config
                .order_by_column
                .as_ref()
                .map(column)
                .ok_or(PaginationConfigError::MissingOrderByColumn)?;

            // order_by >= v AND NOT (order_by = v AND cursor <= c)
            query = query
                .and_where(Expr::binary(
                    order_by_col.clone(),
                    at_or_after,
                    value(order_by_value.clone()),
                ))
                .and_where_not(
                    Expr::binary(
                        order_by_col,
                        BinaryOperator::Eq,
                        value(order_by_value.clone()),
                    )
                    .and(Expr::binary(
                        cursor_col.clone(),
                        at_or_before,
                        value(cursor.clone()),
                    )),
                );
        }
    }

    let direction = OrderDir::from(config.order);
    if let Some(order_by) = &config.order_by_column {
        query = query.order_by(column(order_by), Some(direction));
    }
    query = query
        .order_by(cursor_col, Some(direction))
        .limit(value(Value::Uint(config.page_size as u64)));

    if let Some(page_offset) = config.page_offset.filter(|offset| *offset > 0) {
        let skip = page_offset.saturating_mul(config.page_size);
        query = query.offset(value(Value::Uint(skip as u64)));
    }

    debug!(
        cursor_column = %config.cursor_column.reference,
        order = %config.order,
        page_size = config.page_size,
        bounded = config.cursor.is_some(),
        "Shaped page query"
    );

    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        query::{
            ast::expr::Ident, builder::select::SelectBuilder, dialect::Postgres, ident,
            renderer::render,
        },
        table_ref,
    };

    fn base() -> SelectBuilder<FromState> {
        SelectBuilder::new()
            .select(vec![Expr::Wildcard])
            .from(table_ref!("items"), None)
    }

    fn col(expr: &str) -> ColumnDescriptor {
        ColumnDescriptor::parse(expr).unwrap()
    }

    fn sql(config: &PaginateConfig) -> (String, Vec<Value>) {
        let select = paginate(base(), config).unwrap().build();
        render(&select, &Postgres)
    }

    #[test]
    fn test_first_page_has_no_predicate() {
        let config = PaginateConfig::new(col("id"), SortOrder::Asc, 2);
        let (sql, params) = sql(&config);

        assert_eq!(sql, r#"SELECT * FROM "items" ORDER BY "id" ASC LIMIT $1"#);
        assert_eq!(params, vec![Value::Uint(2)]);
    }

    #[test]
    fn test_single_key_ascending() {
        let config = PaginateConfig::new(col("id"), SortOrder::Asc, 2)
            .after(Boundary::new(Value::Int(5), None));
        let (sql, params) = sql(&config);

        assert_eq!(
            sql,
            r#"SELECT * FROM "items" WHERE ("id" > $1) ORDER BY "id" ASC LIMIT $2"#
        );
        assert_eq!(params, vec![Value::Int(5), Value::Uint(2)]);
    }

    #[test]
    fn test_single_key_descending() {
        let config = PaginateConfig::new(col("id"), SortOrder::Desc, 2)
            .after(Boundary::new(Value::Int(5), None));
        let (sql, _) = sql(&config);

        assert_eq!(
            sql,
            r#"SELECT * FROM "items" WHERE ("id" < $1) ORDER BY "id" DESC LIMIT $2"#
        );
    }

    #[test]
    fn test_two_key_ascending() {
        let config = PaginateConfig::new(col("id"), SortOrder::Asc, 2)
            .order_by(Some(col("name")))
            .after(Boundary::new(Value::Int(1), Some(Value::from("b"))));
        let (sql, params) = sql(&config);

        assert_eq!(
            sql,
            r#"SELECT * FROM "items" WHERE (("name" >= $1) AND NOT (("name" = $2) AND ("id" <= $3))) ORDER BY "name" ASC, "id" ASC LIMIT $4"#
        );
        assert_eq!(
            params,
            vec![
                Value::from("b"),
                Value::from("b"),
                Value::Int(1),
                Value::Uint(2)
            ]
        );
    }

    #[test]
    fn test_two_key_descending() {
        let config = PaginateConfig::new(col("id"), SortOrder::Desc, 3)
            .order_by(Some(col("name")))
            .after(Boundary::new(Value::Int(1), Some(Value::from("b"))));
        let (sql, _) = sql(&config);

        assert_eq!(
            sql,
            r#"SELECT * FROM "items" WHERE (("name" <= $1) AND NOT (("name" = $2) AND ("id" >= $3))) ORDER BY "name" DESC, "id" DESC LIMIT $4"#
        );
    }

    #[test]
    fn test_order_by_column_without_value_uses_cursor_only() {
        let config = PaginateConfig::new(col("id"), SortOrder::Asc, 2)
            .order_by(Some(col("name")))
            .after(Boundary::new(Value::Int(7), None));
        let (sql, _) = sql(&config);

        assert_eq!(
            sql,
            r#"SELECT * FROM "items" WHERE ("id" > $1) ORDER BY "name" ASC, "id" ASC LIMIT $2"#
        );
    }

    #[test]
    fn test_page_offset_multiplies_page_size() {
        let config = PaginateConfig::new(col("id"), SortOrder::Asc, 3).page_offset(Some(2));
        let (sql, params) = sql(&config);

        assert_eq!(
            sql,
            r#"SELECT * FROM "items" ORDER BY "id" ASC LIMIT $1 OFFSET $2"#
        );
        assert_eq!(params, vec![Value::Uint(3), Value::Uint(6)]);
    }

    #[test]
    fn test_zero_page_offset_is_ignored() {
        let config = PaginateConfig::new(col("id"), SortOrder::Asc, 3).page_offset(Some(0));
        let select = paginate(base(), &config).unwrap().build();
        assert!(select.offset.is_none());
    }

    #[test]
    fn test_order_by_value_without_cursor_is_rejected() {
        let mut config = PaginateConfig::new(col("id"), SortOrder::Asc, 2).order_by(Some(col("name")));
        config.order_by_value = Some(Value::from("b"));

        assert_eq!(
            paginate(base(), &config).unwrap_err(),
            PaginationConfigError::MissingCursor
        );
    }

    #[test]
    fn test_order_by_value_without_column_is_rejected() {
        let config = PaginateConfig::new(col("id"), SortOrder::Asc, 2)
            .after(Boundary::new(Value::Int(1), Some(Value::from("b"))));

        assert_eq!(
            paginate(base(), &config).unwrap_err(),
            PaginationConfigError::MissingOrderByColumn
        );
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let config = PaginateConfig::new(col("id"), SortOrder::Asc, 0);
        assert_eq!(
            paginate(base(), &config).unwrap_err(),
            PaginationConfigError::InvalidPageSize(0)
        );
    }

    #[test]
    fn test_qualified_aliased_columns() {
        let config = PaginateConfig::new(col("t.id as idAlias"), SortOrder::Asc, 2)
            .order_by(Some(col("t.name as nameAlias")))
            .after(Boundary::new(Value::Int(1), Some(Value::from("a"))));
        let select = paginate(base(), &config).unwrap().build();

        assert_eq!(
            select.order_by[1].expr,
            Expr::Identifier(Ident {
                qualifier: Some("t".to_string()),
                name: "id".to_string(),
            })
        );
        let (sql, _) = render(&select, &Postgres);
        assert!(sql.contains(r#"ORDER BY "t"."name" ASC, "t"."id" ASC"#));
    }

    #[test]
    fn test_existing_where_is_preserved() {
        let query = base().where_clause(Expr::binary(
            ident("active"),
            BinaryOperator::Eq,
            value(Value::Boolean(true)),
        ));
        let config = PaginateConfig::new(col("id"), SortOrder::Asc, 2)
            .after(Boundary::new(Value::Int(4), None));
        let (sql, params) = render(&paginate(query, &config).unwrap().build(), &Postgres);

        assert_eq!(
            sql,
            r#"SELECT * FROM "items" WHERE (("active" = $1) AND ("id" > $2)) ORDER BY "id" ASC LIMIT $3"#
        );
        assert_eq!(
            params,
            vec![Value::Boolean(true), Value::Int(4), Value::Uint(2)]
        );
    }

    #[test]
    fn test_template_is_not_modified() {
        let template = base();
        let config = PaginateConfig::new(col("id"), SortOrder::Asc, 2)
            .after(Boundary::new(Value::Int(4), None));
        let _ = paginate(template.clone(), &config).unwrap();

        assert!(template.ast().where_clause.is_none());
        assert!(template.ast().order_by.is_empty());
    }
}
