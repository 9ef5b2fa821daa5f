#![allow(dead_code)]

use connectors::{executor::QueryExecutor, memory::MemoryDb};
use model::{
    core::{column::ColumnDescriptor, value::Value},
    records::row::{FieldValue, RowData},
};
use paginator::{Paginator, PaginatorConfig};
use planner::query::{
    ast::common::TableRef,
    builder::select::{FromState, SelectBuilder},
    projection,
};
use std::sync::Arc;

/// Default table used by the in-memory scenarios.
pub const ITEMS: &str = "items";

/// One step of a paging walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Next,
    Previous,
}

pub fn item(id: i64, name: &str) -> RowData {
    RowData::new(
        ITEMS,
        vec![FieldValue::new("id", id), FieldValue::new("name", name)],
    )
}

pub fn items(data: &[(i64, &str)]) -> Vec<RowData> {
    data.iter().map(|(id, name)| item(*id, name)).collect()
}

pub async fn memory_db(table: &str, rows: Vec<RowData>) -> Arc<MemoryDb> {
    let db = MemoryDb::new();
    db.create_table(table).await;
    db.insert(table, rows).await;
    Arc::new(db)
}

/// `SELECT <cursor column>[, <order-by column>] FROM table [AS alias]`,
/// projected the way the column expressions ask for.
pub fn keys_query(
    table: &str,
    alias: Option<&str>,
    config: &PaginatorConfig,
) -> SelectBuilder<FromState> {
    let mut columns = vec![projection(&column(&config.cursor_column))];
    if let Some(order_by) = &config.order_by_column {
        columns.push(projection(&column(order_by)));
    }

    SelectBuilder::new().select(columns).from(
        TableRef {
            schema: None,
            name: table.to_string(),
        },
        alias,
    )
}

pub fn column(expr: &str) -> ColumnDescriptor {
    ColumnDescriptor::parse(expr).expect("valid column expression")
}

/// Reads an integer cell, panicking on anything else.
pub fn int_cell(row: &RowData, field: &str) -> i64 {
    match row.get_value(field) {
        Value::Int(v) => v,
        other => panic!("Expected integer in '{field}', got {other:?}"),
    }
}

pub fn ids(rows: &[RowData]) -> Vec<i64> {
    rows.iter().map(|row| int_cell(row, "id")).collect()
}

/// Every sequence of `options.len()` names drawn (with repetition) from
/// `options`, each turned into rows with ids `0..n`.
pub fn name_permutations(options: &[&str]) -> Vec<Vec<(i64, String)>> {
    let mut sequences: Vec<Vec<&str>> = vec![Vec::new()];
    for _ in 0..options.len() {
        sequences = sequences
            .into_iter()
            .flat_map(|prefix| {
                options.iter().map(move |name| {
                    let mut next = prefix.clone();
                    next.push(*name);
                    next
                })
            })
            .collect();
    }

    sequences
        .into_iter()
        .map(|names| {
            names
                .into_iter()
                .enumerate()
                .map(|(id, name)| (id as i64, name.to_string()))
                .collect()
        })
        .collect()
}

/// The walk used by the stress scenarios: one step forward, then for every
/// `i` in `1..total / page_size` go `i` pages forward and `i` pages back,
/// then one more step forward and back.
pub fn moves(total: usize, page_size: usize) -> Vec<Move> {
    let mut moves = vec![Move::Next];
    for i in 1..total / page_size {
        moves.extend(std::iter::repeat_n(Move::Next, i));
        moves.extend(std::iter::repeat_n(Move::Previous, i));
    }
    moves.extend([Move::Next, Move::Previous]);
    moves
}

/// Walks the result set with `config`, restoring the paginator from its
/// serialized token after every step, and checks each page against a single
/// reference page that holds the whole (four-row) result.
pub async fn check_paging(
    executor: Arc<dyn QueryExecutor>,
    query: SelectBuilder<FromState>,
    config: PaginatorConfig,
    context: &str,
) {
    let id_field = column(&config.cursor_column).output_name;
    let page_size = config.page_size;

    let reference = Paginator::new(
        executor.clone(),
        query.clone(),
        PaginatorConfig {
            page_size: 4,
            ..config.clone()
        },
    )
    .expect("reference paginator")
    .next()
    .await
    .expect("reference page");

    let mut paginator =
        Paginator::new(executor.clone(), query.clone(), config).expect("paginator");
    let mut reference_cursor = 0usize;

    for (step, direction) in moves(reference.len(), page_size).into_iter().enumerate() {
        let page = match direction {
            Move::Next => paginator.next().await.expect("next page"),
            Move::Previous => {
                reference_cursor -= page_size * 2;
                paginator.previous().await.expect("previous page")
            }
        };

        assert_eq!(
            page.len(),
            page_size,
            "{context}: step {step} ({direction:?}) returned a short page"
        );
        for row in &page {
            assert_eq!(
                int_cell(row, &id_field),
                int_cell(&reference[reference_cursor], &id_field),
                "{context}: step {step} ({direction:?}) diverged from the reference order"
            );
            reference_cursor += 1;
        }

        let token = paginator.serialize().expect("serialize");
        paginator = Paginator::restore(executor.clone(), query.clone(), &token).expect("restore");
    }
}
