use crate::error::DbError;
use model::{
    core::value::Value,
    records::row::{FieldValue, RowData},
};
use planner::query::ast::{
    common::OrderDir,
    expr::{BinaryOp, BinaryOperator, Expr},
    select::{OrderByExpr, Select},
};
use std::cmp::Ordering;

/// Resolves an expression against a source row. Identifiers are matched on
/// their bare name; the qualifier is ignored since rows carry no table prefix.
pub fn eval_expr(expr: &Expr, row: &RowData) -> Result<Value, DbError> {
    match expr {
        Expr::Identifier(ident) => Ok(row.get_value(&ident.name)),
        Expr::Value(value) => Ok(value.clone()),
        Expr::Alias { expr, .. } => eval_expr(expr, row),
        Expr::BinaryOp(_) | Expr::Not(_) => Ok(match eval_predicate(expr, row)? {
            Some(b) => Value::Boolean(b),
            None => Value::Null,
        }),
        Expr::FunctionCall(func) => Err(DbError::Unsupported(format!(
            "function call {}()",
            func.name
        ))),
        Expr::Wildcard => Err(DbError::Unsupported("* outside projection".into())),
    }
}

/// Three-valued evaluation: `None` is SQL `UNKNOWN`.
pub fn eval_predicate(expr: &Expr, row: &RowData) -> Result<Option<bool>, DbError> {
    match expr {
        Expr::BinaryOp(op) => eval_binary(op, row),
        Expr::Not(inner) => Ok(eval_predicate(inner, row)?.map(|b| !b)),
        other => {
            let value = eval_expr(other, row)?;
            if value.is_null() {
                Ok(None)
            } else {
                Ok(value.as_bool())
            }
        }
    }
}

fn eval_binary(op: &BinaryOp, row: &RowData) -> Result<Option<bool>, DbError> {
    match op.op {
        BinaryOperator::And => {
            let left = eval_predicate(&op.left, row)?;
            if left == Some(false) {
                return Ok(Some(false));
            }
            let right = eval_predicate(&op.right, row)?;
            Ok(match (left, right) {
                (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            })
        }
        BinaryOperator::Or => {
            let left = eval_predicate(&op.left, row)?;
            if left == Some(true) {
                return Ok(Some(true));
            }
            let right = eval_predicate(&op.right, row)?;
            Ok(match (left, right) {
                (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            })
        }
        cmp => {
            let left = eval_expr(&op.left, row)?;
            let right = eval_expr(&op.right, row)?;
            if left.is_null() || right.is_null() {
                return Ok(None);
            }
            let Some(ordering) = left.compare(&right) else {
                return Err(DbError::Unsupported(format!(
                    "cannot compare {left:?} with {right:?}"
                )));
            };
            Ok(Some(comparison_holds(cmp, ordering)))
        }
    }
}

fn comparison_holds(op: BinaryOperator, ordering: Ordering) -> bool {
    use BinaryOperator::*;
    use Ordering::*;
    matches!(
        (op, ordering),
        (Eq, Equal)
            | (NotEq, Less | Greater)
            | (Lt, Less)
            | (LtEq, Less | Equal)
            | (Gt, Greater)
            | (GtEq, Greater | Equal)
    )
}

/// Compares two rows by a list of sort keys. Incomparable values are treated
/// as equal so the (stable) sort keeps their input order.
pub fn compare_rows(
    order_by: &[OrderByExpr],
    a: &RowData,
    b: &RowData,
) -> Result<Ordering, DbError> {
    for key in order_by {
        let left = eval_expr(&key.expr, a)?;
        let right = eval_expr(&key.expr, b)?;
        let ordering = left.compare(&right).unwrap_or(Ordering::Equal);
        let ordering = match key.direction {
            Some(OrderDir::Desc) => ordering.reverse(),
            _ => ordering,
        };
        if ordering != Ordering::Equal {
            return Ok(ordering);
        }
    }
    Ok(Ordering::Equal)
}

pub fn eval_count(expr: &Option<Expr>, row: &RowData) -> Result<Option<usize>, DbError> {
    let Some(expr) = expr else {
        return Ok(None);
    };
    let value = eval_expr(expr, row)?;
    value
        .as_usize()
        .map(Some)
        .ok_or_else(|| DbError::InvalidLimit(value.to_string()))
}

/// Applies the projection list to a source row.
pub fn project(columns: &[Expr], row: &RowData) -> Result<RowData, DbError> {
    let mut fields = Vec::with_capacity(columns.len());
    for column in columns {
        match column {
            Expr::Wildcard => fields.extend(row.field_values.iter().cloned()),
            Expr::Identifier(ident) => {
                fields.push(FieldValue::new(ident.name.clone(), row.get_value(&ident.name)))
            }
            Expr::Alias { expr, alias } => {
                fields.push(FieldValue::new(alias.clone(), eval_expr(expr, row)?))
            }
            other => {
                return Err(DbError::Unsupported(format!(
                    "projection of {other:?}"
                )));
            }
        }
    }
    Ok(RowData::new(&row.entity, fields))
}

/// Runs `select` over the rows of its FROM table.
pub fn run(select: &Select, rows: &[RowData]) -> Result<Vec<RowData>, DbError> {
    if !select.joins.is_empty() {
        return Err(DbError::Unsupported("JOIN".into()));
    }

    let mut matched = Vec::new();
    for row in rows {
        let keep = match &select.where_clause {
            Some(cond) => eval_predicate(cond, row)? == Some(true),
            None => true,
        };
        if keep {
            matched.push(row);
        }
    }

    if !select.order_by.is_empty() {
        // sort_by cannot propagate errors, so surface the first one afterwards
        let mut failure = None;
        matched.sort_by(|a, b| {
            compare_rows(&select.order_by, a, b).unwrap_or_else(|err| {
                failure.get_or_insert(err);
                Ordering::Equal
            })
        });
        if let Some(err) = failure {
            return Err(err);
        }
    }

    let empty = RowData::new("", Vec::new());
    let offset = eval_count(&select.offset, &empty)?.unwrap_or(0);
    let limit = eval_count(&select.limit, &empty)?.unwrap_or(usize::MAX);

    matched
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(|row| project(&select.columns, row))
        .collect()
}
