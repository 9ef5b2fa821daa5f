use model::{
    core::value::Value,
    records::row::{FieldValue, RowData},
};
use tokio_postgres::{Row as PgRow, types::Json as PgJson};
use tracing::warn;

/// Converts a driver row into a `RowData`, decoding each column by its
/// Postgres type name.
///
/// `NUMERIC` is read as a `Decimal` so cursor values keep their precision and
/// sort numerically.
pub fn to_row_data(row: &PgRow, entity: &str) -> RowData {
    let fields = row
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let type_name = column.type_().name();
            let value = get_value(row, idx, type_name).unwrap_or_else(|| {
                warn!(
                    column = column.name(),
                    r#type = type_name,
                    "Unsupported or undecodable column type, reading as NULL"
                );
                Value::Null
            });
            FieldValue {
                name: column.name().to_string(),
                value,
            }
        })
        .collect();

    RowData::new(entity, fields)
}

/// `Some(Value::Null)` for SQL NULL; `None` when the column cannot be decoded.
fn get_value(row: &PgRow, idx: usize, type_name: &str) -> Option<Value> {
    match type_name {
        "int2" => read(row, idx, |v: i16| Value::Int(v as i64)),
        "int4" => read(row, idx, |v: i32| Value::Int(v as i64)),
        "int8" => read(row, idx, Value::Int),
        "oid" => read(row, idx, |v: u32| Value::Uint(v as u64)),
        "float4" => read(row, idx, |v: f32| Value::Float(v as f64)),
        "float8" => read(row, idx, Value::Float),
        "numeric" => read(row, idx, Value::Decimal),
        "bool" => read(row, idx, Value::Boolean),
        "text" | "varchar" | "bpchar" | "name" | "citext" => read(row, idx, Value::String),
        "json" | "jsonb" => read(row, idx, |v: PgJson<serde_json::Value>| Value::Json(v.0)),
        "uuid" => read(row, idx, Value::Uuid),
        "bytea" => read(row, idx, Value::Bytes),
        "date" => read(row, idx, Value::Date),
        "timestamptz" => read(row, idx, Value::Timestamp),
        "timestamp" => read(row, idx, |v: chrono::NaiveDateTime| {
            Value::Timestamp(v.and_utc())
        }),
        _ => None,
    }
}

fn read<'a, T, F>(row: &'a PgRow, idx: usize, convert: F) -> Option<Value>
where
    T: tokio_postgres::types::FromSql<'a>,
    F: FnOnce(T) -> Value,
{
    match row.try_get::<_, Option<T>>(idx) {
        Ok(Some(v)) => Some(convert(v)),
        Ok(None) => Some(Value::Null),
        Err(_) => None,
    }
}
