//! Bind parameters for `tokio-postgres`.
//!
//! Cursor values round-trip through JSON tokens, so a value bound on a later
//! request may not carry the exact Rust type of the column it is compared to
//! (an `INT4` cursor comes back as `Value::Int`, a whole `NUMERIC` may be
//! compared against an integer column).
//! `PgParam` therefore encodes against the parameter type the server inferred
//! for the placeholder rather than the variant it holds.

use bytes::BytesMut;
use model::core::value::Value;
use rust_decimal::Decimal;
use std::{error::Error, str::FromStr};
use tokio_postgres::types::{IsNull, Json as PgJson, ToSql, Type, to_sql_checked};

type BoxError = Box<dyn Error + Sync + Send>;

#[derive(Debug)]
pub struct PgParam(Value);

impl PgParam {
    pub fn from_value(value: Value) -> Self {
        PgParam(value)
    }
}

fn is_text(ty: &Type) -> bool {
    *ty == Type::TEXT || *ty == Type::VARCHAR || *ty == Type::BPCHAR || *ty == Type::NAME
}

fn encode_integer(v: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    if *ty == Type::INT2 {
        i16::try_from(v)?.to_sql(ty, out)
    } else if *ty == Type::INT4 {
        i32::try_from(v)?.to_sql(ty, out)
    } else if *ty == Type::FLOAT4 {
        (v as f32).to_sql(ty, out)
    } else if *ty == Type::FLOAT8 {
        (v as f64).to_sql(ty, out)
    } else if *ty == Type::NUMERIC {
        Decimal::from(v).to_sql(ty, out)
    } else if is_text(ty) {
        v.to_string().to_sql(ty, out)
    } else {
        v.to_sql(ty, out)
    }
}

fn encode_decimal(v: Decimal, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    if *ty == Type::INT2 || *ty == Type::INT4 || *ty == Type::INT8 {
        encode_integer(v.normalize().to_string().parse::<i64>()?, ty, out)
    } else if *ty == Type::FLOAT4 {
        v.to_string().parse::<f32>()?.to_sql(ty, out)
    } else if *ty == Type::FLOAT8 {
        v.to_string().parse::<f64>()?.to_sql(ty, out)
    } else if is_text(ty) {
        v.to_string().to_sql(ty, out)
    } else {
        v.to_sql(ty, out)
    }
}

impl ToSql for PgParam {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match &self.0 {
            Value::Null => Ok(IsNull::Yes),
            Value::Int(v) => encode_integer(*v, ty, out),
            Value::Uint(v) => encode_integer(i64::try_from(*v)?, ty, out),
            Value::Float(v) => {
                if *ty == Type::FLOAT4 {
                    (*v as f32).to_sql(ty, out)
                } else if *ty == Type::NUMERIC {
                    Decimal::try_from(*v)?.to_sql(ty, out)
                } else {
                    v.to_sql(ty, out)
                }
            }
            Value::Decimal(v) => encode_decimal(*v, ty, out),
            Value::String(v) => {
                if *ty == Type::NUMERIC {
                    Decimal::from_str(v)?.to_sql(ty, out)
                } else if *ty == Type::INT2 || *ty == Type::INT4 || *ty == Type::INT8 {
                    encode_integer(v.parse::<i64>()?, ty, out)
                } else {
                    v.as_str().to_sql(ty, out)
                }
            }
            Value::Boolean(v) => v.to_sql(ty, out),
            Value::Json(v) => PgJson(v).to_sql(ty, out),
            Value::Uuid(v) => v.to_sql(ty, out),
            Value::Bytes(v) => v.as_slice().to_sql(ty, out),
            Value::Date(v) => v.to_sql(ty, out),
            Value::Timestamp(v) => {
                if *ty == Type::TIMESTAMP {
                    v.naive_utc().to_sql(ty, out)
                } else {
                    v.to_sql(ty, out)
                }
            }
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

pub struct PgParamStore {
    pub params: Vec<PgParam>,
}

impl PgParamStore {
    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            params: values.into_iter().map(PgParam::from_value).collect(),
        }
    }

    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|param| param as &(dyn ToSql + Sync))
            .collect::<Vec<_>>()
    }
}
