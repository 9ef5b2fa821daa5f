use crate::query::ast::expr::{Expr, Ident};
use model::core::{column::ColumnDescriptor, value::Value};

pub mod ast;
pub mod builder;
pub mod dialect;
pub mod macros;
pub mod paginate;
pub mod renderer;

pub fn ident(name: &str) -> Expr {
    Expr::Identifier(Ident {
        qualifier: None,
        name: name.to_string(),
    })
}

pub fn value(val: Value) -> Expr {
    Expr::Value(val)
}

/// The identifier a column descriptor refers to in predicates and ordering.
pub fn column(col: &ColumnDescriptor) -> Expr {
    let (qualifier, name) = col.qualified_parts();
    Expr::Identifier(Ident {
        qualifier: qualifier.map(str::to_string),
        name: name.to_string(),
    })
}

/// The projection for a column descriptor: the bare reference when the
/// database already reports it under `output_name`, `reference AS output_name`
/// otherwise.
pub fn projection(col: &ColumnDescriptor) -> Expr {
    let (_, name) = col.qualified_parts();
    if name == col.output_name {
        column(col)
    } else {
        Expr::Alias {
            expr: Box::new(column(col)),
            alias: col.output_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_splits_qualifier() {
        let col = ColumnDescriptor::parse("t.id as idAlias").unwrap();
        assert_eq!(
            column(&col),
            Expr::Identifier(Ident {
                qualifier: Some("t".to_string()),
                name: "id".to_string(),
            })
        );
    }

    #[test]
    fn test_projection_aliases_only_when_needed() {
        let plain = ColumnDescriptor::parse("t.name").unwrap();
        assert!(matches!(projection(&plain), Expr::Identifier(_)));

        let aliased = ColumnDescriptor::parse("t.name as nameAlias").unwrap();
        match projection(&aliased) {
            Expr::Alias { alias, .. } => assert_eq!(alias, "nameAlias"),
            other => panic!("Expected alias, got {other:?}"),
        }
    }
}
