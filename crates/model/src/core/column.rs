use serde::{Deserialize, Serialize};

/// A column as it is used by pagination.
///
/// `reference` is what goes into generated predicates and ordering (it may
/// carry a table qualifier), `output_name` is the key under which the
/// column's value shows up in a fetched row.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub reference: String,
    pub output_name: String,
}

impl ColumnDescriptor {
    pub fn new(reference: impl Into<String>, output_name: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            output_name: output_name.into(),
        }
    }

    /// Parses a column expression such as `id`, `t.id` or `t.id AS id_alias`.
    ///
    /// Rules, first match wins:
    /// 1. empty input yields `None`;
    /// 2. exactly one case-insensitive `as` separator: `reference AS output_name`;
    /// 3. a qualified name: the whole text is the reference, the part after
    ///    the last `.` is the output name;
    /// 4. otherwise the text is both reference and output name.
    ///
    /// More than one `as` separator disables rule 2 and the text falls
    /// through to rules 3 and 4 unchanged.
    pub fn parse(expr: &str) -> Option<Self> {
        let expr = expr.trim();
        if expr.is_empty() {
            return None;
        }

        if let Some((reference, alias)) = split_alias(expr) {
            return Some(Self::new(reference, alias));
        }

        match expr.rsplit_once('.') {
            Some((_, column)) if !column.is_empty() => Some(Self::new(expr, column)),
            _ => Some(Self::new(expr, expr)),
        }
    }

    /// Splits the reference into an optional qualifier and the bare column.
    ///
    /// `public.users.id` yields `(Some("public.users"), "id")`.
    pub fn qualified_parts(&self) -> (Option<&str>, &str) {
        match self.reference.rsplit_once('.') {
            Some((qualifier, column)) if !qualifier.is_empty() && !column.is_empty() => {
                (Some(qualifier), column)
            }
            _ => (None, self.reference.as_str()),
        }
    }
}

fn split_alias(expr: &str) -> Option<(String, String)> {
    let tokens: Vec<&str> = expr.split_whitespace().collect();
    let separators: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| token.eq_ignore_ascii_case("as"))
        .map(|(idx, _)| idx)
        .collect();

    match separators.as_slice() {
        [idx] if *idx > 0 && *idx + 1 < tokens.len() => Some((
            tokens[..*idx].join(" "),
            tokens[*idx + 1..].join(" "),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(expr: &str) -> (String, String) {
        let col = ColumnDescriptor::parse(expr).unwrap();
        (col.reference, col.output_name)
    }

    #[test]
    fn test_bare_column() {
        assert_eq!(parts("id"), ("id".into(), "id".into()));
    }

    #[test]
    fn test_table_qualified_column() {
        assert_eq!(parts("t.name"), ("t.name".into(), "name".into()));
    }

    #[test]
    fn test_column_alias() {
        assert_eq!(parts("id as idAlias"), ("id".into(), "idAlias".into()));
        assert_eq!(parts("name AS nameAlias"), ("name".into(), "nameAlias".into()));
    }

    #[test]
    fn test_qualified_column_with_alias() {
        assert_eq!(parts("t.id as idAlias"), ("t.id".into(), "idAlias".into()));
        assert_eq!(parts("t.name   As   nameAlias"), ("t.name".into(), "nameAlias".into()));
    }

    #[test]
    fn test_empty_input() {
        assert!(ColumnDescriptor::parse("").is_none());
        assert!(ColumnDescriptor::parse("   ").is_none());
    }

    #[test]
    fn test_ambiguous_alias_falls_through() {
        // two separators: the alias rule does not apply
        assert_eq!(parts("a as b as c"), ("a as b as c".into(), "a as b as c".into()));
        // dangling separator
        assert_eq!(parts("id as"), ("id as".into(), "id as".into()));
    }

    #[test]
    fn test_schema_qualified_column() {
        assert_eq!(parts("public.users.id"), ("public.users.id".into(), "id".into()));
    }

    #[test]
    fn test_column_name_containing_as() {
        assert_eq!(parts("alias"), ("alias".into(), "alias".into()));
        assert_eq!(parts("t.has_value"), ("t.has_value".into(), "has_value".into()));
    }

    #[test]
    fn test_qualified_parts() {
        let col = ColumnDescriptor::parse("public.users.id as uid").unwrap();
        assert_eq!(col.qualified_parts(), (Some("public.users"), "id"));

        let col = ColumnDescriptor::parse("id").unwrap();
        assert_eq!(col.qualified_parts(), (None, "id"));
    }
}
