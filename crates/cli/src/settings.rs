use crate::{
    commands::{QueryArgs, StateArgs},
    error::CliError,
};
use model::{core::column::ColumnDescriptor, pagination::state::PaginatorState};
use paginator::{PaginatorConfig, PaginatorError};
use planner::query::{
    ast::{common::TableRef, expr::Expr},
    builder::select::{FromState, SelectBuilder},
    projection,
};
use std::path::Path;
use tracing::debug;

/// Merges the optional JSON config file with command-line flags. Flags win.
pub fn load_config(args: &QueryArgs) -> Result<PaginatorConfig, CliError> {
    let file = match &args.config {
        Some(path) => Some(read_config_file(path)?),
        None => None,
    };

    let cursor_column = args
        .cursor_column
        .clone()
        .or_else(|| file.as_ref().map(|c| c.cursor_column.clone()))
        .ok_or(CliError::MissingSetting("--cursor-column"))?;
    let page_size = args
        .page_size
        .or_else(|| file.as_ref().map(|c| c.page_size))
        .ok_or(CliError::MissingSetting("--page-size"))?;

    let mut config = file.unwrap_or_else(|| PaginatorConfig::new(cursor_column.clone(), page_size));
    config.cursor_column = cursor_column;
    config.page_size = page_size;
    if let Some(order_by) = &args.order_by_column {
        config.order_by_column = Some(order_by.clone());
    }
    if let Some(order) = args.order {
        config.order = order;
    }

    Ok(config)
}

fn read_config_file(path: &str) -> Result<PaginatorConfig, CliError> {
    let source = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&source)?;
    debug!(path, "Loaded paginator config file");
    Ok(config)
}

/// The position to page from: the saved token when there is one, a fresh
/// state built from config file and flags otherwise.
pub fn resolve_state(query: &QueryArgs, state: &StateArgs) -> Result<PaginatorState, CliError> {
    match load_state(state)? {
        Some(token) => {
            let restored = PaginatorState::from_token(&token).map_err(PaginatorError::State)?;
            debug!(page_size = restored.page_size, "Resuming from cursor token");
            Ok(restored)
        }
        None => Ok(load_config(query)?.into_state()?),
    }
}

/// `SELECT <columns> FROM <table> [AS alias]`. With an explicit column list,
/// the cursor and order-by columns are appended when missing so every row
/// carries its sort keys.
pub fn base_query(
    args: &QueryArgs,
    state: &PaginatorState,
) -> Result<SelectBuilder<FromState>, CliError> {
    let mut columns = args
        .columns
        .iter()
        .map(|expr| parse_column(expr))
        .collect::<Result<Vec<_>, _>>()?;

    let projections = if columns.is_empty() {
        vec![Expr::Wildcard]
    } else {
        let keys = std::iter::once(&state.cursor_column).chain(state.order_by_column.as_ref());
        for key in keys {
            if !columns
                .iter()
                .any(|c| c.output_name.eq_ignore_ascii_case(&key.output_name))
            {
                columns.push(key.clone());
            }
        }
        columns.iter().map(projection).collect()
    };

    Ok(SelectBuilder::new()
        .select(projections)
        .from(table_ref(&args.table), args.alias.as_deref()))
}

fn parse_column(expr: &str) -> Result<ColumnDescriptor, CliError> {
    ColumnDescriptor::parse(expr).ok_or_else(|| CliError::InvalidColumn(expr.to_string()))
}

fn table_ref(table: &str) -> TableRef {
    match table.split_once('.') {
        Some((schema, name)) => TableRef {
            schema: Some(schema.to_string()),
            name: name.to_string(),
        },
        None => TableRef {
            schema: None,
            name: table.to_string(),
        },
    }
}

/// The token to resume from, if any.
pub fn load_state(args: &StateArgs) -> Result<Option<String>, CliError> {
    if let Some(token) = &args.state {
        return Ok(Some(token.clone()));
    }
    match &args.state_file {
        Some(path) if Path::new(path).exists() => {
            let token = std::fs::read_to_string(path)?;
            let token = token.trim();
            Ok((!token.is_empty()).then(|| token.to_string()))
        }
        _ => Ok(None),
    }
}

pub fn save_state(args: &StateArgs, token: &str) -> Result<(), CliError> {
    if let Some(path) = &args.state_file {
        std::fs::write(path, token)?;
        debug!(path, "Saved cursor token");
    }
    Ok(())
}
