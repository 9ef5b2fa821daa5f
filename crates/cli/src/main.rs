use crate::{
    commands::{Commands, PageArgs},
    error::CliError,
};
use clap::Parser;
use connectors::sql::postgres::PgAdapter;
use model::{core::value::Value, records::row::RowData};
use paginator::{Direction, FetchOptions, Paginator, page_query};
use planner::query::{
    dialect::{Dialect, MySql, Postgres},
    renderer::render,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod settings;

#[derive(Parser)]
#[command(name = "keyset", version = "0.1.0", about = "Keyset pagination over SQL tables")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Next { page } => fetch_page(page, Direction::Forward).await?,
        Commands::Previous { page } => fetch_page(page, Direction::Backward).await?,
        Commands::Render {
            query,
            state,
            previous,
            page_offset,
            dialect,
        } => {
            let paginator_state = settings::resolve_state(&query, &state)?;
            let base = settings::base_query(&query, &paginator_state)?;

            let direction = if previous {
                Direction::Backward
            } else {
                Direction::Forward
            };
            let select = page_query(
                &base,
                &paginator_state,
                direction,
                FetchOptions { page_offset },
            )?;

            let dialect: Box<dyn Dialect> = match dialect.to_ascii_lowercase().as_str() {
                "postgres" | "postgresql" | "pg" => Box::new(Postgres),
                "mysql" => Box::new(MySql),
                other => return Err(CliError::UnsupportedDialect(other.to_string())),
            };
            let (sql, params) = render(&select, dialect.as_ref());

            let output = serde_json::json!({
                "dialect": dialect.name(),
                "sql": sql,
                "params": params.iter().map(Value::to_json).collect::<Vec<_>>(),
            });
            print_json(&output)?;
        }
    }

    Ok(())
}

async fn fetch_page(page: PageArgs, direction: Direction) -> Result<(), CliError> {
    let url = page.url.as_deref().ok_or(CliError::MissingSetting("--url"))?;
    let state = settings::resolve_state(&page.query, &page.state)?;
    let base = settings::base_query(&page.query, &state)?;

    let executor = Arc::new(PgAdapter::connect(url).await?);
    let mut paginator = Paginator::from_state(executor, base, state);

    let options = FetchOptions {
        page_offset: page.page_offset,
    };
    let rows = match direction {
        Direction::Forward => paginator.next_with(options).await?,
        Direction::Backward => paginator.previous_with(options).await?,
    };
    info!(%direction, rows = rows.len(), "Page fetched");

    let token = paginator.serialize()?;
    settings::save_state(&page.state, &token)?;

    let output = serde_json::json!({
        "rows": rows.iter().map(RowData::to_json).collect::<Vec<_>>(),
        "state": token,
    });
    print_json(&output)
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(CliError::JsonSerialize)?;
    println!("{json}");
    Ok(())
}
