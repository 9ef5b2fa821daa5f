use clap::{Args, Subcommand};
use model::pagination::order::SortOrder;

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the page after the current position
    Next {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Fetch the page before the current position
    Previous {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Print the SQL and parameters the next fetch would run, without connecting
    Render {
        #[command(flatten)]
        query: QueryArgs,

        #[command(flatten)]
        state: StateArgs,

        #[arg(long, help = "Render the backward query instead of the forward one")]
        previous: bool,

        #[arg(long, help = "Skip this many whole pages past the boundary")]
        page_offset: Option<usize>,

        #[arg(long, default_value = "postgres", help = "SQL dialect: postgres or mysql")]
        dialect: String,
    },
}

#[derive(Args)]
pub struct PageArgs {
    #[arg(long, env = "KEYSET_DATABASE_URL", help = "PostgreSQL connection URL")]
    pub url: Option<String>,

    #[command(flatten)]
    pub query: QueryArgs,

    #[command(flatten)]
    pub state: StateArgs,

    #[arg(long, help = "Skip this many whole pages past the boundary")]
    pub page_offset: Option<usize>,
}

/// What to page through and how.
#[derive(Args, Clone, Default)]
pub struct QueryArgs {
    #[arg(long, help = "Table to page through, optionally schema-qualified")]
    pub table: String,

    #[arg(long, help = "Alias for the table in generated SQL")]
    pub alias: Option<String>,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Comma-separated column expressions to select (default: *)"
    )]
    pub columns: Vec<String>,

    #[arg(long, help = "Unique cursor column expression, e.g. \"t.id as id\"")]
    pub cursor_column: Option<String>,

    #[arg(long, help = "Optional primary sort column expression")]
    pub order_by_column: Option<String>,

    #[arg(long, help = "Sort order: asc or desc")]
    pub order: Option<SortOrder>,

    #[arg(long, help = "Rows per page")]
    pub page_size: Option<usize>,

    #[arg(long, help = "JSON file with paginator settings; flags take precedence")]
    pub config: Option<String>,
}

/// Where the cursor token comes from and goes to.
#[derive(Args, Clone, Default)]
pub struct StateArgs {
    #[arg(long, conflicts_with = "state_file", help = "Cursor token to resume from")]
    pub state: Option<String>,

    #[arg(
        long,
        help = "File holding the cursor token; read before and rewritten after the fetch"
    )]
    pub state_file: Option<String>,
}
