use crate::{
    error::{ConnectorError, DbError},
    executor::QueryExecutor,
    sql::postgres::{params::PgParamStore, row::to_row_data, utils::connect_client},
};
use async_trait::async_trait;
use model::records::row::RowData;
use planner::query::{ast::select::Select, dialect, renderer::render};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::Client;
use tracing::debug;

#[derive(Clone)]
pub struct PgAdapter {
    client: Arc<RwLock<Client>>,
    dialect: dialect::Postgres,
}

impl PgAdapter {
    pub async fn connect(url: &str) -> Result<Self, ConnectorError> {
        let client = Arc::new(RwLock::new(connect_client(url).await?));
        Ok(PgAdapter {
            client,
            dialect: dialect::Postgres,
        })
    }

    /// Runs one or more raw statements without parameters.
    pub async fn exec(&self, query: &str) -> Result<(), DbError> {
        let client = self.client.read().await;
        client.batch_execute(query).await?;
        Ok(())
    }
}

#[async_trait]
impl QueryExecutor for PgAdapter {
    async fn fetch(&self, query: &Select) -> Result<Vec<RowData>, DbError> {
        let (sql, params) = render(query, &self.dialect);
        debug!(%sql, params = params.len(), "Executing page query");

        let entity = query
            .from
            .as_ref()
            .map(|from| from.table.name.as_str())
            .unwrap_or_default();

        let bindings = PgParamStore::from_values(params);
        let client = self.client.read().await;
        let rows = client.query(&sql, &bindings.as_refs()).await?;

        Ok(rows.iter().map(|row| to_row_data(row, entity)).collect())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
