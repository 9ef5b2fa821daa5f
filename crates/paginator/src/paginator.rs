use crate::{
    config::{FetchOptions, PaginatorConfig},
    error::PaginatorError,
};
use connectors::executor::QueryExecutor;
use model::{
    core::value::Value,
    pagination::state::{Boundary, PaginatorState},
    records::row::RowData,
};
use planner::{
    error::PaginationConfigError,
    query::{
        ast::select::Select,
        builder::select::{FromState, SelectBuilder},
        paginate::{PaginateConfig, paginate},
    },
};
use std::{cmp::Ordering, fmt, sync::Arc};
use tracing::{debug, warn};

/// Which marker a fetch continues from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "next"),
            Direction::Backward => write!(f, "previous"),
        }
    }
}

/// Sort keys of one fetched row. `order_by` is present (possibly `Null`)
/// only when an order-by column is configured.
#[derive(Debug, Clone)]
struct RowKey {
    cursor: Value,
    order_by: Option<Value>,
}

impl RowKey {
    fn boundary(&self) -> Boundary {
        Boundary::new(self.cursor.clone(), self.order_by.clone())
    }

    /// Ascending lexicographic comparison on `(order_by?, cursor)`.
    /// `None` when a key pair has no ordering (mixed variants, NaN, JSON).
    fn compare(&self, other: &RowKey) -> Option<Ordering> {
        let by_order = match (&self.order_by, &other.order_by) {
            (Some(a), Some(b)) => a.compare(b)?,
            _ => Ordering::Equal,
        };
        match by_order {
            Ordering::Equal => self.cursor.compare(&other.cursor),
            decided => Some(decided),
        }
    }
}

/// Bidirectional keyset paginator over a base query.
///
/// Forward pages continue after the last row returned so far (the head
/// marker); backward pages continue before the first one (the tail marker).
/// Both are always presented in the configured order. The whole position
/// lives in a [`PaginatorState`], which [`Paginator::serialize`] turns into a
/// token and [`Paginator::restore`] turns back into a paginator.
pub struct Paginator {
    executor: Arc<dyn QueryExecutor>,
    query: SelectBuilder<FromState>,
    state: PaginatorState,
    duplicate_warnings: usize,
}

impl Paginator {
    pub fn new(
        executor: Arc<dyn QueryExecutor>,
        query: SelectBuilder<FromState>,
        config: PaginatorConfig,
    ) -> Result<Self, PaginatorError> {
        let state = config.into_state()?;
        Ok(Self::from_state(executor, query, state))
    }

    /// Rebuilds a paginator from a token produced by [`Paginator::serialize`].
    /// The query template and executor are supplied again by the caller.
    pub fn restore(
        executor: Arc<dyn QueryExecutor>,
        query: SelectBuilder<FromState>,
        token: &str,
    ) -> Result<Self, PaginatorError> {
        let state = PaginatorState::from_token(token)?;
        if state.page_size == 0 {
            return Err(PaginationConfigError::InvalidPageSize(0).into());
        }
        Ok(Self::from_state(executor, query, state))
    }

    pub fn from_state(
        executor: Arc<dyn QueryExecutor>,
        query: SelectBuilder<FromState>,
        state: PaginatorState,
    ) -> Self {
        Self {
            executor,
            query,
            state,
            duplicate_warnings: 0,
        }
    }

    pub async fn next(&mut self) -> Result<Vec<RowData>, PaginatorError> {
        self.fetch(Direction::Forward, FetchOptions::default()).await
    }

    pub async fn next_with(
        &mut self,
        options: FetchOptions,
    ) -> Result<Vec<RowData>, PaginatorError> {
        self.fetch(Direction::Forward, options).await
    }

    pub async fn previous(&mut self) -> Result<Vec<RowData>, PaginatorError> {
        self.fetch(Direction::Backward, FetchOptions::default()).await
    }

    pub async fn previous_with(
        &mut self,
        options: FetchOptions,
    ) -> Result<Vec<RowData>, PaginatorError> {
        self.fetch(Direction::Backward, options).await
    }

    pub fn serialize(&self) -> Result<String, PaginatorError> {
        Ok(self.state.to_token()?)
    }

    pub fn state(&self) -> &PaginatorState {
        &self.state
    }

    /// How many adjacent duplicate `(order_by, cursor)` keys were seen while
    /// re-sorting backward pages.
    pub fn duplicate_warnings(&self) -> usize {
        self.duplicate_warnings
    }

    async fn fetch(
        &mut self,
        direction: Direction,
        options: FetchOptions,
    ) -> Result<Vec<RowData>, PaginatorError> {
        let query = page_query(&self.query, &self.state, direction, options)?;
        let rows = self.executor.fetch(&query).await?;

        debug!(
            %direction,
            executor = self.executor.name(),
            rows = rows.len(),
            page_size = self.state.page_size,
            "Fetched page"
        );

        if rows.is_empty() {
            return Ok(rows);
        }

        let mut keyed = rows
            .into_iter()
            .map(|row| Ok((self.row_key(&row)?, row)))
            .collect::<Result<Vec<_>, PaginatorError>>()?;

        if direction == Direction::Backward {
            self.sort_for_display(&mut keyed);
        }

        let (Some((first, _)), Some((last, _))) = (keyed.first(), keyed.last()) else {
            return Ok(Vec::new());
        };
        self.state = self.state.advance(first.boundary(), last.boundary());

        Ok(keyed.into_iter().map(|(_, row)| row).collect())
    }

    fn row_key(&self, row: &RowData) -> Result<RowKey, PaginatorError> {
        let cursor_name = &self.state.cursor_column.output_name;
        let cursor = row
            .get(cursor_name)
            .ok_or_else(|| PaginatorError::MissingColumn(cursor_name.clone()))?
            .value
            .clone();
        if cursor.is_null() {
            return Err(PaginatorError::NullCursor(cursor_name.clone()));
        }

        let order_by = match &self.state.order_by_column {
            Some(column) => Some(
                row.get(&column.output_name)
                    .ok_or_else(|| PaginatorError::MissingColumn(column.output_name.clone()))?
                    .value
                    .clone(),
            ),
            None => None,
        };

        Ok(RowKey { cursor, order_by })
    }

    /// Backward pages arrive in reverse; put them back into the configured
    /// order. The sort is stable, so rows with duplicate or incomparable keys
    /// keep the order the executor returned them in.
    fn sort_for_display(&mut self, keyed: &mut [(RowKey, RowData)]) {
        let order = self.state.order;
        keyed.sort_by(|(a, _), (b, _)| order.apply(a.compare(b).unwrap_or(Ordering::Equal)));

        for pair in keyed.windows(2) {
            let (a, b) = (&pair[0].0, &pair[1].0);
            match a.compare(b) {
                Some(Ordering::Equal) => {
                    self.duplicate_warnings += 1;
                    warn!(
                        cursor = %a.cursor,
                        order_by = ?a.order_by,
                        "Duplicate values found in results: the cursor column does not define a unique order"
                    );
                }
                None => warn!(
                    left = ?a,
                    right = ?b,
                    "Incomparable sort keys in results, keeping executor order"
                ),
                Some(_) => {}
            }
        }
    }
}

/// Shapes the query a fetch in `direction` would run from `state`, without
/// running it. Backward fetches walk the flipped order from the tail marker.
pub fn page_query(
    query: &SelectBuilder<FromState>,
    state: &PaginatorState,
    direction: Direction,
    options: FetchOptions,
) -> Result<Select, PaginatorError> {
    let (order, boundary) = match direction {
        Direction::Forward => (state.order, state.head()),
        Direction::Backward => (state.order.flip(), state.tail()),
    };

    let config = PaginateConfig::new(state.cursor_column.clone(), order, state.page_size)
        .order_by(state.order_by_column.clone())
        .after(boundary)
        .page_offset(options.page_offset);

    Ok(paginate(query.clone(), &config)?.build())
}

impl fmt::Debug for Paginator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("executor", &self.executor.name())
            .field("state", &self.state)
            .field("duplicate_warnings", &self.duplicate_warnings)
            .finish()
    }
}
