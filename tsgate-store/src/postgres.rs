use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tsgate_core::{
    DateTime, GatewayError, SeriesStore, StoredRecord, StreamKind, Utc, ValuePoint, Window,
};

use crate::collapse_minutes;

/// Table used when none is given.
pub const DEFAULT_TABLE: &str = "sensor_data_ts";

#[derive(sqlx::FromRow)]
struct SeriesRow {
    series_id: String,
    timestamp: DateTime<Utc>,
    real_value: Option<f64>,
    predicted_value: Option<f64>,
}

impl From<SeriesRow> for StoredRecord {
    fn from(r: SeriesRow) -> Self {
        Self {
            series_id: r.series_id,
            timestamp: r.timestamp,
            real_value: r.real_value,
            predicted_value: r.predicted_value,
        }
    }
}

/// PostgreSQL (or TimescaleDB hypertable) backed series store.
///
/// Expects a table shaped like:
///
/// ```sql
/// CREATE TABLE sensor_data_ts (
///     series_id       TEXT        NOT NULL,
///     timestamp       TIMESTAMPTZ NOT NULL,
///     real_value      DOUBLE PRECISION,
///     predicted_value DOUBLE PRECISION,
///     PRIMARY KEY (series_id, timestamp)
/// );
/// ```
///
/// Schema provisioning is left to migrations outside this crate.
#[derive(Debug, Clone)]
pub struct PgSeriesStore {
    pool: PgPool,
    table: String,
    select_sql: String,
}

impl PgSeriesStore {
    /// Wrap an existing pool, reading and writing `table`.
    ///
    /// # Errors
    /// Returns `InvalidInput` if `table` is not a plain (optionally
    /// schema-qualified) SQL identifier.
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self, GatewayError> {
        let table = table.into();
        validate_table(&table)?;
        let select_sql = select_sql(&table);
        Ok(Self {
            pool,
            table,
            select_sql,
        })
    }

    /// Connect to `database_url` and use [`DEFAULT_TABLE`].
    ///
    /// # Errors
    /// Returns `Storage` if the pool cannot be established.
    pub async fn connect(database_url: &str) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(storage_err)?;
        Self::new(pool, DEFAULT_TABLE)
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// The table this store reads and writes.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }
}

fn storage_err(e: sqlx::Error) -> GatewayError {
    GatewayError::storage(e.to_string())
}

fn validate_table(table: &str) -> Result<(), GatewayError> {
    let ident_ok = |part: &str| {
        let mut chars = part.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    let parts: Vec<&str> = table.split('.').collect();
    if parts.len() > 2 || !parts.iter().all(|p| ident_ok(p)) {
        return Err(GatewayError::InvalidInput(format!(
            "invalid table name: {table:?}"
        )));
    }
    Ok(())
}

fn select_sql(table: &str) -> String {
    format!(
        "SELECT series_id, timestamp, real_value, predicted_value \
         FROM {table} \
         WHERE series_id = $1 AND timestamp >= $2 AND timestamp <= $3 \
         ORDER BY timestamp ASC"
    )
}

/// Field-selective upsert. Only `field`'s column appears in both the insert
/// column list and the `DO UPDATE SET` clause, so the sibling column is left
/// unset on insert and untouched on conflict.
fn upsert_sql(table: &str, field: StreamKind) -> String {
    let col = field.column();
    format!(
        "INSERT INTO {table} (series_id, timestamp, {col}) \
         SELECT $1, t.ts, t.v FROM UNNEST($2::timestamptz[], $3::float8[]) AS t(ts, v) \
         ON CONFLICT (series_id, timestamp) DO UPDATE SET {col} = EXCLUDED.{col}"
    )
}

#[async_trait]
impl SeriesStore for PgSeriesStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "tsgate_store::pg::read_range", skip(self), fields(table = %self.table))
    )]
    async fn read_range(
        &self,
        series_id: &str,
        window: &Window,
    ) -> Result<Vec<StoredRecord>, GatewayError> {
        let rows: Vec<SeriesRow> = sqlx::query_as(&self.select_sql)
            .bind(series_id)
            .bind(window.start())
            .bind(window.end())
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(rows.into_iter().map(StoredRecord::from).collect())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "tsgate_store::pg::upsert_field",
            skip(self, points),
            fields(table = %self.table, points = points.len())
        )
    )]
    async fn upsert_field(
        &self,
        series_id: &str,
        field: StreamKind,
        points: &[ValuePoint],
    ) -> Result<usize, GatewayError> {
        if points.is_empty() {
            return Ok(0);
        }
        let (timestamps, values): (Vec<DateTime<Utc>>, Vec<f64>) =
            collapse_minutes(points).into_iter().unzip();
        let written = timestamps.len();
        sqlx::query(&upsert_sql(&self.table, field))
            .bind(series_id)
            .bind(timestamps)
            .bind(values)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(written)
    }
}
