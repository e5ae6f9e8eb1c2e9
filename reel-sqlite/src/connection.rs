//! Async SQLite connection wrapper.

use std::path::Path;

use rusqlite::types::Value;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::row::FromRow;

/// A cheaply-cloneable handle to one SQLite database.
///
/// Statements are serialized through `tokio-rusqlite`'s connection actor.
/// The handle is passed explicitly into every store; there is no
/// process-global connection state.
#[derive(Clone)]
pub struct SqliteConnection {
    inner: Connection,
}

impl SqliteConnection {
    /// Open a file-backed database.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let inner = Connection::open(path.as_ref()).await?;
        Ok(Self { inner })
    }

    /// Open an in-memory database.
    pub async fn open_in_memory() -> StoreResult<Self> {
        let inner = Connection::open_in_memory().await?;
        Ok(Self { inner })
    }

    /// Execute a query and map every row through `T::from_row`.
    ///
    /// Zero rows is a valid empty result, not an error.
    pub async fn query_rows<T>(&self, sql: &str, params: Vec<Value>) -> StoreResult<Vec<T>>
    where
        T: FromRow + Send + 'static,
    {
        let sql = sql.to_string();
        debug!(sql = %sql, params = params.len(), "query_rows");

        self.inner
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let params_ref: Vec<&dyn rusqlite::ToSql> =
                    params.iter().map(|v| v as &dyn rusqlite::ToSql).collect();
                let rows = stmt.query_map(params_ref.as_slice(), |row| T::from_row(row))?;
                let collected: Result<Vec<T>, _> = rows.collect();
                Ok(collected?)
            })
            .await
            .map_err(StoreError::from)
    }

    /// Execute a query expected to match at most one row.
    pub async fn query_optional_row<T>(
        &self,
        sql: &str,
        params: Vec<Value>,
    ) -> StoreResult<Option<T>>
    where
        T: FromRow + Send + 'static,
    {
        let sql = sql.to_string();
        debug!(sql = %sql, "query_optional_row");

        self.inner
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let params_ref: Vec<&dyn rusqlite::ToSql> =
                    params.iter().map(|v| v as &dyn rusqlite::ToSql).collect();
                let result = stmt.query_row(params_ref.as_slice(), |row| T::from_row(row));
                match result {
                    Ok(row) => Ok(Some(row)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(tokio_rusqlite::Error::Rusqlite(e)),
                }
            })
            .await
            .map_err(StoreError::from)
    }

    /// Execute an id-selecting query, preserving result order.
    pub async fn query_ids(&self, sql: &str, params: Vec<Value>) -> StoreResult<Vec<i64>> {
        self.query_rows::<i64>(sql, params).await
    }

    /// Execute a query returning a single integer scalar (counts).
    pub async fn query_scalar(&self, sql: &str, params: Vec<Value>) -> StoreResult<i64> {
        let sql = sql.to_string();
        debug!(sql = %sql, "query_scalar");

        self.inner
            .call(move |conn| {
                let params_ref: Vec<&dyn rusqlite::ToSql> =
                    params.iter().map(|v| v as &dyn rusqlite::ToSql).collect();
                Ok(conn.query_row(&sql, params_ref.as_slice(), |row| row.get::<_, i64>(0))?)
            })
            .await
            .map_err(StoreError::from)
    }

    /// Execute a statement and return the number of affected rows.
    pub async fn execute(&self, sql: &str, params: Vec<Value>) -> StoreResult<usize> {
        let sql = sql.to_string();
        debug!(sql = %sql, "execute");

        self.inner
            .call(move |conn| {
                let params_ref: Vec<&dyn rusqlite::ToSql> =
                    params.iter().map(|v| v as &dyn rusqlite::ToSql).collect();
                Ok(conn.execute(&sql, params_ref.as_slice())?)
            })
            .await
            .map_err(StoreError::from)
    }

    /// Execute multiple statements in a batch (schema setup).
    pub async fn execute_batch(&self, sql: &str) -> StoreResult<()> {
        let sql = sql.to_string();
        debug!("execute_batch");

        self.inner
            .call(move |conn| Ok(conn.execute_batch(&sql)?))
            .await
            .map_err(StoreError::from)
    }

    /// Run `f` inside one transaction; commits when it returns `Ok`.
    pub async fn transaction<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Transaction<'_>) -> rusqlite::Result<T> + Send + 'static,
    {
        self.inner
            .call(move |conn| {
                let tx = conn.transaction()?;
                let out = f(&tx)?;
                tx.commit()?;
                Ok(out)
            })
            .await
            .map_err(StoreError::from)
    }
}
