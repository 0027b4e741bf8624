//! The persistence layer: a pool of SQLite connections and the
//! application schema.

use std::{path::Path, time::Duration};

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::{
    Error, auth::create_user_table, budget::create_budget_table,
    income_source::create_income_source_table, transaction::create_transaction_table,
};

/// The default maximum number of connections held by a [DbPool].
pub const DEFAULT_MAX_CONNECTIONS: usize = 10;

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create all tables for the application if they do not already exist.
///
/// # Errors
/// Returns an error if any of the tables cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = connection.unchecked_transaction()?;

    create_user_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_budget_table(&transaction)?;
    create_income_source_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// A pool of SQLite connections shared by all request handlers.
#[derive(Clone)]
pub struct DbPool {
    pool: Pool<SqliteConnectionManager>,
}

/// A connection checked out of a [DbPool], returned to the pool on drop.
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

impl std::fmt::Debug for DbPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.pool.state();

        f.debug_struct("DbPool")
            .field("size", &self.pool.max_size())
            .field("connections", &state.connections)
            .field("idle", &state.idle_connections)
            .finish()
    }
}

impl DbPool {
    /// Open a pool of up to `max_connections` connections to the SQLite
    /// database at `path` and create the application tables.
    ///
    /// The file is created if it does not exist. `max_connections` is
    /// clamped to at least one.
    ///
    /// # Errors
    /// Returns an error if a connection cannot be opened or the schema
    /// cannot be created.
    pub fn open(path: impl AsRef<Path>, max_connections: usize) -> Result<Self, Error> {
        let path = path.as_ref();
        let max_connections = u32::try_from(max_connections.max(1)).unwrap_or(u32::MAX);

        let manager = SqliteConnectionManager::file(path).with_init(|connection| {
            connection.busy_timeout(BUSY_TIMEOUT)?;
            connection.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                row.get::<_, String>(0)
            })?;
            connection.pragma_update(None, "foreign_keys", "ON")
        });
        let pool = Pool::builder()
            .max_size(max_connections)
            .build(manager)
            .map_err(pool_error)?;

        let db_pool = Self { pool };
        initialize(&*db_pool.pool.get().map_err(pool_error)?)?;
        tracing::info!("Opened {max_connections} connection(s) to {}", path.display());

        Ok(db_pool)
    }

    /// Create a pool holding a single in-memory database.
    ///
    /// Every in-memory SQLite connection is a separate database, so this pool
    /// only ever holds one connection and never recycles it.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, Error> {
        let manager = SqliteConnectionManager::memory()
            .with_init(|connection| connection.pragma_update(None, "foreign_keys", "ON"));
        let pool = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(manager)
            .map_err(pool_error)?;

        let db_pool = Self { pool };
        initialize(&*db_pool.pool.get().map_err(pool_error)?)?;

        Ok(db_pool)
    }

    /// Wait for a free connection and check it out of the pool.
    ///
    /// # Errors
    /// Returns [Error::DatabasePoolError] if no connection became free before
    /// the pool's timeout.
    pub async fn acquire(&self) -> Result<DbConnection, Error> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || pool.get())
            .await
            .map_err(|error| {
                tracing::error!("Connection checkout task failed: {error}");
                Error::DatabasePoolError
            })?
            .map_err(pool_error)
    }

    /// The maximum number of connections managed by the pool.
    pub fn size(&self) -> u32 {
        self.pool.max_size()
    }
}

fn pool_error(error: r2d2::Error) -> Error {
    tracing::error!("Could not get a database connection: {error}");
    Error::DatabasePoolError
}
