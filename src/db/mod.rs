pub mod memory;
pub mod queries;
pub mod store;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Error;

pub use memory::MemoryStore;
pub use queries::categories::Category;
pub use queries::questions::{NewQuestion, Question};
pub use store::{SqliteStore, StoreError, StoreResult, TriviaStore};

pub async fn establish_connection(path: &str) -> Result<SqlitePool, Error> {
    let options = SqliteConnectOptions::from_str(format!("sqlite:{}", path).as_str())?
        .create_if_missing(true);
    SqlitePool::connect_with(options).await
}

/// Single-connection pool over a private in-memory database.
///
/// Every SQLite `:memory:` connection owns its own database, so the pool must never
/// open a second connection or recycle the first one.
pub async fn in_memory_pool() -> Result<SqlitePool, Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
