//! # Dusys DB
//!
//! PostgreSQL connection pool and schema migrations for the identity store.
//!
//! # Example
//!
//! ```ignore
//! use dusys_db::{init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&settings.database).await?;
//! run_migrations(&pool).await?;
//! ```

use dusys_config::DatabaseSettings;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

pub use sqlx::PgPool;

/// Connects to the primary database.
///
/// The pool is cheaply cloneable and should be created once at start-up.
///
/// # Errors
///
/// Returns the underlying [`sqlx::Error`] when the URI is malformed or the
/// database is unreachable.
pub async fn init_db_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    let primary = &settings.primary;
    info!(
        host = %primary.host,
        port = %primary.port,
        database = %primary.name,
        max_connections = %settings.max_connections,
        "Connecting to database"
    );

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&primary.connection_uri())
        .await
}

/// Applies the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
