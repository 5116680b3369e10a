pub mod pool;
pub mod repository;

pub use pool::{create_memory_pool, create_pool};
pub use repository::{
    FileRepository, Repository, SettingsRepository, SqliteRepository, UserRepository,
};

use sqlx::SqlitePool;

/// Apply the embedded schema migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Migrations complete");
    Ok(())
}
