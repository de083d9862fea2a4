use crate::config::AppConfig;
use crate::migrator::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::info;

/// Type alias for the process-wide database connection pool.
pub type DbPool = DatabaseConnection;

/// Connects to the database at `url` with the standard pool tuning.
pub async fn connect(url: &str) -> Result<DbPool, DbErr> {
    let mut options = ConnectOptions::new(url.to_owned());
    options
        .max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(false);

    // An in-memory SQLite database exists per connection; the pool must be a
    // single handle or every acquire sees a different (empty) schema.
    if url.starts_with("sqlite::memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;
    info!("Database connection established");
    Ok(db)
}

/// Establishes the connection pool described by the application config.
pub async fn establish_connection(config: &AppConfig) -> Result<DbPool, DbErr> {
    connect(&config.database_url).await
}

/// Applies all pending schema migrations.
pub async fn run_migrations(db: &DbPool) -> Result<(), DbErr> {
    info!("Running database migrations");
    Migrator::up(db, None).await?;
    info!("Database migrations completed");
    Ok(())
}
