//! Kitaplik - School Library Inventory & Lending Engine
//!
//! The transactional core of a single-operator library tracker: book copies,
//! members, loan records, lending policy, overdue evaluation and bounded
//! backup retention. Presentation, spreadsheet import/export and report
//! rendering live outside this crate and call in through [`Engine`].

use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::Repository;
use services::Services;

/// Engine handle shared with all callers
#[derive(Clone)]
pub struct Engine {
    pub config: Arc<AppConfig>,
    pub repository: Repository,
    pub services: Arc<Services>,
}

impl Engine {
    /// Open the engine: back up the existing database file, connect the
    /// pool, run migrations and wire up the services.
    pub async fn open(config: AppConfig) -> AppResult<Self> {
        let database_path = config.database_path();

        // Snapshot the pre-session state before migrations touch the file.
        // Backup failures are logged, never fatal.
        let backup = services::backup::BackupService::new(
            database_path.clone(),
            config.backup.clone(),
        );
        backup.run_auto_backup();

        if let Some(parent) = database_path.as_deref().and_then(|p| p.parent()) {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::from_str(&config.database.url)
            .map_err(AppError::Database)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .connect_with(options)
            .await?;

        tracing::info!(url = %config.database.url, "connected to database");

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!("database migrations completed");

        let repository = Repository::new(pool);
        let services = Services::new(
            repository.clone(),
            config.backup.clone(),
            database_path,
        );

        Ok(Self {
            config: Arc::new(config),
            repository,
            services: Arc::new(services),
        })
    }
}

/// Initialize tracing for hosting binaries; honors `RUST_LOG` and falls back
/// to the configured level
pub fn init_tracing(config: &config::LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("kitaplik={}", config.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
