//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::ports::BlogStore;
use inkwell_infra::{Argon2Hasher, InMemoryStore, seed_demo_content};

use crate::config::{AppConfig, SiteConfig};

#[cfg(feature = "postgres")]
use inkwell_infra::database::{DatabaseConfig, PostgresStore, connect};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlogStore>,
    pub site: SiteConfig,
}

impl AppState {
    /// Wrap an already constructed store.
    pub fn with_store(store: Arc<dyn BlogStore>, site: SiteConfig) -> Self {
        Self { store, site }
    }

    /// Build the application state: pick the store, then seed it.
    pub async fn new(config: &AppConfig) -> Self {
        let store = Self::build_store(config).await;

        if let Some(seed_config) = &config.seed {
            let hasher = Argon2Hasher::new();
            match seed_demo_content(store.as_ref(), &hasher, seed_config).await {
                Ok(outcome) => tracing::debug!(?outcome, "Seeding finished"),
                Err(e) => tracing::error!("Seeding failed, continuing without demo data: {e:#}"),
            }
        }

        tracing::info!(backend = store.backend(), "Application state initialized");

        Self::with_store(store, config.site.clone())
    }

    #[cfg(feature = "postgres")]
    async fn build_store(config: &AppConfig) -> Arc<dyn BlogStore> {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Arc::new(InMemoryStore::new());
        };

        match Self::connect_postgres(db_config).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!(
                    "Failed to initialize database: {}. Using in-memory fallback.",
                    e
                );
                Arc::new(InMemoryStore::new())
            }
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect_postgres(
        db_config: &DatabaseConfig,
    ) -> Result<PostgresStore, migration::DbErr> {
        use migration::{Migrator, MigratorTrait};

        let conn = connect(db_config).await?;
        Migrator::up(&conn, None).await?;
        tracing::info!("Database migrations applied");

        Ok(PostgresStore::new(conn))
    }

    #[cfg(not(feature = "postgres"))]
    async fn build_store(config: &AppConfig) -> Arc<dyn BlogStore> {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        Arc::new(InMemoryStore::new())
    }
}
