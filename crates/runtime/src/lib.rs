use anyhow::Result;
use courier_config::AppConfig;
use courier_database::initialize_database;
use sqlx::SqlitePool;
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::INFO)
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let db_pool = initialize_database(&config.database).await?;
        info!(url = %config.database.url, "database ready");

        Ok(Self { db_pool })
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_config::DatabaseConfig;

    #[tokio::test]
    async fn initialise_prepares_a_usable_pool() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            database: DatabaseConfig {
                url: format!("sqlite://{}", dir.path().join("courier.db").display()),
                max_connections: 2,
            },
            ..AppConfig::default()
        };

        let services = BackendServices::initialise(&config).await.unwrap();
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&services.db_pool)
            .await
            .unwrap();
        assert_eq!(row.0, 0);
    }
}
