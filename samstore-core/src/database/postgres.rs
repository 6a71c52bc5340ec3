use std::fmt;
use std::time::Duration;

use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::info;

use crate::error::{CatalogError, Result};

/// Statistics about the connection pool
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub size: u32,
    pub idle: u32,
    pub max_size: u32,
    pub min_idle: u32,
}

/// Owner of the PostgreSQL pool shared by every repository adapter.
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    max_connections: u32,
    min_connections: u32,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .finish()
    }
}

fn env_u32(key: &str) -> Option<u32> {
    std::env::var(key).ok().and_then(|s| s.parse::<u32>().ok())
}

impl PostgresDatabase {
    /// Connect using `DB_MAX_CONNECTIONS` / `DB_MIN_CONNECTIONS` from the
    /// environment, falling back to the CPU count and 1.
    pub async fn new(connection_string: &str) -> Result<Self> {
        let max_connections =
            env_u32("DB_MAX_CONNECTIONS").unwrap_or(num_cpus::get() as u32);
        let min_connections = env_u32("DB_MIN_CONNECTIONS")
            .unwrap_or(1)
            .min(max_connections);

        Self::connect(connection_string, max_connections, min_connections).await
    }

    pub async fn connect(
        connection_string: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        let connect_options = connection_string
            .trim()
            .parse::<PgConnectOptions>()
            .map_err(|e| {
                CatalogError::Internal(format!(
                    "Invalid PostgreSQL connection string: {e}"
                ))
            })?;

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .max_lifetime(Duration::from_secs(1800))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                CatalogError::Database(format!("Database connection failed: {e}"))
            })?;

        info!(
            max_connections,
            min_connections, "Database pool initialized"
        );

        Ok(Self {
            pool,
            max_connections,
            min_connections,
        })
    }

    /// Create a PostgresDatabase from an existing pool (mainly for testing)
    pub fn from_pool(pool: PgPool) -> Self {
        let max_connections = pool.options().get_max_connections();
        let min_connections = pool.options().get_min_connections();
        Self {
            pool,
            max_connections,
            min_connections,
        }
    }

    /// Apply the embedded migrations.
    pub async fn migrate(&self) -> Result<()> {
        crate::MIGRATOR.run(&self.pool).await.map_err(|e| {
            CatalogError::Database(format!("Failed to run migrations: {e}"))
        })?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Get a reference to the connection pool for use by repository adapters
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle() as u32,
            max_size: self.max_connections,
            min_idle: self.min_connections,
        }
    }
}
