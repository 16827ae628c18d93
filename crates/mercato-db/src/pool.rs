//! Connection pool and migrations.

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::error::DbResult;
use crate::store::account::AccountRepository;
use crate::store::cart::CartRepository;

/// Database connection pool shared by both services.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connects to PostgreSQL.
    pub async fn connect(url: &str) -> DbResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .connect(url)
            .await?;

        Ok(Database { pool })
    }

    /// Runs the embedded workspace migrations.
    pub async fn run_migrations(&self) -> DbResult<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        info!("Database migrations complete");
        Ok(())
    }

    /// Returns the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Account repository over this pool.
    pub fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.pool.clone())
    }

    /// Cart repository over this pool.
    pub fn carts(&self) -> CartRepository {
        CartRepository::new(self.pool.clone())
    }
}
