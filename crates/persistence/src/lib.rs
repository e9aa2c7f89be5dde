//! # Banca Persistence
//!
//! Credential store and ledger tables on SQLite. Data access only: no
//! business rule lives here beyond the constraints the schema enforces.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Database                             │
//! │  ┌──────────────┐   ┌───────────────────┐   ┌─────────────┐  │
//! │  │  SqlitePool  │   │  migrations/*.sql │   │    Repos    │  │
//! │  │   (state)    │   │     (schema)      │   │  (queries)  │  │
//! │  └──────────────┘   └───────────────────┘   └─────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use banca_persistence::{Database, ProductRepo};
//!
//! let db = Database::init("sqlite:data/banca.db").await?;
//! let products = ProductRepo::list_by_client(db.pool(), &client_id).await?;
//! db.close().await;
//! ```

pub mod error;
pub mod sqlite;

pub use error::{PersistenceError, PersistenceResult};
pub use sqlite::schema::{ClientRow, PendingSessionRow, ProductRow, TransactionRow};
pub use sqlite::{
    create_pool, init_database, run_migrations, ClientRepo, PendingSessionRepo, PoolSettings,
    ProductRepo, TransactionRepo,
};

use sqlx::SqlitePool;

/// Database facade - owns the connection pool for the process lifetime
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to an existing database
    ///
    /// # Arguments
    /// * `db_url` - SQLite database URL (e.g., "sqlite:data/banca.db")
    pub async fn connect(db_url: &str) -> PersistenceResult<Self> {
        let pool = create_pool(db_url, &PoolSettings::default()).await?;
        Ok(Self { pool })
    }

    /// Connect and apply pending migrations
    pub async fn init(db_url: &str) -> PersistenceResult<Self> {
        Self::init_with(db_url, &PoolSettings::default()).await
    }

    pub async fn init_with(db_url: &str, settings: &PoolSettings) -> PersistenceResult<Self> {
        let pool = init_database(db_url, settings).await?;
        Ok(Self { pool })
    }

    /// Get SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every connection; call once on shutdown
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("banca.db").display());

        let db = Database::init(&url).await.unwrap();
        assert_eq!(ClientRepo::count(db.pool()).await.unwrap(), 0);
        db.close().await;

        // second run finds the migration already applied
        let db = Database::init(&url).await.unwrap();
        assert_eq!(ProductRepo::count(db.pool()).await.unwrap(), 0);
        db.close().await;
    }
}
