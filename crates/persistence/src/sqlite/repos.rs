//! Repository implementations cho SQLite
//!
//! Every function takes any `SqliteExecutor`, so the same query runs against
//! the pool for reads or inside a `sqlx::Transaction` for the ledger's
//! all-or-nothing writes.

use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::schema::*;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{SqliteExecutor, SqlitePool};
use std::str::FromStr;
use std::time::Duration;

// ============================================================================
// Client Repository
// ============================================================================

/// Repository cho clients table
pub struct ClientRepo;

impl ClientRepo {
    /// Lookup by email (the column collates NOCASE)
    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> PersistenceResult<Option<ClientRow>>
    where
        E: SqliteExecutor<'e>,
    {
        let row = sqlx::query_as::<_, ClientRow>("SELECT * FROM clients WHERE email = ?")
            .bind(email)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    /// Lấy client theo ID
    pub async fn get_by_id<'e, E>(executor: E, id: &str) -> PersistenceResult<ClientRow>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, ClientRow>("SELECT * FROM clients WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Client", id))
    }

    /// Insert a new client. A duplicate email surfaces as a unique violation.
    pub async fn insert<'e, E>(executor: E, client: &ClientRow) -> PersistenceResult<()>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO clients (id, full_name, email, password_hash, totp_secret, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&client.id)
        .bind(&client.full_name)
        .bind(&client.email)
        .bind(&client.password_hash)
        .bind(&client.totp_secret)
        .bind(client.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Đếm clients
    pub async fn count<'e, E>(executor: E) -> PersistenceResult<i64>
    where
        E: SqliteExecutor<'e>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients")
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Pending Session Repository
// ============================================================================

/// Repository cho pending_sessions table
pub struct PendingSessionRepo;

impl PendingSessionRepo {
    pub async fn insert<'e, E>(executor: E, session: &PendingSessionRow) -> PersistenceResult<()>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query(
            "INSERT INTO pending_sessions (id, client_id, login_token, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.id)
        .bind(&session.client_id)
        .bind(&session.login_token)
        .bind(session.expires_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn find_by_token<'e, E>(
        executor: E,
        login_token: &str,
    ) -> PersistenceResult<Option<PendingSessionRow>>
    where
        E: SqliteExecutor<'e>,
    {
        let row = sqlx::query_as::<_, PendingSessionRow>(
            "SELECT * FROM pending_sessions WHERE login_token = ?",
        )
        .bind(login_token)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    /// Delete by token. Returns how many rows went away (0 or 1); a caller
    /// that sees 0 lost the race to consume the session.
    pub async fn delete_by_token<'e, E>(executor: E, login_token: &str) -> PersistenceResult<u64>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM pending_sessions WHERE login_token = ?")
            .bind(login_token)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Remove every session that expired before `now`
    pub async fn purge_expired<'e, E>(executor: E, now: DateTime<Utc>) -> PersistenceResult<u64>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM pending_sessions WHERE expires_at < ?")
            .bind(now)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count<'e, E>(executor: E) -> PersistenceResult<i64>
    where
        E: SqliteExecutor<'e>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pending_sessions")
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Product Repository
// ============================================================================

/// Repository cho products table
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a product. Account-number collisions surface as unique violations.
    pub async fn insert<'e, E>(executor: E, product: &ProductRow) -> PersistenceResult<()>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO products
                (id, client_id, product_type, alias, account_number, currency, balance_minor, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.id)
        .bind(&product.client_id)
        .bind(&product.product_type)
        .bind(&product.alias)
        .bind(&product.account_number)
        .bind(&product.currency)
        .bind(product.balance_minor)
        .bind(product.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Product if and only if `client_id` owns it
    pub async fn find_owned<'e, E>(
        executor: E,
        client_id: &str,
        product_id: &str,
    ) -> PersistenceResult<Option<ProductRow>>
    where
        E: SqliteExecutor<'e>,
    {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT * FROM products WHERE id = ? AND client_id = ?",
        )
        .bind(product_id)
        .bind(client_id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    /// All products of a client, newest first
    pub async fn list_by_client<'e, E>(executor: E, client_id: &str) -> PersistenceResult<Vec<ProductRow>>
    where
        E: SqliteExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT * FROM products WHERE client_id = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(client_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Add `amount_minor` to an owned product's balance.
    ///
    /// Returns the updated row, or `None` when no owned product matched.
    pub async fn credit<'e, E>(
        executor: E,
        client_id: &str,
        product_id: &str,
        amount_minor: i64,
    ) -> PersistenceResult<Option<ProductRow>>
    where
        E: SqliteExecutor<'e>,
    {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET balance_minor = balance_minor + ?
            WHERE id = ? AND client_id = ?
            RETURNING *
            "#,
        )
        .bind(amount_minor)
        .bind(product_id)
        .bind(client_id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    /// Subtract `amount_minor` only if the balance covers it.
    ///
    /// The guard is part of the UPDATE itself, so two racing withdrawals
    /// cannot both pass it. `None` means "not owned, missing, or insufficient".
    pub async fn debit_if_covered<'e, E>(
        executor: E,
        client_id: &str,
        product_id: &str,
        amount_minor: i64,
    ) -> PersistenceResult<Option<ProductRow>>
    where
        E: SqliteExecutor<'e>,
    {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET balance_minor = balance_minor - ?
            WHERE id = ? AND client_id = ? AND balance_minor >= ?
            RETURNING *
            "#,
        )
        .bind(amount_minor)
        .bind(product_id)
        .bind(client_id)
        .bind(amount_minor)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    pub async fn count<'e, E>(executor: E) -> PersistenceResult<i64>
    where
        E: SqliteExecutor<'e>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Transaction Repository
// ============================================================================

/// Repository cho transactions table
pub struct TransactionRepo;

impl TransactionRepo {
    /// Thêm transaction mới
    pub async fn insert<'e, E>(executor: E, tx: &TransactionRow) -> PersistenceResult<()>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, product_id, kind, amount_minor, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&tx.id)
        .bind(&tx.product_id)
        .bind(&tx.kind)
        .bind(tx.amount_minor)
        .bind(&tx.description)
        .bind(tx.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Latest `limit` transactions of a product, newest first
    pub async fn recent_by_product<'e, E>(
        executor: E,
        product_id: &str,
        limit: u32,
    ) -> PersistenceResult<Vec<TransactionRow>>
    where
        E: SqliteExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT * FROM transactions
            WHERE product_id = ?
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(product_id)
        .bind(i64::from(limit))
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Signed sum of every entry of a product, in minor units
    pub async fn net_effect_minor<'e, E>(executor: E, product_id: &str) -> PersistenceResult<i64>
    where
        E: SqliteExecutor<'e>,
    {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(CASE kind WHEN 'DEPOSIT' THEN amount_minor ELSE -amount_minor END), 0)
            FROM transactions
            WHERE product_id = ?
            "#,
        )
        .bind(product_id)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }

    /// Đếm transactions
    pub async fn count<'e, E>(executor: E) -> PersistenceResult<i64>
    where
        E: SqliteExecutor<'e>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions")
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Database initialization
// ============================================================================

/// Pool tuning. `busy_timeout` bounds how long a writer waits for the lock
/// before the call fails.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub busy_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// Khởi tạo database connection pool
pub async fn create_pool(database_url: &str, settings: &PoolSettings) -> PersistenceResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(settings.busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Chạy migrations
pub async fn run_migrations(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Tạo database mới với schema
pub async fn init_database(database_url: &str, settings: &PoolSettings) -> PersistenceResult<SqlitePool> {
    let pool = create_pool(database_url, settings).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
