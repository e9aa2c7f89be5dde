//! Database initialization and status

use anyhow::{Context, Result};
use banca_business::{BankConfig, ServiceContext};
use banca_persistence::{
    ClientRepo, Database, PendingSessionRepo, ProductRepo, TransactionRepo,
};
use chrono::Utc;
use std::path::Path;
use tracing::debug;

/// Create the database file (and its directory) and apply migrations
pub async fn init_database(database_url: &str) -> Result<()> {
    ensure_parent_dir(database_url)?;
    let db = Database::init(database_url)
        .await
        .context("Failed to initialize database")?;
    db.close().await;
    Ok(())
}

/// Show record counts
pub async fn show_status(database_url: &str) -> Result<()> {
    let db = connect(database_url).await?;
    let pool = db.pool();

    let clients = ClientRepo::count(pool).await?;
    let sessions = PendingSessionRepo::count(pool).await?;
    let products = ProductRepo::count(pool).await?;
    let transactions = TransactionRepo::count(pool).await?;

    println!("📊 Database Status");
    println!("   URL: {}", database_url);
    println!();
    println!("   Clients:          {}", clients);
    println!("   Pending sessions: {}", sessions);
    println!("   Products:         {}", products);
    println!("   Transactions:     {}", transactions);

    db.close().await;
    Ok(())
}

/// Delete every pending session past its expiry
pub async fn purge_sessions(database_url: &str) -> Result<()> {
    let db = connect(database_url).await?;
    let removed = PendingSessionRepo::purge_expired(db.pool(), Utc::now())
        .await
        .context("Failed to purge pending sessions")?;
    println!("🧹 Removed {} expired pending session(s)", removed);
    db.close().await;
    Ok(())
}

/// Service context over an initialized database
pub async fn context(database_url: &str, config: BankConfig) -> Result<ServiceContext> {
    let db = connect(database_url).await?;
    Ok(ServiceContext::new(&db, config))
}

async fn connect(database_url: &str) -> Result<Database> {
    ensure_parent_dir(database_url)?;
    debug!(database_url, "opening database");
    Database::init(database_url)
        .await
        .context("Failed to open database")
}

fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let path = database_url
        .trim_start_matches("sqlite:")
        .trim_start_matches("//");
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}
