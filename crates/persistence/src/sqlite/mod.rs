//! SQLite persistence module
//!
//! Repository pattern cho SQLite database access.

pub mod repos;
pub mod schema;

pub use repos::{
    create_pool, init_database, run_migrations, ClientRepo, PendingSessionRepo, PoolSettings,
    ProductRepo, TransactionRepo,
};
pub use schema::{ClientRow, PendingSessionRow, ProductRow, TransactionRow};
