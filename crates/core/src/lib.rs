//! # Banca Core
//!
//! Domain types shared by every layer: clients, pending sessions, products,
//! ledger transactions, money and the input policy that guards them.

pub mod client;
pub mod error;
pub mod money;
pub mod product;
pub mod session;
pub mod transaction;
pub mod validation;

pub use client::{Client, RegisteredClient, Registration, TotpEnrollment};
pub use error::{CoreError, CoreResult};
pub use money::{Amount, CurrencyCode};
pub use product::{NewProduct, Product};
pub use session::{LoginChallenge, PendingSession};
pub use transaction::{Transaction, TransactionKind};
