//! # Banca Business
//!
//! Business logic layer - two-step authentication and the account ledger.

pub mod config;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod password;
pub mod services;
pub mod token;
pub mod totp;

pub use config::BankConfig;
pub use error::{BusinessError, BusinessResult};
pub use identity::IdentityService;
pub use ledger::LedgerService;
pub use password::{Argon2Hasher, SecretHasher};
pub use services::{AuthenticatedSession, BalanceCheck, ServiceContext};
pub use token::{AccessTokens, IssuedToken, VerifiedToken};
pub use totp::{OtpProvider, OtpSecret, TotpProvider};
