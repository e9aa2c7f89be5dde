//! Shared fixtures for the business integration tests

#![allow(dead_code)]

use banca_business::{Argon2Hasher, BankConfig, ServiceContext, TotpProvider};
use banca_core::RegisteredClient;
use banca_persistence::Database;
use chrono::Utc;
use std::sync::Arc;
use tempfile::TempDir;

pub const PASSWORD: &str = "password1";

/// Service context over a throwaway SQLite file; keep the `TempDir` alive
pub async fn context_with(config: BankConfig) -> (TempDir, ServiceContext) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("banca.db").display());
    let db = Database::init(&url).await.unwrap();

    let ctx = ServiceContext::new(&db, config)
        .with_hasher(Arc::new(Argon2Hasher::with_params(8, 1, 1).unwrap()));
    (dir, ctx)
}

pub async fn context() -> (TempDir, ServiceContext) {
    context_with(BankConfig::default().with_jwt_secret("test-secret")).await
}

pub async fn register_ana(ctx: &ServiceContext) -> RegisteredClient {
    ctx.identity()
        .register("Ana Gómez", "ana@correo.com", PASSWORD)
        .await
        .unwrap()
}

/// Code an authenticator app would show right now
pub fn current_code(secret: &str) -> String {
    TotpProvider::new("Banco 2FA").code_at(secret, Utc::now()).unwrap()
}

/// A code that is not valid for `secret` around now
pub fn wrong_code(secret: &str) -> String {
    let provider = TotpProvider::new("Banco 2FA");
    let now = Utc::now();
    let window: Vec<String> = [-1i64, 0, 1]
        .iter()
        .map(|step| {
            provider
                .code_at(secret, now + chrono::Duration::seconds(30 * step))
                .unwrap()
        })
        .collect();
    (0..1_000_000)
        .map(|n| format!("{:06}", n))
        .find(|candidate| !window.contains(candidate))
        .unwrap()
}

/// Register Ana and run both login steps, returning her client id
pub async fn login_ana(ctx: &ServiceContext) -> String {
    let registered = register_ana(ctx).await;
    let identity = ctx.identity();
    let challenge = identity
        .initiate_login("ana@correo.com", PASSWORD)
        .await
        .unwrap();
    let session = identity
        .complete_login(&challenge.login_token, &current_code(&registered.totp.base32))
        .await
        .unwrap();
    identity.resolve_access_token(&session.access_token).unwrap()
}
