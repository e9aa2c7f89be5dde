//! Registration and login commands

use anyhow::Result;
use banca_business::{BankConfig, ServiceContext, TotpProvider};
use chrono::Utc;

use super::{authenticated_client, failure, print_json};

pub async fn register(
    ctx: &ServiceContext,
    full_name: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let registered = ctx
        .identity()
        .register(full_name, email, password)
        .await
        .map_err(failure)?;
    print_json(&registered)
}

pub async fn login(ctx: &ServiceContext, email: &str, password: &str) -> Result<()> {
    let challenge = ctx
        .identity()
        .initiate_login(email, password)
        .await
        .map_err(failure)?;
    print_json(&challenge)
}

pub async fn verify_otp(ctx: &ServiceContext, login_token: &str, code: &str) -> Result<()> {
    let session = ctx
        .identity()
        .complete_login(login_token, code)
        .await
        .map_err(failure)?;
    print_json(&session)
}

pub async fn profile(ctx: &ServiceContext, token: Option<&str>) -> Result<()> {
    let client_id = authenticated_client(ctx, token)?;
    let client = ctx.identity().profile(&client_id).await.map_err(failure)?;
    print_json(&client)
}

/// What an authenticator app enrolled with `secret` shows right now
pub fn otp_code(config: &BankConfig, secret: &str) -> Result<()> {
    let code = TotpProvider::new(config.otp_issuer.clone())
        .code_at(secret, Utc::now())
        .map_err(failure)?;
    println!("{}", code);
    Ok(())
}
