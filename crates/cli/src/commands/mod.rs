//! Subcommand handlers. Results are printed to stdout as pretty JSON.

pub mod auth;
pub mod product;

use anyhow::{anyhow, Result};
use banca_business::{BusinessError, ServiceContext};
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Keep the stable error code visible to scripts
fn failure(err: BusinessError) -> anyhow::Error {
    anyhow!("[{}] {}", err.code(), err)
}

/// Client id behind the `--token` / `BANCA_TOKEN` access token
fn authenticated_client(ctx: &ServiceContext, token: Option<&str>) -> Result<String> {
    let token = token.ok_or_else(|| anyhow!("An access token is required (--token or BANCA_TOKEN)"))?;
    ctx.identity().resolve_access_token(token).map_err(failure)
}
