//! Identity and second-factor authentication
//!
//! Login is two steps. The password step opens a short-lived pending session
//! and hands back an opaque login token; the code step consumes that session
//! exactly once and issues an access token.

use crate::error::{BusinessError, BusinessResult};
use crate::password::SecretHasher;
use crate::services::{AuthenticatedSession, ServiceContext};
use banca_core::validation;
use banca_core::{
    Client, LoginChallenge, PendingSession, RegisteredClient, Registration, TotpEnrollment,
};
use banca_persistence::{ClientRepo, ClientRow, PendingSessionRepo, PendingSessionRow};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Identity Service - registration, login steps and token resolution
pub struct IdentityService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> IdentityService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new client with a fresh TOTP secret.
    ///
    /// The enrollment payload is only ever returned here.
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> BusinessResult<RegisteredClient> {
        let registration = Registration::new(full_name, email, password)?;
        let pool = self.ctx.pool();

        if ClientRepo::find_by_email(pool, &registration.email).await?.is_some() {
            return Err(BusinessError::DuplicateIdentity);
        }

        let password_hash = hash_secret(self.ctx.hasher(), registration.password.clone()).await?;
        let otp = self.ctx.otp().generate_secret(&registration.email)?;

        let row = ClientRow {
            id: Uuid::new_v4().to_string(),
            full_name: registration.full_name,
            email: registration.email,
            password_hash,
            totp_secret: otp.base32.clone(),
            created_at: Utc::now(),
        };

        // a concurrent registration can still win between lookup and insert
        ClientRepo::insert(pool, &row).await.map_err(|e| {
            if e.is_unique_violation() {
                BusinessError::DuplicateIdentity
            } else {
                e.into()
            }
        })?;

        info!(client_id = %row.id, "client registered");

        Ok(RegisteredClient {
            client: Client::from(row),
            totp: TotpEnrollment {
                base32: otp.base32,
                otpauth_url: otp.otpauth_url,
            },
        })
    }

    /// Password step. Unknown email and wrong password fail identically.
    pub async fn initiate_login(&self, email: &str, password: &str) -> BusinessResult<LoginChallenge> {
        let email = validation::normalize_email(email)?;
        if password.is_empty() {
            return Err(BusinessError::Validation("password is required".to_string()));
        }

        let pool = self.ctx.pool();
        let Some(client) = ClientRepo::find_by_email(pool, &email).await? else {
            warn!("login rejected: unknown email");
            return Err(BusinessError::InvalidCredentials);
        };

        let verified = verify_secret(
            self.ctx.hasher(),
            password.to_string(),
            client.password_hash.clone(),
        )
        .await?;
        if !verified {
            warn!(client_id = %client.id, "login rejected: wrong password");
            return Err(BusinessError::InvalidCredentials);
        }

        let session = PendingSession::open(&client.id, self.ctx.config().pending_session_ttl);
        PendingSessionRepo::insert(pool, &PendingSessionRow::from(&session)).await?;

        info!(client_id = %client.id, expires_at = %session.expires_at, "password verified, awaiting code");
        Ok(session.challenge())
    }

    /// Code step. Consumes the pending session on success.
    ///
    /// A wrong code leaves the session in place, so the caller may retry
    /// until it expires.
    pub async fn complete_login(
        &self,
        login_token: &str,
        code: &str,
    ) -> BusinessResult<AuthenticatedSession> {
        validation::validate_otp_code(code)?;
        let pool = self.ctx.pool();

        let session: PendingSession = PendingSessionRepo::find_by_token(pool, login_token)
            .await?
            .ok_or(BusinessError::InvalidToken)?
            .into();

        let now = Utc::now();
        if session.is_expired_at(now) {
            PendingSessionRepo::delete_by_token(pool, login_token).await?;
            warn!(client_id = %session.client_id, "login rejected: pending session expired");
            return Err(BusinessError::TokenExpired);
        }

        let client = ClientRepo::get_by_id(pool, &session.client_id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    BusinessError::InvalidToken
                } else {
                    e.into()
                }
            })?;

        let skew = self.ctx.config().otp_skew_steps;
        if !self.ctx.otp().verify(&client.totp_secret, code, skew, now) {
            warn!(client_id = %client.id, "login rejected: wrong code");
            return Err(BusinessError::InvalidOtp);
        }

        // whoever deletes the row owns the login; a concurrent caller sees 0
        if PendingSessionRepo::delete_by_token(pool, login_token).await? == 0 {
            warn!(client_id = %client.id, "login rejected: pending session already consumed");
            return Err(BusinessError::InvalidToken);
        }

        let issued = self.ctx.tokens().sign(&client.id)?;
        info!(client_id = %client.id, "login completed");

        Ok(AuthenticatedSession {
            access_token: issued.token,
            expires_at: issued.expires_at,
            client: Client::from(client),
        })
    }

    /// Client id bound to a valid access token
    pub fn resolve_access_token(&self, token: &str) -> BusinessResult<String> {
        Ok(self.ctx.tokens().verify(token)?.client_id)
    }

    pub async fn profile(&self, client_id: &str) -> BusinessResult<Client> {
        match ClientRepo::get_by_id(self.ctx.pool(), client_id).await {
            Ok(row) => Ok(Client::from(row)),
            Err(e) if e.is_not_found() => Err(BusinessError::NotFound("Client")),
            Err(e) => Err(e.into()),
        }
    }
}

async fn hash_secret(hasher: Arc<dyn SecretHasher>, secret: String) -> BusinessResult<String> {
    tokio::task::spawn_blocking(move || hasher.hash(&secret))
        .await
        .map_err(|e| BusinessError::internal(format!("hashing task failed: {}", e)))?
}

async fn verify_secret(
    hasher: Arc<dyn SecretHasher>,
    secret: String,
    hash: String,
) -> BusinessResult<bool> {
    tokio::task::spawn_blocking(move || hasher.verify(&secret, &hash))
        .await
        .map_err(|e| BusinessError::internal(format!("hashing task failed: {}", e)))
}
