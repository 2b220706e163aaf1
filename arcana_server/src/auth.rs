//! Session authentication.
//!
//! Clients authenticate with an opaque session token issued at login and sent on every request in
//! the `x-session-token` header (or as a bearer token). The extractor resolves the token against
//! the session store, so handlers simply declare an [`AuthenticatedProfile`] parameter and
//! receive the caller's profile.

use std::ops::Deref;

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use arcana_engine::{db_types::Profile, AuthApi, SqliteDatabase};
use futures::future::LocalBoxFuture;
use log::*;

use crate::errors::{AuthError, ServerError};

pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

#[derive(Debug, Clone)]
pub struct AuthenticatedProfile(pub Profile);

impl Deref for AuthenticatedProfile {
    type Target = Profile;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AuthenticatedProfile {
    pub fn into_inner(self) -> Profile {
        self.0
    }
}

/// Pulls the session token from the `x-session-token` header, falling back to a standard
/// `Authorization: Bearer` header.
fn extract_token(req: &HttpRequest) -> Option<String> {
    if let Some(token) = req.headers().get(SESSION_TOKEN_HEADER).and_then(|v| v.to_str().ok()) {
        return Some(token.to_string());
    }
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

impl FromRequest for AuthenticatedProfile {
    type Error = ServerError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = extract_token(req);
        let api = req.app_data::<web::Data<AuthApi<SqliteDatabase>>>().cloned();
        Box::pin(async move {
            let api = api.ok_or_else(|| {
                error!("🔐️ AuthApi is not registered with the server. This is a bug.");
                ServerError::ConfigurationError("Authentication is not configured".to_string())
            })?;
            let token = token.ok_or(AuthError::MissingToken)?;
            let profile = api.profile_from_token(&token).await?;
            trace!("🔐️ Session resolved to profile {}", profile.id);
            Ok(Self(profile))
        })
    }
}
