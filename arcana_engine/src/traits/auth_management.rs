use thiserror::Error;

use crate::db_types::Profile;

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Could not complete the database request. {0}")]
    DatabaseError(String),
    #[error("The session token is not valid")]
    SessionNotFound,
}

impl From<sqlx::Error> for AuthApiError {
    fn from(e: sqlx::Error) -> Self {
        AuthApiError::DatabaseError(e.to_string())
    }
}

/// Session lookups. Tokens are opaque strings handed out at login and stored server-side, so
/// authenticating a request is a single indexed read.
#[allow(async_fn_in_trait)]
pub trait AuthManagement: Send + Sync {
    /// Resolves a session token to the profile that owns it.
    async fn profile_for_session(&self, token: &str) -> Result<Profile, AuthApiError>;
}
