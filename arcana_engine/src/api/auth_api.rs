use crate::{
    db_types::Profile,
    traits::{AuthApiError, AuthManagement},
};

pub struct AuthApi<B> {
    db: B,
}

impl<B: std::fmt::Debug> std::fmt::Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?})", self.db)
    }
}

impl<B> AuthApi<B>
where B: AuthManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Resolves a bearer session token to the profile that owns it.
    pub async fn profile_from_token(&self, token: &str) -> Result<Profile, AuthApiError> {
        self.db.profile_for_session(token).await
    }
}
