//! `SeaORM` implementation of the `AuthService` trait.

use crate::db::Store;
use crate::services::auth_service::{AuthError, AuthService, LoginResult};
use crate::services::token::{Claims, TokenIssuer};
use async_trait::async_trait;
use tracing::{debug, info};

pub struct SeaOrmAuthService {
    store: Store,
    tokens: TokenIssuer,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: TokenIssuer) -> Self {
        Self { store, tokens }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        let admin = self
            .store
            .verify_admin_password(username, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self
            .tokens
            .issue(admin.admin_id)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))?;

        info!(admin_id = admin.admin_id, username = %admin.username, "Admin logged in");
        Ok(LoginResult { token })
    }

    fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.tokens.verify(token).map_err(|e| {
            debug!(error = %e, "Rejected bearer token");
            AuthError::InvalidToken
        })
    }
}
