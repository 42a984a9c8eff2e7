//! Domain service for administrator authentication.
//!
//! Verifies credentials and issues/validates bearer tokens.

use serde::Serialize;
use thiserror::Error;

use crate::services::token::Claims;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. The two are not distinguished.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

/// Successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns a signed token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Validates a bearer token's signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] for malformed, tampered or expired tokens.
    fn verify_token(&self, token: &str) -> Result<Claims, AuthError>;
}
