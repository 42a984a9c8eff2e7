//! Signed bearer tokens for administrator sessions (HS256 JWT).

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub admin_id: i32,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: &str, ttl_hours: u32) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: i64::from(ttl_hours) * 3600,
        }
    }

    #[must_use]
    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(&security.jwt_secret, security.token_ttl_hours)
    }

    pub fn issue(&self, admin_id: i32) -> jsonwebtoken::errors::Result<String> {
        self.issue_at(admin_id, chrono::Utc::now().timestamp())
    }

    /// Issue a token as if it were signed at `iat` (unix seconds).
    pub fn issue_at(&self, admin_id: i32, iat: i64) -> jsonwebtoken::errors::Result<String> {
        let claims = Claims {
            admin_id,
            iat,
            exp: iat + self.ttl_secs,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Checks signature and expiry.
    pub fn verify(&self, token: &str) -> jsonwebtoken::errors::Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}
