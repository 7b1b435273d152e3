//! Purpose-tagged JWT issuance and verification.
//!
//! Three token kinds flow through the system: activation tokens embedded in
//! onboarding emails, short-lived access tokens, and long-lived refresh
//! tokens. Each carries a `purpose` claim so one kind can never stand in for
//! another.

use crate::error::{StaffError, StaffResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT token time-to-live constants
pub const ACTIVATION_TOKEN_TTL: i64 = 86_400; // 24 hours
pub const ACCESS_TOKEN_TTL: i64 = 3_600; // 1 hour
pub const REFRESH_TOKEN_TTL: i64 = 604_800; // 7 days

/// What a token is allowed to be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPurpose {
    Activation,
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,          // Subject (user ID)
    pub email: String,        // User email
    pub purpose: TokenPurpose,
    pub exp: i64,             // Expiration time
    pub iat: i64,             // Issued at
    pub jti: String,          // JWT ID
}

/// HS256 token issuer shared by auth and onboarding flows
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Create activation token (24 hours)
    pub fn create_activation_token(&self, user_id: Uuid, email: &str) -> StaffResult<String> {
        self.create_token(user_id, email, TokenPurpose::Activation, ACTIVATION_TOKEN_TTL)
    }

    /// Create access token (1 hour)
    pub fn create_access_token(&self, user_id: Uuid, email: &str) -> StaffResult<String> {
        self.create_token(user_id, email, TokenPurpose::Access, ACCESS_TOKEN_TTL)
    }

    /// Create refresh token (7 days)
    pub fn create_refresh_token(&self, user_id: Uuid, email: &str) -> StaffResult<String> {
        self.create_token(user_id, email, TokenPurpose::Refresh, REFRESH_TOKEN_TTL)
    }

    fn create_token(
        &self,
        user_id: Uuid,
        email: &str,
        purpose: TokenPurpose,
        ttl_seconds: i64,
    ) -> StaffResult<String> {
        let now = Utc::now();
        let exp = (now + Duration::seconds(ttl_seconds)).timestamp();
        let iat = now.timestamp();
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            purpose,
            exp,
            iat,
            jti,
        };

        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        let token = encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| StaffError::Internal(format!("Failed to sign token: {}", e)))?;

        Ok(token)
    }

    /// Verify signature and expiry, and require the expected purpose.
    pub fn verify(&self, token: &str, expected: TokenPurpose) -> StaffResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| StaffError::TokenInvalid)?;

        if token_data.claims.purpose != expected {
            return Err(StaffError::TokenInvalid);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret")
    }

    #[test]
    fn test_access_token_round_trip() {
        let issuer = issuer();
        let id = Uuid::now_v7();

        let token = issuer.create_access_token(id, "ada@example.com").unwrap();
        let claims = issuer.verify(&token, TokenPurpose::Access).unwrap();

        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.purpose, TokenPurpose::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_purpose_mismatch_rejected() {
        let issuer = issuer();
        let token = issuer
            .create_refresh_token(Uuid::now_v7(), "ada@example.com")
            .unwrap();

        let result = issuer.verify(&token, TokenPurpose::Access);
        assert!(matches!(result, Err(StaffError::TokenInvalid)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issuer()
            .create_access_token(Uuid::now_v7(), "ada@example.com")
            .unwrap();

        let other = TokenIssuer::new("different-secret");
        let result = other.verify(&token, TokenPurpose::Access);
        assert!(matches!(result, Err(StaffError::TokenInvalid)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let result = issuer().verify("not.a.jwt", TokenPurpose::Access);
        assert!(matches!(result, Err(StaffError::TokenInvalid)));
    }

    #[test]
    fn test_ttl_constants() {
        assert_eq!(ACTIVATION_TOKEN_TTL, 24 * 60 * 60);
        assert_eq!(ACCESS_TOKEN_TTL, 60 * 60);
        assert_eq!(REFRESH_TOKEN_TTL, 7 * 24 * 60 * 60);
    }
}
