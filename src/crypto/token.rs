use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AuthError};

/// Bearer token claims. `sub` is the user id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: &str, username: &str, expires_in: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }
}

/// HMAC signing keys derived from the server secret.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::default(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user_id: &str, username: &str) -> Result<String, AppError> {
        self.issue_with_ttl(user_id, username, self.ttl)
    }

    pub fn issue_with_ttl(
        &self,
        user_id: &str,
        username: &str,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let claims = Claims::new(user_id, username, ttl);
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Crypto(format!("Token signing failed: {}", e)))
    }

    /// Check signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new(b"test-secret", Duration::hours(1))
    }

    #[test]
    fn test_issue_verify() {
        let keys = keys();
        let token = keys.issue("user-1", "alice123").unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.username, "alice123");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = keys().issue("user-1", "alice123").unwrap();
        let other = TokenKeys::new(b"other-secret", Duration::hours(1));
        assert_eq!(other.verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_expired_rejected() {
        let keys = keys();
        let token = keys
            .issue_with_ttl("user-1", "alice123", Duration::hours(-2))
            .unwrap();
        assert_eq!(keys.verify(&token), Err(AuthError::ExpiredToken));
    }

    #[test]
    fn test_garbage_rejected() {
        assert_eq!(keys().verify("not.a.token"), Err(AuthError::InvalidToken));
        assert_eq!(keys().verify(""), Err(AuthError::InvalidToken));
    }
}
