use std::sync::Arc;

use serde::Serialize;
use sqlx::SqlitePool;

use crate::crypto::TokenKeys;
use crate::db::{User, UserRepository};
use crate::error::{AppError, AuthError};

/// The user behind a validated bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: String,
    pub username: String,
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Resolves `Authorization` headers to identities.
#[derive(Clone)]
pub struct AuthGate {
    keys: Arc<TokenKeys>,
    db: SqlitePool,
}

impl AuthGate {
    pub fn new(keys: Arc<TokenKeys>, db: SqlitePool) -> Self {
        Self { keys, db }
    }

    pub fn keys(&self) -> &TokenKeys {
        &self.keys
    }

    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Identity, AppError> {
        let token = bearer_token(authorization)?;
        let claims = self.keys.verify(token)?;

        let mut conn = self.db.acquire().await?;
        let user = UserRepository::get_by_id(&mut conn, &claims.sub)
            .await?
            .ok_or(AuthError::UnknownSubject)?;

        Ok(Identity::from(user))
    }
}

/// Extract the token from a `Bearer <token>` header value. The scheme is case-insensitive.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, AuthError> {
    let header = authorization.ok_or(AuthError::MissingToken)?;

    let (scheme, token) = header.split_once(' ').ok_or(AuthError::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}
