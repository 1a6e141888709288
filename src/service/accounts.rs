use serde::Serialize;
use sqlx::SqlitePool;

use crate::auth::Identity;
use crate::crypto::{hash_password, verify_password};
use crate::db::{MembershipRepository, User, UserRepository};
use crate::error::AppError;
use crate::service::values::{Password, Username};

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub rooms: Vec<String>,
}

/// Signup and credential checks.
#[derive(Clone)]
pub struct AccountService {
    db: SqlitePool,
}

impl AccountService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create_user(&self, username: &Username, password: &Password) -> Result<User, AppError> {
        let password_hash = hash_password(password.expose())?;

        let mut conn = self.db.acquire().await?;
        let user = UserRepository::create(&mut conn, username.as_str(), &password_hash).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    pub fn verify_password(&self, user: &User, plaintext: &str) -> Result<bool, AppError> {
        verify_password(plaintext, &user.password_hash)
    }

    /// Look up a user by name and check the password. Unknown user and wrong password
    /// are reported identically.
    pub async fn check_credentials(&self, username: &str, password: &str) -> Result<User, AppError> {
        let mut conn = self.db.acquire().await?;
        let user = UserRepository::get_by_username(&mut conn, username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;
        drop(conn);

        if !self.verify_password(&user, password)? {
            tracing::debug!(username = %username, "password mismatch");
            return Err(AppError::InvalidCredentials);
        }
        Ok(user)
    }

    pub async fn view(&self, user_id: &str, username: &str) -> Result<UserView, AppError> {
        let mut conn = self.db.acquire().await?;
        let rooms = MembershipRepository::room_ids_for_user(&mut conn, user_id).await?;

        Ok(UserView {
            id: user_id.to_string(),
            username: username.to_string(),
            rooms,
        })
    }

    pub async fn view_identity(&self, identity: &Identity) -> Result<UserView, AppError> {
        self.view(&identity.id, &identity.username).await
    }
}
