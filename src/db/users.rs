use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::db::models::User;
use crate::error::AppError;

pub struct UserRepository;

impl UserRepository {
    /// Insert a user. A taken username surfaces as `DuplicateUsername`.
    pub async fn create(
        conn: &mut SqliteConnection,
        username: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();

        sqlx::query_as::<_, User>(
            r#"
INSERT INTO users (id, username, password_hash, created_at)
VALUES (?, ?, ?, ?)
RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(&id)
        .bind(username)
        .bind(password_hash)
        .bind(created_at)
        .fetch_one(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::DuplicateUsername,
            e => AppError::Database(e),
        })
    }

    pub async fn get_by_username(
        conn: &mut SqliteConnection,
        username: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(conn)
        .await?;

        Ok(user)
    }

    pub async fn get_by_id(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;

    #[tokio::test]
    async fn test_create_and_fetch() {
        let pool = connect_in_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let user = UserRepository::create(&mut conn, "alice123", "hash").await.unwrap();
        let by_name = UserRepository::get_by_username(&mut conn, "alice123")
            .await
            .unwrap()
            .unwrap();
        let by_id = UserRepository::get_by_id(&mut conn, &user.id).await.unwrap().unwrap();

        assert_eq!(by_name.id, user.id);
        assert_eq!(by_id.username, "alice123");
        assert!(UserRepository::get_by_id(&mut conn, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let pool = connect_in_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        UserRepository::create(&mut conn, "alice123", "hash").await.unwrap();
        let result = UserRepository::create(&mut conn, "alice123", "other").await;
        assert!(matches!(result, Err(AppError::DuplicateUsername)));
    }
}
