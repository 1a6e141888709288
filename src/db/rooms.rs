use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::db::models::Room;
use crate::error::AppError;

pub struct RoomRepository;

impl RoomRepository {
    pub async fn create(
        conn: &mut SqliteConnection,
        name: &str,
        password_hash: &str,
        creator: &str,
    ) -> Result<Room, AppError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();

        let room = sqlx::query_as::<_, Room>(
            r#"
INSERT INTO rooms (id, name, password_hash, creator, created_at)
VALUES (?, ?, ?, ?, ?)
RETURNING id, name, password_hash, creator, created_at
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(password_hash)
        .bind(creator)
        .bind(created_at)
        .fetch_one(conn)
        .await?;

        Ok(room)
    }

    pub async fn get_by_id(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<Room>, AppError> {
        let room = sqlx::query_as::<_, Room>(
            "SELECT id, name, password_hash, creator, created_at FROM rooms WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(room)
    }

    /// Rooms the user belongs to, in the order they were joined.
    pub async fn list_for_user(
        conn: &mut SqliteConnection,
        user_id: &str,
    ) -> Result<Vec<Room>, AppError> {
        let rooms = sqlx::query_as::<_, Room>(
            r#"
SELECT r.id, r.name, r.password_hash, r.creator, r.created_at
FROM rooms r
JOIN memberships m ON m.room_id = r.id
WHERE m.user_id = ?
ORDER BY m.joined_at ASC, m.rowid ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(conn)
        .await?;

        Ok(rooms)
    }

    /// Returns whether a row was removed.
    pub async fn delete(conn: &mut SqliteConnection, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
