use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::db::models::Message;
use crate::error::AppError;

pub struct MessageRepository;

impl MessageRepository {
    pub async fn create(
        conn: &mut SqliteConnection,
        room_id: &str,
        author: &str,
        content: &str,
    ) -> Result<Message, AppError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();

        let message = sqlx::query_as::<_, Message>(
            r#"
INSERT INTO messages (id, room_id, author, content, created_at)
VALUES (?, ?, ?, ?, ?)
RETURNING id, room_id, author, content, created_at
            "#,
        )
        .bind(&id)
        .bind(room_id)
        .bind(author)
        .bind(content)
        .bind(created_at)
        .fetch_one(conn)
        .await?;

        Ok(message)
    }

    /// All messages of a room in insertion order.
    pub async fn list_for_room(
        conn: &mut SqliteConnection,
        room_id: &str,
    ) -> Result<Vec<Message>, AppError> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
SELECT id, room_id, author, content, created_at
FROM messages
WHERE room_id = ?
ORDER BY seq ASC
            "#,
        )
        .bind(room_id)
        .fetch_all(conn)
        .await?;

        Ok(messages)
    }

    pub async fn ids_for_room(
        conn: &mut SqliteConnection,
        room_id: &str,
    ) -> Result<Vec<String>, AppError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT id FROM messages WHERE room_id = ? ORDER BY seq ASC")
                .bind(room_id)
                .fetch_all(conn)
                .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn delete_for_room(
        conn: &mut SqliteConnection,
        room_id: &str,
    ) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM messages WHERE room_id = ?")
            .bind(room_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}
