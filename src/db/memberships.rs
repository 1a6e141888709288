use sqlx::SqliteConnection;

use crate::error::AppError;

/// The user <-> room relation. Both `user.rooms` and `room.members` are read from here.
pub struct MembershipRepository;

impl MembershipRepository {
    /// Returns `false` when the pair already exists.
    pub async fn add(
        conn: &mut SqliteConnection,
        user_id: &str,
        room_id: &str,
    ) -> Result<bool, AppError> {
        let joined_at = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            "INSERT OR IGNORE INTO memberships (user_id, room_id, joined_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(room_id)
        .bind(joined_at)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Returns `false` when the pair did not exist.
    pub async fn remove(
        conn: &mut SqliteConnection,
        user_id: &str,
        room_id: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM memberships WHERE user_id = ? AND room_id = ?")
            .bind(user_id)
            .bind(room_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Drop every membership of a room. Returns how many users were detached.
    pub async fn remove_room(conn: &mut SqliteConnection, room_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM memberships WHERE room_id = ?")
            .bind(room_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn is_member(
        conn: &mut SqliteConnection,
        user_id: &str,
        room_id: &str,
    ) -> Result<bool, AppError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM memberships WHERE user_id = ? AND room_id = ?")
                .bind(user_id)
                .bind(room_id)
                .fetch_optional(conn)
                .await?;

        Ok(row.is_some())
    }

    pub async fn room_ids_for_user(
        conn: &mut SqliteConnection,
        user_id: &str,
    ) -> Result<Vec<String>, AppError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT room_id FROM memberships WHERE user_id = ? ORDER BY joined_at ASC, rowid ASC",
        )
        .bind(user_id)
        .fetch_all(conn)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Usernames of the room's members, in join order.
    pub async fn member_names(
        conn: &mut SqliteConnection,
        room_id: &str,
    ) -> Result<Vec<String>, AppError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
SELECT u.username
FROM memberships m
JOIN users u ON u.id = m.user_id
WHERE m.room_id = ?
ORDER BY m.joined_at ASC, m.rowid ASC
            "#,
        )
        .bind(room_id)
        .fetch_all(conn)
        .await?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }
}
