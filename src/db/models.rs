use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: i64,
}

/// `creator` is a snapshot of the creator's username, not a live reference.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub creator: String,
    pub created_at: i64,
}

/// `author` is a snapshot of the poster's username.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    #[serde(skip_serializing)]
    pub room_id: String,
    pub author: String,
    pub content: String,
    pub created_at: i64,
}
