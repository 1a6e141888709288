use serde::Serialize;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::auth::Identity;
use crate::crypto::{hash_password, verify_password};
use crate::db::{Message, MembershipRepository, MessageRepository, Room, RoomRepository};
use crate::error::{AppError, RoomError};
use crate::service::values::{MessageContent, Password, RoomName};

/// Room as listed or returned after creation. Messages appear as ids.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RoomView {
    pub id: String,
    pub name: String,
    pub created_at: i64,
    pub creator: String,
    pub members: Vec<String>,
    pub messages: Vec<String>,
}

/// Room with its messages resolved, oldest first.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RoomDetail {
    pub id: String,
    pub name: String,
    pub created_at: i64,
    pub creator: String,
    pub members: Vec<String>,
    pub messages: Vec<Message>,
}

/// Membership and message operations. Every invariant spanning users, rooms and
/// messages is enforced here, inside a single transaction per mutation.
#[derive(Clone)]
pub struct RoomService {
    db: SqlitePool,
}

impl RoomService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Take the write lock up front. A deferred transaction that reads first cannot
    /// upgrade once another writer has committed, and fails with SQLITE_BUSY.
    async fn write_tx(&self) -> Result<Transaction<'static, Sqlite>, AppError> {
        Ok(self.db.begin_with("BEGIN IMMEDIATE").await?)
    }

    pub async fn list_rooms_for_user(&self, identity: &Identity) -> Result<Vec<RoomView>, AppError> {
        let mut conn = self.db.acquire().await?;
        let rooms = RoomRepository::list_for_user(&mut conn, &identity.id).await?;

        let mut views = Vec::with_capacity(rooms.len());
        for room in rooms {
            views.push(room_view(&mut conn, room).await?);
        }
        Ok(views)
    }

    pub async fn get_room(&self, identity: &Identity, room_id: &str) -> Result<RoomDetail, AppError> {
        let mut conn = self.db.acquire().await?;

        if !MembershipRepository::is_member(&mut conn, &identity.id, room_id).await? {
            return Err(RoomError::NotMember.into());
        }
        let room = RoomRepository::get_by_id(&mut conn, room_id)
            .await?
            .ok_or(RoomError::NotFound)?;

        room_detail(&mut conn, room).await
    }

    pub async fn create_room(
        &self,
        identity: &Identity,
        name: &RoomName,
        join_password: &Password,
    ) -> Result<RoomView, AppError> {
        let password_hash = hash_password(join_password.expose())?;

        let mut tx = self.write_tx().await?;
        let room = RoomRepository::create(&mut tx, name.as_str(), &password_hash, &identity.username).await?;
        MembershipRepository::add(&mut tx, &identity.id, &room.id).await?;
        let view = room_view(&mut tx, room).await?;
        tx.commit().await?;

        tracing::info!(room_id = %view.id, user_id = %identity.id, "room created");
        Ok(view)
    }

    /// Only the creator may delete. Memberships and messages go with the room.
    pub async fn delete_room(&self, identity: &Identity, room_id: &str) -> Result<(), AppError> {
        let mut tx = self.write_tx().await?;

        let is_member = MembershipRepository::is_member(&mut tx, &identity.id, room_id).await?;
        let room = RoomRepository::get_by_id(&mut tx, room_id).await?;
        let room = match room {
            Some(room) if is_member => room,
            _ => return Err(RoomError::NotFound.into()),
        };

        if room.creator != identity.username {
            return Err(RoomError::NotCreator.into());
        }

        let detached = MembershipRepository::remove_room(&mut tx, room_id).await?;
        let messages = MessageRepository::delete_for_room(&mut tx, room_id).await?;
        RoomRepository::delete(&mut tx, room_id).await?;
        tx.commit().await?;

        tracing::info!(room_id = %room_id, detached, messages, "room deleted");
        Ok(())
    }

    pub async fn join_room(
        &self,
        identity: &Identity,
        room_id: &str,
        password: &str,
    ) -> Result<(), AppError> {
        if uuid::Uuid::parse_str(room_id).is_err() {
            return Err(RoomError::MalformedId.into());
        }

        let mut conn = self.db.acquire().await?;
        let room = RoomRepository::get_by_id(&mut conn, room_id)
            .await?
            .ok_or(RoomError::UnknownRoom)?;
        drop(conn);

        // Hash comparison stays outside the write lock.
        if !verify_password(password, &room.password_hash)? {
            return Err(RoomError::BadPassword.into());
        }

        // The membership key makes a concurrent double join lose nothing.
        let mut tx = self.write_tx().await?;
        if RoomRepository::get_by_id(&mut tx, room_id).await?.is_none() {
            return Err(RoomError::UnknownRoom.into());
        }
        if !MembershipRepository::add(&mut tx, &identity.id, room_id).await? {
            return Err(RoomError::AlreadyMember.into());
        }
        tx.commit().await?;

        tracing::info!(room_id = %room_id, user_id = %identity.id, "joined room");
        Ok(())
    }

    /// Creators cannot leave; they delete the room instead.
    pub async fn leave_room(&self, identity: &Identity, room_id: &str) -> Result<(), AppError> {
        let mut tx = self.write_tx().await?;

        if !MembershipRepository::is_member(&mut tx, &identity.id, room_id).await? {
            return Err(RoomError::NotMember.into());
        }
        let room = RoomRepository::get_by_id(&mut tx, room_id)
            .await?
            .ok_or(RoomError::NotMember)?;

        if room.creator == identity.username {
            return Err(RoomError::IsCreator.into());
        }

        MembershipRepository::remove(&mut tx, &identity.id, room_id).await?;
        tx.commit().await?;

        tracing::info!(room_id = %room_id, user_id = %identity.id, "left room");
        Ok(())
    }

    /// Nothing is written when the room is missing or the caller is not a member.
    pub async fn post_message(
        &self,
        identity: &Identity,
        room_id: &str,
        content: &MessageContent,
    ) -> Result<RoomDetail, AppError> {
        let mut tx = self.write_tx().await?;

        let is_member = MembershipRepository::is_member(&mut tx, &identity.id, room_id).await?;
        let room = RoomRepository::get_by_id(&mut tx, room_id).await?;
        let room = match room {
            Some(room) if is_member => room,
            _ => return Err(RoomError::NotFound.into()),
        };

        let message =
            MessageRepository::create(&mut tx, room_id, &identity.username, content.as_str()).await?;
        let detail = room_detail(&mut tx, room).await?;
        tx.commit().await?;

        tracing::debug!(room_id = %room_id, message_id = %message.id, "message posted");
        Ok(detail)
    }
}

async fn room_view(conn: &mut SqliteConnection, room: Room) -> Result<RoomView, AppError> {
    let members = MembershipRepository::member_names(conn, &room.id).await?;
    let messages = MessageRepository::ids_for_room(conn, &room.id).await?;

    Ok(RoomView {
        id: room.id,
        name: room.name,
        created_at: room.created_at,
        creator: room.creator,
        members,
        messages,
    })
}

async fn room_detail(conn: &mut SqliteConnection, room: Room) -> Result<RoomDetail, AppError> {
    let members = MembershipRepository::member_names(conn, &room.id).await?;
    let messages = MessageRepository::list_for_room(conn, &room.id).await?;

    Ok(RoomDetail {
        id: room.id,
        name: room.name,
        created_at: room.created_at,
        creator: room.creator,
        members,
        messages,
    })
}
