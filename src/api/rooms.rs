use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::api::extract::ApiJson;
use crate::api::state::AppState;
use crate::auth::Identity;
use crate::error::AppError;
use crate::service::{MessageContent, Password, RoomDetail, RoomName, RoomView};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub room_pass: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinRoomRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    #[serde(default)]
    pub content: String,
}

/// GET /rooms
pub async fn list_rooms(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<RoomView>>, AppError> {
    Ok(Json(state.rooms.list_rooms_for_user(&identity).await?))
}

/// GET /rooms/:id
pub async fn get_room(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetail>, AppError> {
    Ok(Json(state.rooms.get_room(&identity, &room_id).await?))
}

/// POST /rooms
pub async fn create_room(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(req): ApiJson<CreateRoomRequest>,
) -> Result<Json<RoomView>, AppError> {
    let name = RoomName::parse(req.room_name)?;
    let password = Password::parse(req.room_pass)?;

    Ok(Json(state.rooms.create_room(&identity, &name, &password).await?))
}

/// DELETE /rooms/:id
pub async fn delete_room(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(room_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.rooms.delete_room(&identity, &room_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /rooms/join/:id
pub async fn join_room(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(room_id): Path<String>,
    ApiJson(req): ApiJson<JoinRoomRequest>,
) -> Result<StatusCode, AppError> {
    state.rooms.join_room(&identity, &room_id, &req.password).await?;
    Ok(StatusCode::OK)
}

/// PATCH /rooms/leave/:id
pub async fn leave_room(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(room_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.rooms.leave_room(&identity, &room_id).await?;
    Ok(StatusCode::OK)
}

/// POST /rooms/:id/message
pub async fn post_message(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(room_id): Path<String>,
    ApiJson(req): ApiJson<PostMessageRequest>,
) -> Result<Json<RoomDetail>, AppError> {
    let content = MessageContent::parse(req.content)?;
    Ok(Json(state.rooms.post_message(&identity, &room_id, &content).await?))
}
