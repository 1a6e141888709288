use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::extract::ApiJson;
use crate::api::state::AppState;
use crate::auth::Identity;
use crate::error::AppError;
use crate::service::{Password, UserView, Username};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub id: String,
    pub username: String,
    pub expires_in: i64,
}

/// POST /signup
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> Result<Json<UserView>, AppError> {
    let username = Username::parse(req.username)?;
    let password = Password::parse(req.password)?;

    let user = state.accounts.create_user(&username, &password).await?;
    let view = state.accounts.view(&user.id, &user.username).await?;

    Ok(Json(view))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state
        .accounts
        .check_credentials(&req.username, &req.password)
        .await?;

    let token = state.gate.keys().issue(&user.id, &user.username)?;
    tracing::info!(user_id = %user.id, "login");

    Ok(Json(LoginResponse {
        token,
        id: user.id,
        username: user.username,
        expires_in: state.gate.keys().ttl().num_seconds(),
    }))
}

/// GET /users/me (requires auth)
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<UserView>, AppError> {
    Ok(Json(state.accounts.view_identity(&identity).await?))
}
