use axum::http::StatusCode;
use thiserror::Error;

/// Reasons a bearer credential was rejected. Callers only ever see a 401.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Authorization header must use the Bearer scheme")]
    MalformedHeader,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Token subject does not resolve to a user")]
    UnknownSubject,
}

/// Membership and ownership failures raised by the room service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    #[error("malformed id")]
    MalformedId,

    #[error("user is either not part of the room or no such room")]
    NotFound,

    #[error("invalid room ID")]
    UnknownRoom,

    #[error("no such room for user")]
    NotMember,

    #[error("can't delete room - not the creator")]
    NotCreator,

    #[error("bad room password")]
    BadPassword,

    #[error("already a member of this room")]
    AlreadyMember,

    #[error("can't leave as the room creator - delete the room instead")]
    IsCreator,
}

impl RoomError {
    fn status(&self) -> StatusCode {
        match self {
            RoomError::NotFound => StatusCode::NOT_FOUND,
            RoomError::NotCreator => StatusCode::FORBIDDEN,
            RoomError::MalformedId
            | RoomError::UnknownRoom
            | RoomError::NotMember
            | RoomError::BadPassword
            | RoomError::AlreadyMember
            | RoomError::IsCreator => StatusCode::BAD_REQUEST,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            RoomError::MalformedId => "malformed_id",
            RoomError::NotFound => "not_found",
            RoomError::UnknownRoom => "invalid_room_id",
            RoomError::NotMember => "not_member",
            RoomError::NotCreator => "not_creator",
            RoomError::BadPassword => "bad_password",
            RoomError::AlreadyMember => "already_member",
            RoomError::IsCreator => "is_creator",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("{0}")]
    Room(#[from] RoomError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Username already taken")]
    DuplicateUsername,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Room(err) => err.status(),
            AppError::Validation(_) | AppError::DuplicateUsername => StatusCode::BAD_REQUEST,
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Crypto(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable code placed in the `error` field of the response.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Room(err) => err.code(),
            AppError::Validation(_) => "validation_error",
            AppError::DuplicateUsername => "duplicate_username",
            AppError::InvalidCredentials => "invalid_credentials",
            _ => "internal_error",
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();

        let message = match &self {
            // Which part of the token failed stays server-side.
            AppError::Unauthorized(err) => {
                tracing::debug!(reason = %err, "rejected bearer credential");
                "token missing or invalid".to_string()
            }
            _ if status.is_server_error() => {
                tracing::error!(error = %self, "request failed");
                "internal server error".to_string()
            }
            _ => {
                tracing::warn!(error = %self, "request rejected");
                self.to_string()
            }
        };

        let body = serde_json::json!({
            "error": self.code(),
            "message": message,
        });

        (status, axum::Json(body)).into_response()
    }
}
