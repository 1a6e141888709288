use axum::extract::FromRequest;

use crate::error::AppError;

/// `Json` whose rejections (bad syntax, wrong shape, missing content type) render
/// as `AppError::Validation` instead of axum's plain-text bodies.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
