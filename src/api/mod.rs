pub mod accounts;
pub mod extract;
pub mod middleware;
pub mod rooms;
pub mod state;

pub use state::AppState;

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use serde::Serialize;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    // Everything below requires a bearer token
    let protected = Router::new()
        .route("/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route("/rooms/:id", get(rooms::get_room).delete(rooms::delete_room))
        .route("/rooms/join/:id", patch(rooms::join_room))
        .route("/rooms/leave/:id", patch(rooms::leave_room))
        .route("/rooms/:id/message", post(rooms::post_message))
        .route("/users/me", get(accounts::me))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/signup", post(accounts::signup))
        .route("/login", post(accounts::login))
        .merge(protected)
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
