use std::sync::Arc;

use chrono::Duration;
use sqlx::SqlitePool;

use crate::auth::AuthGate;
use crate::config::Config;
use crate::crypto::TokenKeys;
use crate::service::{AccountService, RoomService};

#[derive(Clone)]
pub struct AppState {
    pub gate: AuthGate,
    pub accounts: AccountService,
    pub rooms: RoomService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Arc<Config>) -> Self {
        let keys = Arc::new(TokenKeys::new(
            config.secret.as_bytes(),
            Duration::hours(config.token_expiry_hours),
        ));

        Self {
            gate: AuthGate::new(keys, db.clone()),
            accounts: AccountService::new(db.clone()),
            rooms: RoomService::new(db),
            config,
        }
    }
}
