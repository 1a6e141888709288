use crate::error::AppError;

/// One year.
pub const MAX_TOKEN_EXPIRY_HOURS: i64 = 24 * 365;

#[derive(Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub secret: String,
    pub token_expiry_hours: i64,
    pub db_max_connections: u32,
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("database_url", &self.database_url)
            .field("secret", &"<redacted>")
            .field("token_expiry_hours", &self.token_expiry_hours)
            .field("db_max_connections", &self.db_max_connections)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Config("SECRET must be set".to_string()))?;

        let token_expiry_hours: i64 = parse_var(&lookup, "TOKEN_EXPIRY_HOURS", "24")?;
        if !(1..=MAX_TOKEN_EXPIRY_HOURS).contains(&token_expiry_hours) {
            return Err(AppError::Config(format!(
                "TOKEN_EXPIRY_HOURS must be between 1 and {}",
                MAX_TOKEN_EXPIRY_HOURS
            )));
        }

        Ok(Config {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: parse_var(&lookup, "SERVER_PORT", "3003")?,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://room_chat.db".to_string()),
            secret,
            token_expiry_hours,
            db_max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", "10")?,
            request_timeout_secs: parse_var(&lookup, "REQUEST_TIMEOUT_SECS", "30")?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid {}: {}", key, e)))
}
