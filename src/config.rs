use crate::api::endpoints::HISTORY_ENDPOINT;
use crate::error::AppError;
use std::env;

/// Track-o-bot only keeps per-card history for this many days.
pub const MAX_WINDOW_DAYS: u32 = 10;

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Option<Credentials>,
    pub history_url: String,
    pub days: u32,
}

impl Config {
    /// Build the fetch configuration. Explicit flags win over `.env` values.
    pub fn from_env(
        username: Option<String>,
        token: Option<String>,
        days: u32,
    ) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let username = username.or_else(|| env::var("TRACKOBOT_USERNAME").ok());
        let token = token.or_else(|| env::var("TRACKOBOT_TOKEN").ok());
        let history_url =
            env::var("TRACKOBOT_HISTORY_URL").unwrap_or_else(|_| HISTORY_ENDPOINT.to_string());

        let credentials = match (username, token) {
            (Some(username), Some(token)) if !username.is_empty() && !token.is_empty() => {
                Some(Credentials { username, token })
            }
            _ => None,
        };

        Ok(Config {
            credentials,
            history_url,
            days: clamp_days(days),
        })
    }

    pub fn require_credentials(&self) -> Result<&Credentials, AppError> {
        self.credentials.as_ref().ok_or_else(|| {
            AppError::ConfigError(
                "You must specify either your username and token or an input file.".to_string(),
            )
        })
    }
}

pub fn clamp_days(days: u32) -> u32 {
    days.clamp(1, MAX_WINDOW_DAYS)
}
