// src/config/credentials.rs
use crate::error::ConfigError;
use std::env;

pub const ENV_CLIENT_ID: &str = "REDDIT_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "REDDIT_CLIENT_SECRET";
pub const ENV_USER_AGENT: &str = "REDDIT_USER_AGENT";
pub const ENV_AUTH_BASE: &str = "REDDIT_AUTH_BASE";
pub const ENV_API_BASE: &str = "REDDIT_API_BASE";

pub const DEFAULT_AUTH_BASE: &str = "https://www.reddit.com";
pub const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";

/// App-only OAuth credentials plus endpoint bases.
#[derive(Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    pub auth_base: String,
    pub api_base: String,
}

// Keep the secret out of debug output.
impl std::fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &self.client_id)
            .field("secret_len", &self.client_secret.len())
            .field("user_agent", &self.user_agent)
            .field("auth_base", &self.auth_base)
            .field("api_base", &self.api_base)
            .finish()
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingCredential(name))
}

impl RedditCredentials {
    /// Read credentials from the process environment (call `dotenvy::dotenv()` first).
    pub fn from_env() -> Result<Self, ConfigError> {
        // user agent first: without it Reddit rejects every call
        let user_agent = required(ENV_USER_AGENT)?;
        let client_id = required(ENV_CLIENT_ID)?;
        let client_secret = required(ENV_CLIENT_SECRET)?;
        let auth_base = env::var(ENV_AUTH_BASE).unwrap_or_else(|_| DEFAULT_AUTH_BASE.into());
        let api_base = env::var(ENV_API_BASE).unwrap_or_else(|_| DEFAULT_API_BASE.into());
        Ok(Self {
            client_id,
            client_secret,
            user_agent,
            auth_base: auth_base.trim_end_matches('/').to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }
}
