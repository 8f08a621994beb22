use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    /// Base URL of the remote booking backend. Empty means local store only.
    pub remote_api_url: String,
    pub remote_api_token: String,
    pub remote_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "salon.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            remote_api_url: env::var("REMOTE_API_URL").unwrap_or_default(),
            remote_api_token: env::var("REMOTE_API_TOKEN").unwrap_or_default(),
            remote_timeout_secs: env::var("REMOTE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    pub fn uses_remote(&self) -> bool {
        !self.remote_api_url.trim().is_empty()
    }
}
