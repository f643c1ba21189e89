use std::env;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base URL of the budget backend that stores plans, categories and spends.
    pub backend_url: String,
    /// Bearer token forwarded to the backend, if any.
    pub backend_token: Option<String>,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 7070,
            backend_url: DEFAULT_BACKEND_URL.into(),
            backend_token: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Self {
            host: env::var("ALLOWANCE_HOST").unwrap_or(defaults.host),
            port: env::var("ALLOWANCE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            backend_url: env::var("ALLOWANCE_BACKEND_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.backend_url),
            backend_token: env::var("ALLOWANCE_BACKEND_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            request_timeout: env::var("ALLOWANCE_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
