use std::env;
use std::time::Duration;

use anyhow::Context as _;

pub const DEFAULT_AUTH_URL: &str = "https://adam-jerusalem.nd.edu/api/auth/signin";
pub const DEFAULT_GRAPHQL_URL: &str = "https://adam-jerusalem.nd.edu/api/graphql-engine/v1/graphql";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Endpoints and transport limits shared by both clients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub auth_url: String,
    pub graphql_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_owned(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let auth_url = env_string("XPLENS_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_owned());
        let graphql_url =
            env_string("XPLENS_GRAPHQL_URL").unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_owned());
        let timeout_secs = env::var("XPLENS_HTTP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            auth_url,
            graphql_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// HTTP client with the bounded wait applied to every request.
    pub fn http_client(&self) -> anyhow::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("xplens/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build http client")
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
