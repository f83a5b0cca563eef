use std::future::Future;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use xplens_utils::token;

use crate::config::ApiConfig;
use crate::error::AuthError;

/// Exchanges credentials for a session token.
///
/// Implementations return the normalized token and never persist it.
pub trait CredentialExchange {
    fn exchange(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<String, AuthError>> + Send;
}

/// Basic-auth sign-in against the auth endpoint.
#[derive(Clone, Debug)]
pub struct AuthClient {
    http: reqwest::Client,
    url: String,
}

impl AuthClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Self> {
        Ok(Self::new(config.http_client()?, config.auth_url.clone()))
    }
}

impl CredentialExchange for AuthClient {
    async fn exchange(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        debug!(url = %self.url, username, "requesting session token");

        let response = self
            .http
            .post(&self.url)
            .basic_auth(username, Some(password))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(AuthError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(AuthError::from_transport)?;

        parse_exchange_response(status, &body).inspect_err(|err| {
            debug!(%status, error = %err, "credential exchange failed");
        })
    }
}

/// Turn the auth endpoint's answer into a normalized token.
///
/// The success body is the bare token as text, possibly JSON-quoted. A
/// failure body is passed through as the error text.
pub fn parse_exchange_response(status: StatusCode, body: &str) -> Result<String, AuthError> {
    if !status.is_success() {
        let body = body.trim();
        let body = if body.is_empty() {
            status.canonical_reason().unwrap_or("request rejected")
        } else {
            body
        };

        return Err(AuthError::Rejected {
            status,
            body: body.to_owned(),
        });
    }

    if !token::is_valid(body) {
        return Err(AuthError::MalformedToken);
    }

    Ok(token::normalize(body).to_owned())
}
