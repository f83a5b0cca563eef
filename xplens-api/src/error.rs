use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of the credential exchange.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username and password are required")]
    MissingCredentials,
    #[error("login error: {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("invalid token received")]
    MalformedToken,
    #[error("sign-in request timed out")]
    Timeout,
    #[error("sign-in request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl AuthError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}

/// Single entry of a GraphQL `errors` array.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

/// Failure of the authenticated data query.
#[derive(Debug, Error)]
pub enum DataFetchError {
    #[error("query service answered {status}")]
    Status { status: StatusCode },
    #[error("query service reported {} error(s): {}", .0.len(), first_message(.0))]
    GraphQl(Vec<GraphQlError>),
    #[error("query request timed out")]
    Timeout,
    #[error("query request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("query response could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("query response carried no data")]
    MissingData,
    #[error("query response carried no user record")]
    MissingUser,
}

impl DataFetchError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}

fn first_message(errors: &[GraphQlError]) -> &str {
    errors
        .first()
        .map(|err| err.message.as_str())
        .unwrap_or("unknown")
}
