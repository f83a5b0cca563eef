use thiserror::Error;
use xplens_api::{AuthError, DataFetchError};

/// Problems with the stored session token.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no session token stored")]
    NotAuthenticated,
    #[error("stored session token is malformed")]
    Malformed,
    #[error("session store failed: {0:#}")]
    Store(anyhow::Error),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    DataFetch(#[from] DataFetchError),
}

impl PipelineError {
    /// Whether the caller has to sign in again before retrying.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::Session(SessionError::NotAuthenticated | SessionError::Malformed)
        )
    }

    /// Notice suitable for the end user. Query failures are reported
    /// generically so service internals never reach the screen.
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(err) => format!("Error: {err}"),
            Self::Session(SessionError::NotAuthenticated) => {
                "Access denied. Please log in.".to_owned()
            }
            Self::Session(SessionError::Malformed) => {
                "Session expired. Please log in again.".to_owned()
            }
            Self::Session(SessionError::Store(_)) => {
                "Could not access the saved session.".to_owned()
            }
            Self::DataFetch(_) => "Failed to load user details.".to_owned(),
        }
    }
}
