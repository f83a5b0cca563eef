use std::fmt;

use tokio::sync::Mutex;
use tracing::{info, warn};
use xplens_api::{
    ApiConfig, AuthClient, AuthError, CredentialExchange, DataFetchError, QueryClient,
    UserDataQuery,
};
use xplens_session::SessionTokenStore;
use xplens_utils::token;

use crate::aggregate::{AggregatedDataset, aggregate};
use crate::error::{PipelineError, SessionError};

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub type DefaultPipeline = Pipeline<AuthClient, QueryClient>;

/// Sign in, keep the session token, fetch records and aggregate them.
///
/// Every step runs sequentially. The session lock keeps two sign-ins from
/// interleaving their exchange and save, so a slow stale exchange cannot
/// overwrite a newer token.
#[derive(Debug)]
pub struct Pipeline<A, Q> {
    auth: A,
    query: Q,
    store: SessionTokenStore,
    session_lock: Mutex<()>,
}

impl DefaultPipeline {
    pub fn from_config(config: &ApiConfig, store: SessionTokenStore) -> anyhow::Result<Self> {
        let http = config.http_client()?;
        Ok(Self::new(
            AuthClient::new(http.clone(), config.auth_url.clone()),
            QueryClient::new(http, config.graphql_url.clone()),
            store,
        ))
    }
}

impl<A, Q> Pipeline<A, Q>
where
    A: CredentialExchange,
    Q: UserDataQuery,
{
    pub fn new(auth: A, query: Q, store: SessionTokenStore) -> Self {
        Self {
            auth,
            query,
            store,
            session_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &SessionTokenStore {
        &self.store
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Exchange credentials and persist the resulting token.
    pub async fn login(&self, credentials: &Credentials) -> Result<String, PipelineError> {
        let _guard = self.session_lock.lock().await;

        let exchanged = self
            .auth
            .exchange(&credentials.username, &credentials.password)
            .await;

        let raw = match exchanged {
            Ok(raw) if token::is_valid(&raw) => raw,
            Ok(_) | Err(AuthError::MalformedToken) => {
                warn!("credential exchange returned a malformed token; clearing stored session");
                self.store.clear().await.map_err(SessionError::Store)?;
                return Err(AuthError::MalformedToken.into());
            }
            Err(err) => return Err(err.into()),
        };

        let session = token::normalize(&raw).to_owned();
        self.store.save(&session).await.map_err(SessionError::Store)?;
        info!(
            username = credentials.username.trim(),
            backend = self.store.backend_name(),
            "signed in"
        );

        Ok(session)
    }

    /// Reuse the stored token. A malformed token is cleared so the next
    /// attempt starts from a clean slot.
    pub async fn resume(&self) -> Result<String, SessionError> {
        let _guard = self.session_lock.lock().await;

        let Some(stored) = self.store.load().await.map_err(SessionError::Store)? else {
            return Err(SessionError::NotAuthenticated);
        };

        if !token::is_valid(&stored) {
            warn!(token = %token::redact(&stored), "malformed session token; clearing it");
            self.store.clear().await.map_err(SessionError::Store)?;
            return Err(SessionError::Malformed);
        }

        Ok(stored)
    }

    pub async fn logout(&self) -> Result<(), SessionError> {
        let _guard = self.session_lock.lock().await;

        self.store.clear().await.map_err(SessionError::Store)?;
        info!("signed out");
        Ok(())
    }

    /// Query with an already validated token and aggregate the answer.
    pub async fn load_dataset(&self, session: &str) -> Result<AggregatedDataset, DataFetchError> {
        let raw = self.query.fetch_user_data(session).await?;
        let user = raw.user.ok_or(DataFetchError::MissingUser)?;
        let xp_distribution = aggregate(&raw.results);

        info!(
            transactions = raw.transactions.len(),
            results = raw.results.len(),
            progress = raw.progress.len(),
            "user data loaded"
        );

        Ok(AggregatedDataset {
            user,
            transactions: raw.transactions,
            xp_distribution,
        })
    }

    /// Fresh sign-in followed by the data load.
    pub async fn run(&self, credentials: &Credentials) -> Result<AggregatedDataset, PipelineError> {
        let session = self.login(credentials).await?;
        self.fetch(&session).await
    }

    /// Data load using the stored session, as on a later visit.
    pub async fn run_stored(&self) -> Result<AggregatedDataset, PipelineError> {
        let session = self.resume().await?;
        self.fetch(&session).await
    }

    async fn fetch(&self, session: &str) -> Result<AggregatedDataset, PipelineError> {
        self.load_dataset(session).await.map_err(|err| {
            warn!(error = %err, "could not load user data");
            PipelineError::DataFetch(err)
        })
    }
}
