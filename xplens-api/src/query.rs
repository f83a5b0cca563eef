use std::future::Future;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{DataFetchError, GraphQlError};
use crate::model::{ProgressRecord, RawQueryResult, ResultRecord, TransactionRecord, UserProfile};

/// Single round trip for everything the profile needs.
pub const USER_DATA_QUERY: &str = "query {
  user { firstName lastName email auditRatio totalUp totalDown }
  transaction { amount createdAt type }
  result { grade objectId type }
  progress { grade objectId }
}";

/// Authenticated read of the user's records.
pub trait UserDataQuery {
    fn fetch_user_data(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<RawQueryResult, DataFetchError>> + Send;
}

#[derive(Clone, Debug)]
pub struct QueryClient {
    http: reqwest::Client,
    url: String,
}

impl QueryClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Self> {
        Ok(Self::new(config.http_client()?, config.graphql_url.clone()))
    }
}

impl UserDataQuery for QueryClient {
    async fn fetch_user_data(&self, token: &str) -> Result<RawQueryResult, DataFetchError> {
        debug!(url = %self.url, "querying user data");

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .json(&json!({ "query": USER_DATA_QUERY }))
            .send()
            .await
            .map_err(DataFetchError::from_transport)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(DataFetchError::from_transport)?;

        parse_query_response(status, &body).inspect_err(|err| {
            debug!(%status, error = %err, "user data query failed");
        })
    }
}

#[derive(Debug, Deserialize)]
struct QueryEnvelope {
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(default)]
    user: Option<Vec<UserProfile>>,
    #[serde(default)]
    transaction: Option<Vec<TransactionRecord>>,
    #[serde(default)]
    result: Option<Vec<ResultRecord>>,
    #[serde(default)]
    progress: Option<Vec<ProgressRecord>>,
}

/// Decode the query service's answer.
///
/// A non-empty `errors` array wins over everything else, including a
/// non-success status, since it carries the more specific reason.
pub fn parse_query_response(
    status: StatusCode,
    body: &str,
) -> Result<RawQueryResult, DataFetchError> {
    let envelope = serde_json::from_str::<QueryEnvelope>(body);

    let reported = envelope
        .as_ref()
        .ok()
        .and_then(|envelope| envelope.errors.as_ref())
        .filter(|errors| !errors.is_empty());
    if let Some(errors) = reported {
        return Err(DataFetchError::GraphQl(errors.clone()));
    }

    if !status.is_success() {
        return Err(DataFetchError::Status { status });
    }

    let data = envelope
        .map_err(DataFetchError::Decode)?
        .data
        .ok_or(DataFetchError::MissingData)?;

    Ok(RawQueryResult {
        user: data.user.and_then(|users| users.into_iter().next()),
        transactions: data.transaction.unwrap_or_default(),
        results: data.result.unwrap_or_default(),
        progress: data.progress.unwrap_or_default(),
    })
}
