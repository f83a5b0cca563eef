pub mod auth;
pub mod config;
pub mod error;
pub mod model;
pub mod query;

pub use auth::{AuthClient, CredentialExchange};
pub use config::ApiConfig;
pub use error::{AuthError, DataFetchError, GraphQlError};
pub use model::{
    ProgressRecord, RawQueryResult, ResultKind, ResultRecord, TransactionRecord, UserProfile,
};
pub use query::{QueryClient, USER_DATA_QUERY, UserDataQuery};
pub use reqwest::StatusCode;
