#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use xplens_api::auth::parse_exchange_response;
use xplens_api::query::parse_query_response;
use xplens_api::{
    AuthError, CredentialExchange, DataFetchError, RawQueryResult, StatusCode, UserDataQuery,
};
use xplens_core::Pipeline;
use xplens_session::SessionTokenStore;

pub const OK_BODY: &str = r#"{
    "data": {
        "user": [{
            "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com",
            "auditRatio": 1.25, "totalUp": 52000, "totalDown": 41600
        }],
        "transaction": [
            {"amount": 5000, "createdAt": "2024-03-01T09:00:00Z", "type": "xp"},
            {"amount": 1200, "createdAt": "2024-03-04T17:30:00Z", "type": "xp"},
            {"amount": 800, "createdAt": "2024-02-20T11:15:00Z", "type": "up"}
        ],
        "result": [
            {"grade": 10, "objectId": 100, "type": "tester"},
            {"grade": 5, "objectId": 101, "type": "user_audit"},
            {"grade": 3, "objectId": 102, "type": "quest"},
            {"grade": 99, "objectId": 103, "type": "other"}
        ],
        "progress": [{"grade": 1, "objectId": 100}]
    }
}"#;

pub const ERRORS_BODY: &str =
    r#"{"errors": [{"message": "field 'secret' not found in type: 'user'"}]}"#;

/// Answers every exchange with a canned HTTP status and body, decoded the
/// same way the real client decodes them.
pub struct FakeExchange {
    status: StatusCode,
    body: String,
    pub calls: AtomicUsize,
}

impl FakeExchange {
    pub fn ok(body: &str) -> Self {
        Self::answering(StatusCode::OK, body)
    }

    pub fn answering(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_owned(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl CredentialExchange for FakeExchange {
    async fn exchange(&self, _username: &str, _password: &str) -> Result<String, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        parse_exchange_response(self.status, &self.body)
    }
}

/// Hands back whatever string it holds without any checks.
pub struct UncheckedExchange(pub &'static str);

impl CredentialExchange for UncheckedExchange {
    async fn exchange(&self, _username: &str, _password: &str) -> Result<String, AuthError> {
        Ok(self.0.to_owned())
    }
}

pub struct FakeQuery {
    status: StatusCode,
    body: String,
    pub seen_tokens: Mutex<Vec<String>>,
}

impl FakeQuery {
    pub fn ok(body: &str) -> Self {
        Self::answering(StatusCode::OK, body)
    }

    pub fn answering(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_owned(),
            seen_tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen_tokens.lock().unwrap().clone()
    }
}

impl UserDataQuery for FakeQuery {
    async fn fetch_user_data(&self, token: &str) -> Result<RawQueryResult, DataFetchError> {
        self.seen_tokens.lock().unwrap().push(token.to_owned());
        parse_query_response(self.status, &self.body)
    }
}

pub fn pipeline<A, Q>(auth: A, query: Q) -> Pipeline<A, Q>
where
    A: CredentialExchange,
    Q: UserDataQuery,
{
    Pipeline::new(auth, query, SessionTokenStore::memory())
}
