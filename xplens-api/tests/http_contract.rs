use std::net::SocketAddr;
use std::time::Duration;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use xplens_api::{
    ApiConfig, AuthClient, AuthError, CredentialExchange, DataFetchError, QueryClient,
    USER_DATA_QUERY, UserDataQuery,
};

const SHORT_TIMEOUT: Duration = Duration::from_millis(200);

/// One HTTP/1.1 request as seen on the wire.
#[derive(Debug)]
struct Captured {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Accept a single connection, record the request, wait `delay`, answer.
async fn serve_once(
    status_line: &'static str,
    body: &'static str,
    delay: Duration,
) -> (SocketAddr, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let captured = read_request(&mut socket).await;

        tokio::time::sleep(delay).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;

        captured
    });

    (addr, handle)
}

async fn read_request(socket: &mut TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 4096];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos;
        }
        let read = socket.read(&mut chunk).await.unwrap();
        assert!(read > 0, "connection closed before headers were complete");
        buf.extend_from_slice(&chunk[..read]);
    };

    let head = String::from_utf8(buf[..head_end].to_vec()).unwrap();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap().split_whitespace();
    let method = request_line.next().unwrap().to_owned();
    let path = request_line.next().unwrap().to_owned();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_ascii_lowercase(), value.trim().to_owned()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(key, _)| key == "content-length")
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = head_end + 4;
    while buf.len() < body_start + content_length {
        let read = socket.read(&mut chunk).await.unwrap();
        assert!(read > 0, "connection closed before body was complete");
        buf.extend_from_slice(&chunk[..read]);
    }
    let body = String::from_utf8(buf[body_start..body_start + content_length].to_vec()).unwrap();

    Captured {
        method,
        path,
        headers,
        body,
    }
}

fn config_for(addr: SocketAddr, timeout: Duration) -> ApiConfig {
    ApiConfig {
        auth_url: format!("http://{addr}/api/auth/signin"),
        graphql_url: format!("http://{addr}/api/graphql-engine/v1/graphql"),
        timeout,
    }
}

// Same settings as `ApiConfig::http_client`, minus any proxy picked up
// from the environment so requests always reach the local listener.
fn http_client(config: &ApiConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(config.timeout)
        .build()
        .unwrap()
}

fn auth_client(config: &ApiConfig) -> AuthClient {
    AuthClient::new(http_client(config), config.auth_url.clone())
}

fn query_client(config: &ApiConfig) -> QueryClient {
    QueryClient::new(http_client(config), config.graphql_url.clone())
}

#[tokio::test]
async fn exchange_posts_basic_auth_credentials() {
    let (addr, server) = serve_once("200 OK", "\"abc.def.ghi\"", Duration::ZERO).await;
    let config = config_for(addr, Duration::from_secs(5));

    let token = auth_client(&config)
        .exchange(" ada ", "hunter2\n")
        .await
        .unwrap();
    let request = server.await.unwrap();

    assert_eq!(token, "abc.def.ghi");
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/auth/signin");
    // base64("ada:hunter2"), credentials are trimmed first
    assert_eq!(
        request.header("authorization"),
        Some("Basic YWRhOmh1bnRlcjI=")
    );
    assert_eq!(request.header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn exchange_rejection_carries_body_text() {
    let (addr, server) = serve_once(
        "401 Unauthorized",
        "User does not exist or password incorrect",
        Duration::ZERO,
    )
    .await;
    let config = config_for(addr, Duration::from_secs(5));

    let err = auth_client(&config)
        .exchange("ada", "wrong")
        .await
        .unwrap_err();
    server.await.unwrap();

    match err {
        AuthError::Rejected { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(body, "User does not exist or password incorrect");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn exchange_times_out() {
    let (addr, _server) = serve_once("200 OK", "abc.def.ghi", Duration::from_secs(3)).await;
    let config = config_for(addr, SHORT_TIMEOUT);

    let err = auth_client(&config)
        .exchange("ada", "hunter2")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn exchange_against_closed_port_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let config = config_for(addr, Duration::from_secs(5));

    let err = auth_client(&config)
        .exchange("ada", "hunter2")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn query_posts_bearer_token_and_query_body() {
    let (addr, server) = serve_once(
        "200 OK",
        r#"{"data": {"user": [{"firstName": "Ada", "totalUp": 10, "totalDown": 4}], "transaction": [], "result": [], "progress": []}}"#,
        Duration::ZERO,
    )
    .await;
    let config = config_for(addr, Duration::from_secs(5));

    let raw = query_client(&config)
        .fetch_user_data("abc.def.ghi")
        .await
        .unwrap();
    let request = server.await.unwrap();

    assert_eq!(raw.user.unwrap().first_name.as_deref(), Some("Ada"));
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/graphql-engine/v1/graphql");
    assert_eq!(request.header("authorization"), Some("Bearer abc.def.ghi"));
    assert_eq!(request.header("content-type"), Some("application/json"));

    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body, json!({ "query": USER_DATA_QUERY }));
}

#[tokio::test]
async fn query_times_out() {
    let (addr, _server) = serve_once("200 OK", "{}", Duration::from_secs(3)).await;
    let config = config_for(addr, SHORT_TIMEOUT);

    let err = query_client(&config)
        .fetch_user_data("abc.def.ghi")
        .await
        .unwrap_err();

    assert!(matches!(err, DataFetchError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn query_graphql_errors_over_the_wire() {
    let (addr, server) = serve_once(
        "200 OK",
        r#"{"errors": [{"message": "Could not verify JWT: JWTExpired"}]}"#,
        Duration::ZERO,
    )
    .await;
    let config = config_for(addr, Duration::from_secs(5));

    let err = query_client(&config)
        .fetch_user_data("abc.def.ghi")
        .await
        .unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, DataFetchError::GraphQl(ref errors) if errors.len() == 1));
}
