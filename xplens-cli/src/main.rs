mod cli;
mod commands;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;

use xplens_api::ApiConfig;
use xplens_core::DefaultPipeline;
use xplens_session::{DEFAULT_KEY_PREFIX, SessionTokenStore};

use crate::cli::Cli;

const DEFAULT_SESSION_FILE: &str = ".xplens/token";

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load the .env file
    dotenvy::dotenv().ok();

    let max_level = if env_bool("XPLENS_DEBUG", false) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter_fn(move |metadata| {
            let within_level = *metadata.level() <= max_level;
            if !within_level {
                return false;
            }

            // reqwest and its connection pool are noisy at debug level
            !(metadata.target().starts_with("hyper") || metadata.target().starts_with("reqwest"))
        }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    let cli = Cli::parse();

    let store = session_store_from_env().await;
    let config = ApiConfig::from_env();
    info!(
        auth_url = %config.auth_url,
        graphql_url = %config.graphql_url,
        timeout_seconds = config.timeout.as_secs(),
        "API endpoints configured."
    );

    let pipeline = DefaultPipeline::from_config(&config, store)?;

    match commands::dispatch(&pipeline, cli.command, cli.json).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("{}", err.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn session_store_from_env() -> SessionTokenStore {
    let backend = env::var("XPLENS_SESSION_BACKEND")
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_else(|_| "file".to_owned());

    match backend.as_str() {
        "memory" => {
            info!("Session store is in-memory; tokens will not outlive this process.");
            SessionTokenStore::memory()
        }
        "redis" => redis_store_or_memory().await,
        other => {
            if other != "file" {
                warn!(backend = other, "Unknown XPLENS_SESSION_BACKEND; using the file store.");
            }
            let path = env::var("XPLENS_SESSION_FILE")
                .ok()
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
            info!(path = %path.display(), "Session store is file-backed.");
            SessionTokenStore::file(path)
        }
    }
}

async fn redis_store_or_memory() -> SessionTokenStore {
    let key_prefix =
        env::var("XPLENS_SESSION_KEY_PREFIX").unwrap_or_else(|_| DEFAULT_KEY_PREFIX.to_owned());

    let store = match env::var("REDIS_URL") {
        Ok(redis_url) => match SessionTokenStore::redis(&redis_url, key_prefix.clone()) {
            Ok(store) => store,
            Err(err) => {
                warn!(?err, key_prefix = %key_prefix, "Failed to initialize Redis session store; continuing in-memory.");
                return SessionTokenStore::memory();
            }
        },
        Err(_) => {
            warn!(key_prefix = %key_prefix, "XPLENS_SESSION_BACKEND=redis but REDIS_URL is missing; continuing in-memory.");
            return SessionTokenStore::memory();
        }
    };

    if let Err(err) = store.ping().await {
        warn!(
            ?err,
            "Redis ping failed; session operations will report errors until it recovers."
        );
    } else {
        info!(key = %store.key(), "Redis session store health check passed.");
    }

    store
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}
