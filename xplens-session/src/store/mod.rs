mod file_store;
mod memory_store;
mod redis_store;

use std::path::PathBuf;

use tracing::debug;
use xplens_utils::token;

use file_store::FileTokenStore;
use memory_store::MemoryTokenStore;
use redis_store::RedisTokenStore;

pub const DEFAULT_KEY_PREFIX: &str = "xplens";
/// Name of the single slot holding the session token.
pub const TOKEN_SLOT: &str = "token";

#[derive(Clone, Debug)]
enum StoreBackend {
    Memory(MemoryTokenStore),
    File(FileTokenStore),
    Redis(RedisTokenStore),
}

/// Single-slot persisted store for the session token.
///
/// Values are normalized on the way in and on the way out, so callers
/// always see the stripped form regardless of what the backend holds.
#[derive(Clone, Debug)]
pub struct SessionTokenStore {
    key_prefix: String,
    backend: StoreBackend,
}

impl SessionTokenStore {
    pub fn memory() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_owned(),
            backend: StoreBackend::Memory(MemoryTokenStore::default()),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_owned(),
            backend: StoreBackend::File(FileTokenStore::new(path)),
        }
    }

    pub fn redis(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            key_prefix: prefix.into(),
            backend: StoreBackend::Redis(RedisTokenStore::from_url(redis_url)?),
        })
    }

    pub fn key(&self) -> String {
        format!("{}:{}", self.key_prefix, TOKEN_SLOT)
    }

    pub fn backend_name(&self) -> &'static str {
        match &self.backend {
            StoreBackend::Memory(_) => "memory",
            StoreBackend::File(_) => "file",
            StoreBackend::Redis(_) => "redis",
        }
    }

    pub fn is_redis_enabled(&self) -> bool {
        matches!(self.backend, StoreBackend::Redis(_))
    }

    /// Health check; only the redis backend can fail it.
    pub async fn ping(&self) -> anyhow::Result<()> {
        match &self.backend {
            StoreBackend::Redis(store) => store.ping().await,
            StoreBackend::Memory(_) | StoreBackend::File(_) => Ok(()),
        }
    }

    /// Normalize and persist, overwriting any previous token.
    pub async fn save(&self, raw: &str) -> anyhow::Result<()> {
        let key = self.key();
        let value = token::normalize(raw);

        match &self.backend {
            StoreBackend::Memory(store) => store.set(&key, value).await,
            StoreBackend::File(store) => store.set(&key, value).await,
            StoreBackend::Redis(store) => store.set(&key, value).await,
        }?;

        debug!(
            backend = self.backend_name(),
            token = %token::redact(value),
            "session token saved"
        );
        Ok(())
    }

    /// Stored token in normalized form; `None` when the slot is empty.
    pub async fn load(&self) -> anyhow::Result<Option<String>> {
        let key = self.key();
        let value = match &self.backend {
            StoreBackend::Memory(store) => store.get(&key).await,
            StoreBackend::File(store) => store.get(&key).await,
            StoreBackend::Redis(store) => store.get(&key).await,
        }?;

        Ok(value
            .as_deref()
            .map(token::normalize)
            .filter(|value| !value.is_empty())
            .map(str::to_owned))
    }

    pub async fn clear(&self) -> anyhow::Result<()> {
        let key = self.key();

        match &self.backend {
            StoreBackend::Memory(store) => store.del(&key).await,
            StoreBackend::File(store) => store.del(&key).await,
            StoreBackend::Redis(store) => store.del(&key).await,
        }?;

        debug!(backend = self.backend_name(), "session token cleared");
        Ok(())
    }
}
