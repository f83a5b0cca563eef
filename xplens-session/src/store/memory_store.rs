use std::sync::Arc;

use tokio::sync::Mutex;

/// Process-local slot. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub async fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.slot.lock().await.clone())
    }

    pub async fn set(&self, _key: &str, value: &str) -> anyhow::Result<()> {
        *self.slot.lock().await = Some(value.to_owned());
        Ok(())
    }

    pub async fn del(&self, _key: &str) -> anyhow::Result<()> {
        self.slot.lock().await.take();
        Ok(())
    }
}
