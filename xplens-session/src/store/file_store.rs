use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use tokio::fs;
use tokio::sync::Mutex;

/// Slot persisted as a single plain-text file.
///
/// Writes go to a sibling temp file and are renamed into place, so a reader
/// never observes a half-written token.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| {
                format!("failed to read session file `{}`", self.path.display())
            }),
        }
    }

    pub async fn set(&self, _key: &str, value: &str) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("failed to create session directory `{}`", parent.display())
            })?;
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, value.as_bytes())
            .await
            .with_context(|| format!("failed to write session file `{}`", tmp.display()))?;
        fs::rename(&tmp, &self.path).await.with_context(|| {
            format!("failed to move session file into `{}`", self.path.display())
        })?;

        Ok(())
    }

    pub async fn del(&self, _key: &str) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;

        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| {
                format!("failed to remove session file `{}`", self.path.display())
            }),
        }
    }
}
