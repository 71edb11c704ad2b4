use crate::backend::SnapshotBackend;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::trace;
use warren_core::error::{Result, StoreError};

/// Stores the snapshot as a single JSON file.
///
/// Writes go to a sibling `.tmp` file which is then renamed over the target,
/// so an interrupted write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotBackend for JsonFileBackend {
    async fn load(&self) -> Result<Option<String>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| StoreError::CorruptPersistedState {
                path: self.location(),
                reason: format!("file is not valid utf-8: {e}"),
            })
    }

    async fn save(&self, snapshot: String) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, snapshot.as_bytes()).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        trace!(path = %self.path.display(), bytes = snapshot.len(), "wrote snapshot file");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
