//! On-disk JSON snapshot of the store.

use std::path::{Path, PathBuf};

use super::StoreError;
use super::records::StoreData;

/// Reads and writes the snapshot file.
#[derive(Debug, Clone)]
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the snapshot. A missing file is an empty store.
    pub async fn load(&self) -> Result<StoreData, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreData::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the snapshot.
    ///
    /// Writes to a sibling temp file and renames it over the target, so a
    /// crash mid-write leaves the previous snapshot intact. Creates parent
    /// directories if they don't exist.
    pub async fn save(&self, data: &StoreData) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(data)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_file_is_empty() {
        let snapshot = Snapshot::new("/nonexistent/path/store.json");
        let data = snapshot.load().await.unwrap();
        assert!(data.users.is_empty());
        assert_eq!(data.next_id, 0);
    }

    #[tokio::test]
    async fn save_and_load() {
        let dir = tempdir().unwrap();
        let snapshot = Snapshot::new(dir.path().join("nested").join("store.json"));

        let mut data = StoreData::default();
        let id = data.mint_id("usr");
        assert_eq!(id, "usr-1");
        snapshot.save(&data).await.unwrap();

        let loaded = snapshot.load().await.unwrap();
        assert_eq!(loaded.next_id, 1);
        assert!(!dir.path().join("nested").join("store.json.tmp").exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = Snapshot::new(&path).load().await;
        assert!(matches!(result, Err(StoreError::Serde(_))));
    }
}
