//! File-backed review store (one JSON array on disk).
//!
//! The file is read lazily on first access and rewritten in full on every
//! mutation: write to `<path>.tmp`, then rename over `<path>`. A single
//! mutex serialises all access. The in-memory copy only changes once the
//! file write succeeded.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::{ReviewRecord, ReviewStore, newest_first};
use crate::errors::StoreError;

#[derive(Debug)]
pub struct JsonFileReviewStore {
    path: PathBuf,
    cache: Mutex<Option<Vec<ReviewRecord>>>,
}

impl JsonFileReviewStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    async fn load(&self) -> Result<Vec<ReviewRecord>, StoreError> {
        if !fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }
        let data = fs::read(&self.path).await?;
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let records: Vec<ReviewRecord> = serde_json::from_slice(&data)?;
        debug!(path = %self.path.display(), count = records.len(), "review store loaded");
        Ok(records)
    }

    async fn persist(&self, records: &[ReviewRecord]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let json = serde_json::to_vec_pretty(records)?;
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ReviewStore for JsonFileReviewStore {
    async fn insert(&self, record: ReviewRecord) -> Result<(), StoreError> {
        let mut guard = self.cache.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        let records = guard.get_or_insert_with(Vec::new);
        records.push(record);
        if let Err(e) = self.persist(records).await {
            records.pop();
            return Err(e);
        }
        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<ReviewRecord>, StoreError> {
        let mut guard = self.cache.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        Ok(newest_first(guard.get_or_insert_with(Vec::new)))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut guard = self.cache.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        let records = guard.get_or_insert_with(Vec::new);
        let remaining: Vec<ReviewRecord> =
            records.iter().filter(|r| r.id != id).cloned().collect();
        if remaining.len() == records.len() {
            return Ok(false);
        }
        self.persist(&remaining).await?;
        *records = remaining;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::split_ai_response;

    #[tokio::test]
    async fn records_survive_a_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("reviews.json");

        let store = JsonFileReviewStore::new(&path);
        assert!(store.list_newest_first().await.unwrap().is_empty());

        let kept = ReviewRecord::new("print(1)", split_ai_response("ok\n### Optimized Code:\n```print(2)```"));
        let dropped = ReviewRecord::new("x", split_ai_response("meh"));
        let dropped_id = dropped.id;
        store.insert(kept.clone()).await.unwrap();
        store.insert(dropped).await.unwrap();
        assert!(store.delete(dropped_id).await.unwrap());
        assert!(!store.delete(Uuid::new_v4()).await.unwrap());

        let reopened = JsonFileReviewStore::new(&path);
        assert_eq!(reopened.list_newest_first().await.unwrap(), vec![kept]);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonFileReviewStore::new(&path);
        assert!(matches!(
            store.list_newest_first().await,
            Err(StoreError::Serde(_))
        ));
    }
}
