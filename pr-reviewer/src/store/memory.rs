use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ReviewRecord, ReviewStore, newest_first};
use crate::errors::StoreError;

/// Process-local review store.
#[derive(Debug, Default)]
pub struct InMemoryReviewStore {
    records: RwLock<Vec<ReviewRecord>>,
}

impl InMemoryReviewStore {
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn insert(&self, record: ReviewRecord) -> Result<(), StoreError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<ReviewRecord>, StoreError> {
        Ok(newest_first(&self.records.read().await))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::split_ai_response;

    #[tokio::test]
    async fn insert_list_delete() {
        let store = InMemoryReviewStore::default();
        let first = ReviewRecord::new("a", split_ai_response("ra"));
        let second = ReviewRecord::new("b", split_ai_response("rb"));
        let first_id = first.id;

        store.insert(first).await.unwrap();
        store.insert(second).await.unwrap();
        assert_eq!(store.len().await, 2);
        assert_eq!(store.list_newest_first().await.unwrap()[0].code, "b");

        assert!(store.delete(first_id).await.unwrap());
        assert!(!store.delete(first_id).await.unwrap());
        assert_eq!(store.len().await, 1);
    }
}
