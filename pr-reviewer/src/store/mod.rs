//! Persistence of manual reviews.
//!
//! [`ReviewStore`] is the only thing the review flow knows about storage.
//! Two implementations ship with the crate:
//! - [`memory::InMemoryReviewStore`]: process-local, lost on restart
//! - [`json_file::JsonFileReviewStore`]: one JSON array file on disk

pub mod json_file;
pub mod memory;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::review::AiReviewResult;

pub use json_file::JsonFileReviewStore;
pub use memory::InMemoryReviewStore;

/// A persisted manual review. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub code: String,
    pub review: String,
    pub optimized_code: String,
    pub created_at: DateTime<Utc>,
}

impl ReviewRecord {
    pub fn new(code: impl Into<String>, result: AiReviewResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: code.into(),
            review: result.review_text,
            optimized_code: result.optimized_code,
            created_at: Utc::now(),
        }
    }
}

/// Storage for [`ReviewRecord`]s.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn insert(&self, record: ReviewRecord) -> Result<(), StoreError>;

    /// All records, newest `created_at` first; equal timestamps list the
    /// later insert first.
    async fn list_newest_first(&self) -> Result<Vec<ReviewRecord>, StoreError>;

    /// Removes a record; `Ok(false)` if the id was unknown.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// JSON file store when `path` is set, in-memory store otherwise.
pub fn store_for_path(path: Option<PathBuf>) -> Arc<dyn ReviewStore> {
    match path {
        Some(p) => Arc::new(JsonFileReviewStore::new(p)),
        None => Arc::new(InMemoryReviewStore::default()),
    }
}

/// Sorts records the way [`ReviewStore::list_newest_first`] returns them.
pub(crate) fn newest_first(records: &[ReviewRecord]) -> Vec<ReviewRecord> {
    let mut out: Vec<ReviewRecord> = records.iter().rev().cloned().collect();
    // Stable sort keeps the reversed insertion order among equal timestamps.
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn record(code: &str, hour: u32) -> ReviewRecord {
        ReviewRecord {
            id: Uuid::new_v4(),
            code: code.into(),
            review: "r".into(),
            optimized_code: "o".into(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn record_serialises_with_mongo_style_id_and_camel_case() {
        let r = record("print(1)", 3);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["_id"], serde_json::json!(r.id.to_string()));
        assert_eq!(v["optimizedCode"], "o");
        assert!(v.get("createdAt").is_some());
        assert!(v.get("id").is_none());
    }

    #[test]
    fn newest_first_orders_by_timestamp_then_reverse_insertion() {
        let a = record("a", 1);
        let b = record("b", 5);
        let c = record("c", 5);
        let d = record("d", 2);
        let codes: Vec<String> = newest_first(&[a, b, c, d])
            .into_iter()
            .map(|r| r.code)
            .collect();
        assert_eq!(codes, ["c", "b", "d", "a"]);
    }
}
