//! services/api/src/adapters/memory.rs
//!
//! An in-memory implementation of the `ProfileSource` port, used for local runs
//! without a database and in the handler tests.

use crate::error::ApiError;
use async_trait::async_trait;
use std::path::Path;
use swipe_feed_core::domain::{RawProfileRecord, Role};
use swipe_feed_core::ports::{PortResult, ProfileSource};

/// Holds profiles in creation order, the same order the database adapter uses.
#[derive(Clone, Debug, Default)]
pub struct InMemoryProfileSource {
    records: Vec<RawProfileRecord>,
}

impl InMemoryProfileSource {
    pub fn new(mut records: Vec<RawProfileRecord>) -> Self {
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Self { records }
    }

    /// Loads profiles from a JSON array of records.
    pub fn from_json_file(path: &Path) -> Result<Self, ApiError> {
        let raw = std::fs::read_to_string(path)?;
        let records: Vec<RawProfileRecord> = serde_json::from_str(&raw)?;
        Ok(Self::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ProfileSource for InMemoryProfileSource {
    async fn query(
        &self,
        role: Role,
        exclude_id: &str,
        offset: usize,
        limit: usize,
    ) -> PortResult<Vec<RawProfileRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.role.as_deref() == Some(role.as_str()) && r.user_id != exclude_id)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}
