//! Shared helpers for the feed integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use swipe_feed_core::{
    FeedConfig, FeedController, FeedStore, PortError, PortResult, ProfileSource,
    RawProfileRecord, Role,
};
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCall {
    pub role: Role,
    pub exclude_id: String,
    pub offset: usize,
    pub limit: usize,
}

/// An in-memory profile source that records every query it receives.
#[derive(Default)]
pub struct ScriptedSource {
    records: Mutex<Vec<RawProfileRecord>>,
    calls: Mutex<Vec<QueryCall>>,
    failing: AtomicBool,
    /// Return every record regardless of role or exclusion.
    unfiltered: bool,
    /// When set, the next query parks until the gate is notified.
    gate: Mutex<Option<Arc<Notify>>>,
    pub started: Notify,
}

impl ScriptedSource {
    pub fn new(records: Vec<RawProfileRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    pub fn unfiltered(records: Vec<RawProfileRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            unfiltered: true,
            ..Default::default()
        }
    }

    /// Parks the next query until the returned handle is notified.
    pub fn hold_next(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<QueryCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileSource for ScriptedSource {
    async fn query(
        &self,
        role: Role,
        exclude_id: &str,
        offset: usize,
        limit: usize,
    ) -> PortResult<Vec<RawProfileRecord>> {
        self.calls.lock().unwrap().push(QueryCall {
            role,
            exclude_id: exclude_id.to_string(),
            offset,
            limit,
        });

        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            self.started.notify_one();
            gate.notified().await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("connection reset".to_string()));
        }

        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| {
                self.unfiltered
                    || (r.role.as_deref() == Some(role.as_str()) && r.user_id != exclude_id)
            })
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

pub fn employer(id: &str, company: Option<&str>) -> RawProfileRecord {
    RawProfileRecord {
        user_id: id.to_string(),
        role: Some("employer".to_string()),
        company_name: company.map(str::to_string),
        company_description: Some(format!("About {}", id)),
        ..Default::default()
    }
}

pub fn job_seeker(id: &str) -> RawProfileRecord {
    RawProfileRecord {
        user_id: id.to_string(),
        role: Some("job_seeker".to_string()),
        full_name: Some(format!("Seeker {}", id)),
        qualification: Some("MSc".to_string()),
        ..Default::default()
    }
}

pub fn employers(count: usize) -> Vec<RawProfileRecord> {
    (0..count)
        .map(|i| employer(&format!("emp-{}", i), Some(&format!("Company {}", i))))
        .collect()
}

pub fn job_seekers(count: usize) -> Vec<RawProfileRecord> {
    (0..count).map(|i| job_seeker(&format!("seek-{}", i))).collect()
}

pub fn controller(source: Arc<ScriptedSource>) -> Arc<FeedController> {
    controller_with_store(source, FeedStore::new())
}

pub fn controller_with_store(source: Arc<ScriptedSource>, store: FeedStore) -> Arc<FeedController> {
    Arc::new(FeedController::new(
        Arc::new(tokio::sync::Mutex::new(store)),
        source,
        FeedConfig::default(),
    ))
}
