//! Shared fixtures for exilence-state integration tests.
//!
//! [`ScriptedStore`] wraps an in-memory backend, logs every call as
//! `"load:<name>"` / `"save:<name>"` / `"delete:<name>"`, and fails loads for
//! chosen names. [`ProbeStep`] is a migration step that logs `"step:<n>"`
//! into the same log, so tests can assert relative ordering.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use exilence_state::error::StepError;
use exilence_state::{MigrationPlan, MigrationStep, PersistentStoreAdapter};
use exilence_storage::{
    InMemoryStore, RecordStore, RecordSummary, SaveOutcome, StorageError, StoredRecord,
};

pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub struct ScriptedStore {
    inner: InMemoryStore,
    log: CallLog,
    failing_loads: HashSet<String>,
}

impl ScriptedStore {
    pub fn new(records: &[(&str, &str)], log: &CallLog) -> Self {
        ScriptedStore {
            inner: InMemoryStore::with_records(records.iter().copied()),
            log: Arc::clone(log),
            failing_loads: HashSet::new(),
        }
    }

    pub fn failing_load(mut self, name: &str) -> Self {
        self.failing_loads.insert(name.to_string());
        self
    }

    pub fn into_adapter(self) -> PersistentStoreAdapter {
        PersistentStoreAdapter::new(self)
    }

    fn push(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

impl RecordStore for ScriptedStore {
    fn load(&self, name: &str) -> Result<Option<StoredRecord>, StorageError> {
        self.push(format!("load:{name}"));
        if self.failing_loads.contains(name) {
            return Err(StorageError::IntegrityError {
                reason: format!("scripted read failure for {name}"),
            });
        }
        self.inner.load(name)
    }

    fn save(&mut self, name: &str, payload: &str) -> Result<SaveOutcome, StorageError> {
        self.push(format!("save:{name}"));
        self.inner.save(name, payload)
    }

    fn delete(&mut self, name: &str) -> Result<bool, StorageError> {
        self.push(format!("delete:{name}"));
        self.inner.delete(name)
    }

    fn list(&self) -> Result<Vec<RecordSummary>, StorageError> {
        self.inner.list()
    }
}

pub struct ProbeStep {
    pub version: u32,
    pub log: CallLog,
    pub fail: bool,
}

#[async_trait]
impl MigrationStep for ProbeStep {
    fn version(&self) -> u32 {
        self.version
    }

    fn description(&self) -> &str {
        "probe"
    }

    async fn apply(&self, _storage: &PersistentStoreAdapter) -> Result<(), StepError> {
        self.log.lock().unwrap().push(format!("step:{}", self.version));
        if self.fail {
            return Err(format!("probe step {} failed", self.version).into());
        }
        Ok(())
    }
}

/// A plan of probe steps `1..=latest`, with `failing` raising an error.
pub fn probe_plan(latest: u32, failing: Option<u32>, log: &CallLog) -> MigrationPlan {
    let steps = (1..=latest)
        .map(|version| {
            Box::new(ProbeStep {
                version,
                log: Arc::clone(log),
                fail: failing == Some(version),
            }) as Box<dyn MigrationStep>
        })
        .collect();
    MigrationPlan::new(steps).unwrap()
}

/// Index of the first log entry matching `pred`.
pub fn first_index(log: &CallLog, pred: impl Fn(&str) -> bool) -> Option<usize> {
    log.lock().unwrap().iter().position(|entry| pred(entry))
}

/// Index of the last log entry matching `pred`.
pub fn last_index(log: &CallLog, pred: impl Fn(&str) -> bool) -> Option<usize> {
    log.lock().unwrap().iter().rposition(|entry| pred(entry))
}

/// True for loads of the five stores hydrated after migrations.
pub fn is_store_load(entry: &str) -> bool {
    matches!(
        entry,
        "load:account" | "load:customPrice" | "load:uiState" | "load:league" | "load:setting"
    )
}

pub fn entries(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}
