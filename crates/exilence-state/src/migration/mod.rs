//! Versioned migrations of persisted store payloads.
//!
//! A [`MigrationPlan`] is an ordered set of [`MigrationStep`]s, each owning a
//! distinct version number. The [`MigrationRunner`] applies the steps whose
//! versions fall in `(from, to]`, strictly in order, and records progress in
//! the `migration` record after every completed step:
//!
//! ```text
//! current=0 --step 1--> record {current: 1} --step 2--> record {current: 2} ...
//! ```
//!
//! A failing step stops the run. The record then still names the last
//! completed version, so the next launch resumes with the failed step.
//! Steps must therefore tolerate being re-run after a crash between their
//! own completion and the record write.

pub mod steps;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{MigrationError, StepError};
use crate::persist::PersistentStoreAdapter;
use crate::signal::Signal;
use crate::store::StoreName;
use crate::stores::MigrationState;

/// One versioned transformation of persisted data.
#[async_trait]
pub trait MigrationStep: Send + Sync {
    /// Version this step brings storage to. Must be greater than zero.
    fn version(&self) -> u32;

    /// Short human-readable summary, used in logs and reports.
    fn description(&self) -> &str;

    /// Applies the step against raw storage records.
    async fn apply(&self, storage: &PersistentStoreAdapter) -> Result<(), StepError>;
}

/// Ordered, duplicate-free collection of migration steps.
#[derive(Default)]
pub struct MigrationPlan {
    steps: Vec<Box<dyn MigrationStep>>,
}

impl MigrationPlan {
    /// Builds a plan, sorting steps by version.
    pub fn new(mut steps: Vec<Box<dyn MigrationStep>>) -> Result<Self, MigrationError> {
        steps.sort_by_key(|step| step.version());
        if steps.first().is_some_and(|step| step.version() == 0) {
            return Err(MigrationError::ZeroVersion);
        }
        if let Some(pair) = steps.windows(2).find(|pair| pair[0].version() == pair[1].version()) {
            return Err(MigrationError::DuplicateStep {
                version: pair[0].version(),
            });
        }
        Ok(MigrationPlan { steps })
    }

    /// The plan shipped with this build.
    pub fn standard() -> Self {
        MigrationPlan {
            steps: vec![Box::new(steps::Baseline)],
        }
    }

    /// Highest step version, or 0 for an empty plan.
    pub fn latest(&self) -> u32 {
        self.steps.last().map_or(0, |step| step.version())
    }

    /// Steps with versions in `(from, to]`, ascending.
    pub fn pending(&self, from: u32, to: u32) -> impl Iterator<Item = &dyn MigrationStep> {
        self.steps
            .iter()
            .filter(move |step| step.version() > from && step.version() <= to)
            .map(|step| -> &dyn MigrationStep { step.as_ref() })
    }

    /// `(version, description)` for every step.
    pub fn describe(&self) -> Vec<(u32, &str)> {
        self.steps
            .iter()
            .map(|step| (step.version(), step.description()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl std::fmt::Debug for MigrationPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.describe()).finish()
    }
}

/// Progress events published while a run is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationProgress {
    Started { from: u32, to: u32 },
    StepApplied { version: u32 },
    Completed { version: u32 },
    /// `completed` is the version left in the record.
    Failed { version: u32, completed: u32 },
}

/// Applies a [`MigrationPlan`] to storage.
pub struct MigrationRunner {
    storage: PersistentStoreAdapter,
    plan: Arc<MigrationPlan>,
    progress: Signal<MigrationProgress>,
}

impl MigrationRunner {
    pub fn new(storage: PersistentStoreAdapter, plan: Arc<MigrationPlan>) -> Self {
        MigrationRunner {
            storage,
            plan,
            progress: Signal::new(),
        }
    }

    /// Publishes progress through `progress` instead of a private signal.
    pub fn with_progress(mut self, progress: Signal<MigrationProgress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn progress(&self) -> &Signal<MigrationProgress> {
        &self.progress
    }

    /// Migrates storage from version `from` to version `to`.
    ///
    /// Resolves with the version now recorded. When `from >= to` nothing is
    /// applied or written and `from` is returned unchanged.
    pub async fn run(&self, from: u32, to: u32) -> Result<u32, MigrationError> {
        if from >= to {
            tracing::debug!(from, to, "no pending migrations");
            return Ok(from);
        }

        tracing::info!(from, to, "running migrations");
        self.progress.emit(&MigrationProgress::Started { from, to });

        let mut current = from;
        for step in self.plan.pending(from, to) {
            let version = step.version();
            tracing::info!(version, description = step.description(), "applying migration step");

            if let Err(source) = step.apply(&self.storage).await {
                tracing::warn!(version, completed = current, error = %source, "migration step failed");
                self.progress.emit(&MigrationProgress::Failed {
                    version,
                    completed: current,
                });
                return Err(MigrationError::Step {
                    version,
                    description: step.description().to_string(),
                    source,
                });
            }

            self.record(version, to).await?;
            current = version;
            self.progress.emit(&MigrationProgress::StepApplied { version });
        }

        if current < to {
            // Versions without a registered step still advance the record.
            self.record(to, to).await?;
            current = to;
        }

        tracing::info!(version = current, "migrations complete");
        self.progress.emit(&MigrationProgress::Completed { version: current });
        Ok(current)
    }

    async fn record(&self, current: u32, latest: u32) -> Result<(), MigrationError> {
        let payload = serde_json::to_string(&MigrationState { current, latest })?;
        self.storage
            .save(StoreName::Migration.key(), &payload)
            .await
            .map_err(|source| MigrationError::Record {
                version: current,
                source,
            })?;
        Ok(())
    }
}
