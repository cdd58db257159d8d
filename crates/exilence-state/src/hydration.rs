//! Startup sequencing: hydrate, migrate, hydrate the rest, report.
//!
//! [`HydrationCoordinator::startup`] walks the phase machine
//!
//! ```text
//! Idle -> MigratingOrSkip -> Hydrating -> Ready
//!               |                |
//!               +------> Failed <+
//! ```
//!
//! The `migration` store is read first and alone. Pending migrations run to
//! completion before any other store is read, because a migration may rewrite
//! the records those stores parse. The remaining five stores are then read
//! and parsed concurrently into staging values; only when every one of them
//! succeeded are the values committed to the [`AppContext`]. A failed
//! startup therefore leaves every store at its default.

use std::sync::{Arc, Mutex, PoisonError};

use crate::context::AppContext;
use crate::error::{ErrorReport, StartupError};
use crate::migration::{MigrationPlan, MigrationProgress, MigrationRunner};
use crate::persist::PersistentStoreAdapter;
use crate::signal::Signal;
use crate::store::{NamedStore, StoreName, StoreState};
use crate::stores::{AccountState, CustomPriceState, LeagueState, MigrationState, SettingState, UiState};

/// Where startup currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupPhase {
    Idle,
    MigratingOrSkip,
    Hydrating,
    Ready,
    Failed,
}

impl StartupPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, StartupPhase::Ready | StartupPhase::Failed)
    }
}

/// What the application shell renders after startup.
#[derive(Debug)]
pub enum StartupOutcome {
    /// Every store is hydrated; render the normal views.
    Ready(Arc<AppContext>),
    /// Render the error view.
    Failed(ErrorReport),
}

impl StartupOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, StartupOutcome::Ready(_))
    }

    pub fn context(&self) -> Option<&Arc<AppContext>> {
        match self {
            StartupOutcome::Ready(context) => Some(context),
            StartupOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorReport> {
        match self {
            StartupOutcome::Ready(_) => None,
            StartupOutcome::Failed(report) => Some(report),
        }
    }
}

/// Drives one startup of one [`AppContext`].
///
/// A coordinator runs at most once; relaunching means building a new
/// context and coordinator.
pub struct HydrationCoordinator {
    context: Arc<AppContext>,
    plan: Arc<MigrationPlan>,
    phase: Mutex<StartupPhase>,
    phases: Signal<StartupPhase>,
    progress: Signal<MigrationProgress>,
}

impl HydrationCoordinator {
    pub fn new(context: Arc<AppContext>, plan: MigrationPlan) -> Self {
        HydrationCoordinator {
            context,
            plan: Arc::new(plan),
            phase: Mutex::new(StartupPhase::Idle),
            phases: Signal::new(),
            progress: Signal::new(),
        }
    }

    /// Builds a fresh context over `storage` and a coordinator for it.
    pub fn for_storage(storage: PersistentStoreAdapter, plan: MigrationPlan) -> Self {
        Self::new(Arc::new(AppContext::new(storage)), plan)
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.context
    }

    pub fn plan(&self) -> &MigrationPlan {
        &self.plan
    }

    pub fn phase(&self) -> StartupPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Phase transitions, emitted as they happen.
    pub fn phases(&self) -> &Signal<StartupPhase> {
        &self.phases
    }

    /// Progress of the migration run, if one happens.
    pub fn migration_progress(&self) -> &Signal<MigrationProgress> {
        &self.progress
    }

    /// Runs the startup sequence to a terminal phase.
    pub async fn startup(&self) -> StartupOutcome {
        if !self.claim() {
            let error = StartupError::Unknown("startup already ran on this coordinator".to_string());
            return StartupOutcome::Failed(ErrorReport::from(&error));
        }
        self.announce(StartupPhase::MigratingOrSkip);

        match self.run().await {
            Ok(()) => {
                self.transition(StartupPhase::Ready);
                StartupOutcome::Ready(Arc::clone(&self.context))
            }
            Err(error) => {
                let report = ErrorReport::from(&error);
                tracing::warn!(
                    kind = %report.kind,
                    message = %report.message,
                    causes = ?report.trace,
                    "startup failed"
                );
                self.transition(StartupPhase::Failed);
                StartupOutcome::Failed(report)
            }
        }
    }

    /// Moves `Idle` to `MigratingOrSkip` under one lock. Only the first
    /// caller gets `true`.
    fn claim(&self) -> bool {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        if *phase != StartupPhase::Idle {
            return false;
        }
        *phase = StartupPhase::MigratingOrSkip;
        true
    }

    async fn run(&self) -> Result<(), StartupError> {
        let mut record: MigrationState = self.hydrate(StoreName::Migration).await?;
        record.latest = self.plan.latest();
        if record.is_behind() {
            record.current = self.migrate(record.current, record.latest).await?;
        } else {
            tracing::info!(current = record.current, latest = record.latest, "migrations up to date");
        }

        self.transition(StartupPhase::Hydrating);
        let (account, custom_price, ui_state, league, setting) = tokio::try_join!(
            self.hydrate::<AccountState>(StoreName::Account),
            self.hydrate::<CustomPriceState>(StoreName::CustomPrice),
            self.hydrate::<UiState>(StoreName::UiState),
            self.hydrate::<LeagueState>(StoreName::League),
            self.hydrate::<SettingState>(StoreName::Setting),
        )?;

        let context = &self.context;
        context.migration.replace(record);
        context.account.replace(account);
        context.custom_price.replace(custom_price);
        context.ui_state.replace(ui_state);
        context.league.replace(league);
        context.setting.replace(setting);

        // Re-apply the persisted scale so subscribers see it at least once.
        let ui_scale = context.setting.read(|setting| setting.ui_scale);
        context.setting.set_ui_scale(ui_scale);

        Ok(())
    }

    async fn migrate(&self, from: u32, to: u32) -> Result<u32, StartupError> {
        let runner = MigrationRunner::new(self.context.storage().clone(), Arc::clone(&self.plan))
            .with_progress(self.progress.clone());

        // A panicking step surfaces as a JoinError instead of unwinding
        // through the coordinator.
        let handle = tokio::spawn(async move { runner.run(from, to).await });
        match handle.await {
            Ok(result) => Ok(result?),
            Err(join_error) => Err(StartupError::Unknown(format!(
                "migration task aborted: {join_error}"
            ))),
        }
    }

    async fn hydrate<S: StoreState>(&self, name: StoreName) -> Result<S, StartupError> {
        let payload = self
            .context
            .storage()
            .load(name.key())
            .await
            .map_err(|err| StartupError::hydration(name, err))?;

        let state = match payload {
            None => {
                tracing::debug!(store = %name, "no persisted record, using defaults");
                S::default()
            }
            Some(payload) => NamedStore::<S>::parse_payload(&payload)
                .map_err(|err| StartupError::hydration(name, err))?,
        };
        tracing::debug!(store = %name, "store hydrated");
        Ok(state)
    }

    fn transition(&self, next: StartupPhase) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = next;
        self.announce(next);
    }

    fn announce(&self, phase: StartupPhase) {
        tracing::info!(phase = ?phase, "startup phase");
        self.phases.emit(&phase);
    }
}
