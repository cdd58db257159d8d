//! Application state core for exilence: named stores, migrations, and the
//! startup hydration sequence.
//!
//! The crate owns everything between the durable record storage
//! (`exilence-storage`) and the application shell: the fixed set of
//! observable named stores, the versioned migration runner that upgrades
//! persisted payloads, and the coordinator that brings the stores up at
//! launch and reports either "ready" or an error view.
//!
//! # Startup order
//!
//! ```text
//! hydrate `migration` --> current < latest? --yes--> MigrationRunner
//!                                |                        |
//!                                no                       |
//!                                v                        v
//!             hydrate account/customPrice/uiState/league/setting (joined)
//!                                |
//!                                v
//!                     post-hydration adjustments --> Ready
//! ```
//!
//! Any failure along the way ends in [`hydration::StartupPhase::Failed`].
//!
//! # Modules
//!
//! - [`config`]: environment-driven [`AppConfig`]
//! - [`error`]: startup error taxonomy and the renderable [`ErrorReport`]
//! - [`signal`]: synchronous publish/subscribe primitive
//! - [`store`]: [`NamedStore`] and the [`StoreName`] key space
//! - [`stores`]: payload types for each named store
//! - [`context`]: [`AppContext`], the store registry
//! - [`persist`]: async storage adapter and store write-back
//! - [`migration`]: [`MigrationRunner`], [`MigrationPlan`] and built-in steps
//! - [`hydration`]: [`HydrationCoordinator`]

pub mod config;
pub mod context;
pub mod error;
pub mod hydration;
pub mod migration;
pub mod persist;
pub mod signal;
pub mod store;
pub mod stores;

pub use config::AppConfig;
pub use context::AppContext;
pub use error::{ErrorKind, ErrorReport, HydrationError, MigrationError, StartupError};
pub use hydration::{HydrationCoordinator, StartupOutcome, StartupPhase};
pub use migration::{MigrationPlan, MigrationProgress, MigrationRunner, MigrationStep};
pub use persist::{PersistentStoreAdapter, WriteBack, WriteBackStats};
pub use signal::{Signal, Subscription};
pub use store::{NamedStore, StoreName, StoreState};
