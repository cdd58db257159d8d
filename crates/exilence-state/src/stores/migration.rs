//! `migration` store: the persisted migration record.

use serde::{Deserialize, Serialize};

/// Highest migration version known to this build.
///
/// Must equal the highest step version in
/// [`MigrationPlan::standard`](crate::migration::MigrationPlan::standard).
pub const LATEST_MIGRATION_VERSION: u32 = 1;

/// The migration record, persisted as `{ "current": .., "latest": .. }`.
///
/// `current` is the version of the last fully applied migration step. The
/// stored `latest` is informational; the running build's plan decides the
/// effective value after hydration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationState {
    pub current: u32,
    pub latest: u32,
}

impl Default for MigrationState {
    fn default() -> Self {
        MigrationState {
            current: 0,
            latest: LATEST_MIGRATION_VERSION,
        }
    }
}

impl MigrationState {
    /// Whether pending migrations exist.
    pub fn is_behind(&self) -> bool {
        self.current < self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let state = MigrationState {
            current: 1,
            latest: 2,
        };
        assert_eq!(
            serde_json::to_string(&state).unwrap(),
            r#"{"current":1,"latest":2}"#
        );
    }

    #[test]
    fn test_fresh_record_is_behind() {
        let state = MigrationState::default();
        assert_eq!(state.current, 0);
        assert!(state.is_behind());
    }

    #[test]
    fn test_ahead_of_build_is_not_behind() {
        let state = MigrationState {
            current: 4,
            latest: LATEST_MIGRATION_VERSION,
        };
        assert!(!state.is_behind());
    }
}
