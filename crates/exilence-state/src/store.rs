//! Named observable state containers.
//!
//! [`StoreName`] is the fixed key space shared with durable storage. A
//! [`NamedStore`] owns one payload of some [`StoreState`] type and notifies
//! subscribers after every mutation.

use std::fmt;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::signal::{Signal, Subscription};

/// Logical name of an application store, doubling as its storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StoreName {
    #[serde(rename = "account")]
    Account,
    #[serde(rename = "customPrice")]
    CustomPrice,
    #[serde(rename = "uiState")]
    UiState,
    #[serde(rename = "league")]
    League,
    #[serde(rename = "setting")]
    Setting,
    #[serde(rename = "migration")]
    Migration,
}

impl StoreName {
    /// Every store, in registry order.
    pub const ALL: [StoreName; 6] = [
        StoreName::Account,
        StoreName::CustomPrice,
        StoreName::UiState,
        StoreName::League,
        StoreName::Setting,
        StoreName::Migration,
    ];

    /// The stores hydrated after migrations have settled.
    pub const AFTER_MIGRATION: [StoreName; 5] = [
        StoreName::Account,
        StoreName::CustomPrice,
        StoreName::UiState,
        StoreName::League,
        StoreName::Setting,
    ];

    /// The storage key for this store.
    pub fn key(self) -> &'static str {
        match self {
            StoreName::Account => "account",
            StoreName::CustomPrice => "customPrice",
            StoreName::UiState => "uiState",
            StoreName::League => "league",
            StoreName::Setting => "setting",
            StoreName::Migration => "migration",
        }
    }
}

impl fmt::Display for StoreName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error for a string that names no store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown store name: {0:?}")]
pub struct UnknownStoreName(pub String);

impl FromStr for StoreName {
    type Err = UnknownStoreName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoreName::ALL
            .into_iter()
            .find(|name| name.key() == s)
            .ok_or_else(|| UnknownStoreName(s.to_string()))
    }
}

/// Payload types that can live in a [`NamedStore`].
///
/// `Default` is the state of a store with no persisted record.
pub trait StoreState:
    Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static
{
}

impl<T> StoreState for T where
    T: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static
{
}

/// An observable container for one store's state.
pub struct NamedStore<S> {
    name: StoreName,
    state: RwLock<S>,
    changes: Signal<S>,
}

impl<S: StoreState> NamedStore<S> {
    /// Creates a store holding `S::default()`.
    pub fn new(name: StoreName) -> Self {
        NamedStore {
            name,
            state: RwLock::new(S::default()),
            changes: Signal::new(),
        }
    }

    pub fn name(&self) -> StoreName {
        self.name
    }

    /// Returns a copy of the current state.
    pub fn get(&self) -> S {
        self.read(S::clone)
    }

    /// Runs `f` against the current state without copying it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Mutates the state in place, then notifies subscribers.
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let (result, snapshot) = {
            let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let result = f(&mut guard);
            (result, guard.clone())
        };
        self.changes.emit(&snapshot);
        result
    }

    /// Replaces the whole state, then notifies subscribers.
    pub fn replace(&self, state: S) {
        self.update(|current| *current = state);
    }

    /// Subscribes to post-mutation snapshots.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.changes.subscribe(callback)
    }

    /// Serializes the current state to its storage payload.
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        self.read(serde_json::to_string)
    }

    /// Parses a storage payload into a state value.
    pub fn parse_payload(payload: &str) -> Result<S, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

impl<S: StoreState + fmt::Debug> fmt::Debug for NamedStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedStore")
            .field("name", &self.name)
            .field("state", &self.get())
            .finish()
    }
}

/// Type-erased view of a store, used where all stores are handled alike
/// (write-back, diagnostics).
pub trait ErasedStore: Send + Sync {
    fn name(&self) -> StoreName;

    /// The current state as a storage payload.
    fn payload(&self) -> Result<String, serde_json::Error>;

    /// Registers `notify` to run after every mutation.
    fn on_change(&self, notify: Box<dyn Fn() + Send + Sync>) -> Subscription;
}

impl<S: StoreState> ErasedStore for NamedStore<S> {
    fn name(&self) -> StoreName {
        self.name
    }

    fn payload(&self) -> Result<String, serde_json::Error> {
        self.to_payload()
    }

    fn on_change(&self, notify: Box<dyn Fn() + Send + Sync>) -> Subscription {
        self.subscribe(move |_| notify())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        value: u32,
    }

    #[test]
    fn test_store_name_keys_round_trip() {
        for name in StoreName::ALL {
            assert_eq!(name.key().parse::<StoreName>().unwrap(), name);
        }
        assert_eq!(
            "ui-state".parse::<StoreName>(),
            Err(UnknownStoreName("ui-state".to_string()))
        );
    }

    #[test]
    fn test_store_name_serializes_as_key() {
        assert_eq!(
            serde_json::to_string(&StoreName::CustomPrice).unwrap(),
            "\"customPrice\""
        );
    }

    #[test]
    fn test_after_migration_excludes_migration() {
        assert!(!StoreName::AFTER_MIGRATION.contains(&StoreName::Migration));
        assert_eq!(StoreName::AFTER_MIGRATION.len() + 1, StoreName::ALL.len());
    }

    #[test]
    fn test_new_store_holds_default() {
        let store = NamedStore::<Counter>::new(StoreName::Setting);
        assert_eq!(store.get(), Counter::default());
        assert_eq!(store.name(), StoreName::Setting);
    }

    #[test]
    fn test_update_notifies_with_new_state() {
        let store = NamedStore::<Counter>::new(StoreName::Setting);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let _sub = {
            let seen = Arc::clone(&seen);
            store.subscribe(move |s: &Counter| seen.lock().unwrap().push(s.value))
        };

        let returned = store.update(|s| {
            s.value += 2;
            s.value
        });
        store.replace(Counter { value: 9 });

        assert_eq!(returned, 2);
        assert_eq!(*seen.lock().unwrap(), vec![2, 9]);
    }

    #[test]
    fn test_subscriber_can_read_store_during_notification() {
        let store = Arc::new(NamedStore::<Counter>::new(StoreName::Setting));
        let observed = Arc::new(Mutex::new(None));
        let _sub = {
            let store_ref = Arc::downgrade(&store);
            let observed = Arc::clone(&observed);
            store.subscribe(move |_| {
                if let Some(store) = store_ref.upgrade() {
                    *observed.lock().unwrap() = Some(store.get().value);
                }
            })
        };
        store.replace(Counter { value: 4 });
        assert_eq!(*observed.lock().unwrap(), Some(4));
    }

    #[test]
    fn test_payload_round_trip() {
        let store = NamedStore::<Counter>::new(StoreName::League);
        store.replace(Counter { value: 3 });
        let payload = store.to_payload().unwrap();
        assert_eq!(payload, r#"{"value":3}"#);
        assert_eq!(
            NamedStore::<Counter>::parse_payload(&payload).unwrap(),
            Counter { value: 3 }
        );
    }

    #[test]
    fn test_erased_on_change() {
        let store = NamedStore::<Counter>::new(StoreName::League);
        let hits = Arc::new(Mutex::new(0));
        let erased: &dyn ErasedStore = &store;
        let _sub = {
            let hits = Arc::clone(&hits);
            erased.on_change(Box::new(move || *hits.lock().unwrap() += 1))
        };
        store.update(|s| s.value = 1);
        assert_eq!(*hits.lock().unwrap(), 1);
        assert_eq!(erased.name(), StoreName::League);
        assert_eq!(erased.payload().unwrap(), r#"{"value":1}"#);
    }
}
