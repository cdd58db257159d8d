//! The application context: one instance of every named store plus the
//! storage adapter they hydrate from.
//!
//! An [`AppContext`] is built once per launch and handed (as
//! `Arc<AppContext>`) to whatever needs store access. There is no global
//! lookup; two contexts in one process are fully independent.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::persist::{PersistentStoreAdapter, WriteBack};
use crate::store::{ErasedStore, NamedStore, StoreName};
use crate::stores::{
    AccountState, CustomPriceState, LeagueState, MigrationState, SettingState, UiState,
};

/// Route shown when an account is selected.
pub const NET_WORTH_ROUTE: &str = "/net-worth";
/// Route shown when no account is selected.
pub const LOGIN_ROUTE: &str = "/login";

/// Registry of the fixed store set.
#[derive(Debug)]
pub struct AppContext {
    storage: PersistentStoreAdapter,
    pub account: NamedStore<AccountState>,
    pub custom_price: NamedStore<CustomPriceState>,
    pub ui_state: NamedStore<UiState>,
    pub league: NamedStore<LeagueState>,
    pub setting: NamedStore<SettingState>,
    pub migration: NamedStore<MigrationState>,
}

impl AppContext {
    /// Creates every store in its default state.
    pub fn new(storage: PersistentStoreAdapter) -> Self {
        AppContext {
            storage,
            account: NamedStore::new(StoreName::Account),
            custom_price: NamedStore::new(StoreName::CustomPrice),
            ui_state: NamedStore::new(StoreName::UiState),
            league: NamedStore::new(StoreName::League),
            setting: NamedStore::new(StoreName::Setting),
            migration: NamedStore::new(StoreName::Migration),
        }
    }

    pub fn storage(&self) -> &PersistentStoreAdapter {
        &self.storage
    }

    /// The store registered under `name`.
    pub fn store(&self, name: StoreName) -> &dyn ErasedStore {
        match name {
            StoreName::Account => &self.account,
            StoreName::CustomPrice => &self.custom_price,
            StoreName::UiState => &self.ui_state,
            StoreName::League => &self.league,
            StoreName::Setting => &self.setting,
            StoreName::Migration => &self.migration,
        }
    }

    /// All stores, in [`StoreName::ALL`] order.
    pub fn stores(&self) -> [&dyn ErasedStore; 6] {
        StoreName::ALL.map(|name| self.store(name))
    }

    /// Serialized payload of every store, keyed by name.
    pub fn snapshot(&self) -> Result<BTreeMap<StoreName, String>, serde_json::Error> {
        self.stores()
            .into_iter()
            .map(|store| Ok((store.name(), store.payload()?)))
            .collect()
    }

    /// First route to show: net worth for a selected account, login otherwise.
    pub fn initial_route(&self) -> &'static str {
        if self.account.selected_account_name().is_some() {
            NET_WORTH_ROUTE
        } else {
            LOGIN_ROUTE
        }
    }

    /// Starts persisting store mutations back to storage.
    pub fn start_write_back(self: &Arc<Self>) -> WriteBack {
        WriteBack::start(Arc::clone(self))
    }
}
