//! `account` store: known accounts and the active selection.

use serde::{Deserialize, Serialize};

use super::Extra;
use crate::store::NamedStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountState {
    pub accounts: Vec<Account>,
    /// Name of the selected account, if any.
    pub active_account: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Account {
    pub name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl AccountState {
    /// The selected account, when the selection names a known account.
    pub fn selected_account(&self) -> Option<&Account> {
        let active = self.active_account.as_deref()?;
        self.accounts.iter().find(|account| account.name == active)
    }
}

impl NamedStore<AccountState> {
    /// Name of the selected account, if one is selected and known.
    pub fn selected_account_name(&self) -> Option<String> {
        self.read(|state| state.selected_account().map(|account| account.name.clone()))
    }
}
