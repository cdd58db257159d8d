//! `uiState` store: view state that outlives a session.

use serde::{Deserialize, Serialize};

use super::Extra;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiState {
    pub user_id: Option<String>,
    pub selected_league: Option<String>,
    pub sidenav_open: bool,
    #[serde(flatten)]
    pub extra: Extra,
}
