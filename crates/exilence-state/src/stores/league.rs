//! `league` store: leagues known to the client.

use serde::{Deserialize, Serialize};

use super::Extra;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeagueState {
    /// Leagues the account has characters in.
    pub leagues: Vec<League>,
    /// Leagues that have pricing data.
    pub price_leagues: Vec<League>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct League {
    pub id: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl LeagueState {
    pub fn find_league(&self, id: &str) -> Option<&League> {
        self.leagues.iter().find(|league| league.id == id)
    }
}
