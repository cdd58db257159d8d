//! `customPrice` store: user overrides of item prices, per league.

use serde::{Deserialize, Serialize};

use super::Extra;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomPriceState {
    pub custom_league_prices: Vec<CustomLeaguePrice>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomLeaguePrice {
    pub league_id: String,
    pub prices: Vec<CustomPrice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomPrice {
    pub name: String,
    pub custom_price: f64,
    #[serde(flatten)]
    pub extra: Extra,
}

impl CustomPriceState {
    pub fn prices_for(&self, league_id: &str) -> &[CustomPrice] {
        self.custom_league_prices
            .iter()
            .find(|entry| entry.league_id == league_id)
            .map(|entry| entry.prices.as_slice())
            .unwrap_or(&[])
    }
}
