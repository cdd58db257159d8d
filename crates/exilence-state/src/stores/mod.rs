//! Payload types for each named store.
//!
//! Only the fields the startup core reads are modelled. Every payload keeps
//! unrecognised fields in a flattened `extra` map so a load/save cycle never
//! drops data written by a newer or older build.

pub mod account;
pub mod custom_price;
pub mod league;
pub mod migration;
pub mod setting;
pub mod ui_state;

pub use account::{Account, AccountState};
pub use custom_price::{CustomLeaguePrice, CustomPrice, CustomPriceState};
pub use league::{League, LeagueState};
pub use migration::{MigrationState, LATEST_MIGRATION_VERSION};
pub use setting::{SettingState, DEFAULT_UI_SCALE, UI_SCALE_RANGE};
pub use ui_state::UiState;

/// Unrecognised payload fields, preserved verbatim.
pub type Extra = serde_json::Map<String, serde_json::Value>;
