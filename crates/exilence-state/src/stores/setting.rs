//! `setting` store: user preferences.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::Extra;
use crate::store::NamedStore;

/// UI scale in percent applied when nothing is persisted.
pub const DEFAULT_UI_SCALE: u32 = 100;

/// Accepted UI scale values, in percent.
pub const UI_SCALE_RANGE: RangeInclusive<u32> = 50..=200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingState {
    pub ui_scale: u32,
    pub low_confidence_pricing: bool,
    #[serde(rename = "priceTreshold")]
    pub price_threshold: u32,
    #[serde(rename = "totalPriceTreshold")]
    pub total_price_threshold: u32,
    pub auto_snapshotting: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Default for SettingState {
    fn default() -> Self {
        SettingState {
            ui_scale: DEFAULT_UI_SCALE,
            low_confidence_pricing: false,
            price_threshold: 0,
            total_price_threshold: 0,
            auto_snapshotting: true,
            extra: Extra::new(),
        }
    }
}

/// Clamps a requested scale into [`UI_SCALE_RANGE`].
pub fn clamp_ui_scale(scale: u32) -> u32 {
    scale.clamp(*UI_SCALE_RANGE.start(), *UI_SCALE_RANGE.end())
}

impl NamedStore<SettingState> {
    /// Applies a UI scale, clamped into range. Always notifies subscribers,
    /// even when the value is unchanged, so views re-apply it.
    pub fn set_ui_scale(&self, scale: u32) -> u32 {
        self.update(|state| {
            state.ui_scale = clamp_ui_scale(scale);
            state.ui_scale
        })
    }
}
