//! Egg cooking presets and timer constants

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Lower bound for a custom cook time, in seconds
pub const CUSTOM_TIME_MIN: u64 = 60;
/// Upper bound for a custom cook time, in seconds
pub const CUSTOM_TIME_MAX: u64 = 1200;
/// Custom cook times move in 30 second increments
pub const CUSTOM_TIME_STEP: u64 = 30;

/// Countdown tick period
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
/// How long the completion notification stays visible unless dismissed
pub const NOTIFICATION_AUTO_HIDE: Duration = Duration::from_secs(8);

/// Identifier for one of the named cooking presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetId {
    Soft,
    Medium,
    Hard,
}

impl PresetId {
    /// Lowercase identifier as it appears in routes and stored records
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetId::Soft => "soft",
            PresetId::Medium => "medium",
            PresetId::Hard => "hard",
        }
    }

    /// Look up the catalog entry for this preset
    pub fn preset(&self) -> &'static EggPreset {
        match self {
            PresetId::Soft => &EGG_PRESETS[0],
            PresetId::Medium => &EGG_PRESETS[1],
            PresetId::Hard => &EGG_PRESETS[2],
        }
    }
}

/// A named fixed-duration cooking profile
#[derive(Debug, Clone, Serialize)]
pub struct EggPreset {
    pub id: PresetId,
    pub name: &'static str,
    pub description: &'static str,
    pub duration_seconds: u64,
}

/// The static preset catalog
pub static EGG_PRESETS: [EggPreset; 3] = [
    EggPreset {
        id: PresetId::Soft,
        name: "Soft Boiled",
        description: "Runny yolk, set whites",
        duration_seconds: 360,
    },
    EggPreset {
        id: PresetId::Medium,
        name: "Medium Boiled",
        description: "Jammy, creamy yolk",
        duration_seconds: 480,
    },
    EggPreset {
        id: PresetId::Hard,
        name: "Hard Boiled",
        description: "Fully set yolk",
        duration_seconds: 720,
    },
];
