//! Timer state machine data and snapshots

use serde::{Deserialize, Serialize};

use super::presets::PresetId;

/// Phase of the countdown state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Full timer state: duration selection, live countdown, and notification flag
///
/// One instance lives behind the `AppState` mutex for the lifetime of the
/// process; every surface reads it through [`TimerSnapshot`].
#[derive(Debug, Clone)]
pub struct TimerState {
    /// Which named preset is active when not using a custom duration
    pub selected_preset: PresetId,
    /// Last custom duration picked on the dial, kept even while a preset is active
    pub custom_duration_seconds: u64,
    /// Whether the custom duration (true) or the preset (false) is authoritative
    pub use_custom: bool,

    /// Duration snapshot taken when the selection last changed
    pub duration_seconds: u64,
    /// Seconds left on the countdown, in [0, duration_seconds]
    pub time_remaining_seconds: u64,
    pub phase: TimerPhase,

    /// Completion notification flag
    pub notification_visible: bool,

    /// Bumped on every start; a tick only lands if its run id still matches
    pub run_id: u64,
    /// Bumped whenever notification visibility changes; stale auto-hides miss
    pub notification_epoch: u64,
}

impl TimerState {
    /// Fresh state with the default preset (medium) selected
    pub fn new() -> Self {
        let medium = PresetId::Medium.preset();
        Self {
            selected_preset: PresetId::Medium,
            custom_duration_seconds: medium.duration_seconds,
            use_custom: false,
            duration_seconds: medium.duration_seconds,
            time_remaining_seconds: medium.duration_seconds,
            phase: TimerPhase::Idle,
            notification_visible: false,
            run_id: 0,
            notification_epoch: 0,
        }
    }

    /// Fraction of the selected duration already elapsed, in [0, 1]
    pub fn progress(&self) -> f64 {
        if self.duration_seconds == 0 {
            return 0.0;
        }
        1.0 - self.time_remaining_seconds as f64 / self.duration_seconds as f64
    }

    /// Display name for the active selection ("Custom" or the preset name)
    pub fn egg_name(&self) -> String {
        if self.use_custom {
            "Custom".to_string()
        } else {
            self.selected_preset.preset().name.to_string()
        }
    }

    /// Preset id to record on completion; none when cooking a custom time
    pub fn recorded_preset(&self) -> Option<PresetId> {
        if self.use_custom {
            None
        } else {
            Some(self.selected_preset)
        }
    }

    /// Read-only view handed to every surface
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            selected_preset: self.selected_preset,
            custom_duration_seconds: self.custom_duration_seconds,
            use_custom: self.use_custom,
            egg_name: self.egg_name(),
            duration_seconds: self.duration_seconds,
            time_remaining_seconds: self.time_remaining_seconds,
            state: self.phase,
            progress: self.progress(),
            is_running: self.phase == TimerPhase::Running,
            is_paused: self.phase == TimerPhase::Paused,
            is_completed: self.phase == TimerPhase::Completed,
            is_idle: self.phase == TimerPhase::Idle,
            is_active: matches!(self.phase, TimerPhase::Running | TimerPhase::Paused),
            notification_visible: self.notification_visible,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable view of the timer exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub selected_preset: PresetId,
    pub custom_duration_seconds: u64,
    pub use_custom: bool,
    pub egg_name: String,
    pub duration_seconds: u64,
    pub time_remaining_seconds: u64,
    pub state: TimerPhase,
    pub progress: f64,
    pub is_running: bool,
    pub is_paused: bool,
    pub is_completed: bool,
    pub is_idle: bool,
    pub is_active: bool,
    pub notification_visible: bool,
}
