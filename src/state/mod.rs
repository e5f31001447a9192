//! State management module
//!
//! This module contains the timer state machine, the preset catalog, and the
//! shared application state handed to every surface.

pub mod app_state;
pub mod presets;
pub mod timer_state;

// Re-export main types
pub use app_state::{ActionOutcome, AppState, TickOutcome};
pub use presets::{EggPreset, PresetId, EGG_PRESETS};
pub use timer_state::{TimerPhase, TimerSnapshot, TimerState};
