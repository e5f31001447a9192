//! Persistence services
//!
//! JSON-file-backed stores for the cook history and the user settings. Both
//! swallow their own I/O failures: a broken disk degrades the history page,
//! never the timer.

pub mod history;
pub mod settings;
pub mod storage;

// Re-export main types
pub use history::{HistoryRecord, HistoryStats, HistoryStore};
pub use settings::{SettingsStore, Theme};
