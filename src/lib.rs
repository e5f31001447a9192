//! Eggy - A state-managed HTTP server for egg-cooking countdown control
//!
//! This library provides a single shared egg timer: a four-phase countdown
//! state machine, the background task that ticks it, and the HTTP surfaces,
//! history, and settings built around it.

pub mod api;
pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
