//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use crate::services::{HistoryStore, SettingsStore};
use super::{
    presets::PresetId,
    timer_state::{TimerPhase, TimerSnapshot, TimerState},
};

/// Result of an action call: the state after the call, and whether it changed
/// anything (guarded calls in the wrong phase are ignored, never errors)
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub changed: bool,
    pub timer: TimerState,
}

/// Result of one countdown tick
#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// The run this tick belonged to is no longer live; nothing was mutated
    Stale,
    /// One second elapsed
    Ticked(TimerState),
    /// The countdown reached zero and the run completed
    Completed(TimerState),
}

/// Main application state shared by every surface
///
/// The timer state machine lives behind one mutex; action methods mutate it,
/// broadcast an event for the countdown task, and publish a snapshot for
/// watchers. The history and settings stores ride along so handlers and the
/// countdown task reach them through the same `Arc`.
#[derive(Debug)]
pub struct AppState {
    /// The countdown state machine
    pub timer: Arc<Mutex<TimerState>>,
    /// Completed-cook history, persisted as a flat JSON file
    pub history: HistoryStore,
    /// Light/dark preference, persisted alongside the history
    pub settings: SettingsStore,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Timer events for the countdown task (actions only, not ticks)
    pub timer_event_tx: broadcast::Sender<TimerState>,
    /// Snapshot fan-out for live surfaces (every mutation, ticks included)
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Create a new AppState with the default (medium) selection
    pub fn new(port: u16, host: String, history: HistoryStore, settings: SettingsStore) -> Self {
        let timer = TimerState::new();
        let (timer_event_tx, _) = broadcast::channel(100);
        let (snapshot_tx, snapshot_rx) = watch::channel(timer.snapshot());

        Self {
            timer: Arc::new(Mutex::new(timer)),
            history,
            settings,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            timer_event_tx,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Apply an action to the timer under the lock
    ///
    /// The updater returns whether it changed anything. On change the new
    /// state is broadcast to the countdown task and published to watchers;
    /// ignored calls only log.
    fn apply<F>(&self, action: &str, updater: F) -> Result<ActionOutcome, String>
    where
        F: FnOnce(&mut TimerState) -> bool,
    {
        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        let changed = updater(&mut timer);
        let new_state = timer.clone();
        drop(timer); // Release the lock early

        if !changed {
            debug!("Action '{}' ignored in phase {:?}", action, new_state.phase);
            return Ok(ActionOutcome { changed, timer: new_state });
        }

        // Update last action tracking
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        // Wake the countdown task (this drives tick start/cancel logic)
        if let Err(e) = self.timer_event_tx.send(new_state.clone()) {
            warn!("Failed to send timer event: {}", e);
        }
        if let Err(e) = self.snapshot_tx.send(new_state.snapshot()) {
            warn!("Failed to publish timer snapshot: {}", e);
        }

        Ok(ActionOutcome { changed, timer: new_state })
    }

    /// Start or resume the countdown
    ///
    /// No-op while already Running and after completion (reset first).
    pub fn start(&self) -> Result<ActionOutcome, String> {
        self.apply("start", |timer| match timer.phase {
            TimerPhase::Running | TimerPhase::Completed => false,
            TimerPhase::Idle | TimerPhase::Paused => {
                timer.phase = TimerPhase::Running;
                timer.run_id += 1;
                true
            }
        })
    }

    /// Freeze the countdown at its current remaining time
    pub fn pause(&self) -> Result<ActionOutcome, String> {
        self.apply("pause", |timer| match timer.phase {
            TimerPhase::Running => {
                timer.phase = TimerPhase::Paused;
                true
            }
            _ => false,
        })
    }

    /// Pause if running, otherwise start; ignored after completion
    pub fn toggle(&self) -> Result<ActionOutcome, String> {
        self.apply("toggle", |timer| match timer.phase {
            TimerPhase::Running => {
                timer.phase = TimerPhase::Paused;
                true
            }
            TimerPhase::Idle | TimerPhase::Paused => {
                timer.phase = TimerPhase::Running;
                timer.run_id += 1;
                true
            }
            TimerPhase::Completed => false,
        })
    }

    /// Return to Idle at the full selected duration; always allowed
    pub fn reset(&self) -> Result<ActionOutcome, String> {
        self.apply("reset", |timer| {
            timer.phase = TimerPhase::Idle;
            timer.time_remaining_seconds = timer.duration_seconds;
            if timer.notification_visible {
                timer.notification_visible = false;
                timer.notification_epoch += 1;
            }
            true
        })
    }

    /// Switch to a named preset; ignored while the countdown is running
    pub fn select_preset(&self, preset: PresetId) -> Result<ActionOutcome, String> {
        self.apply("select-preset", |timer| {
            if timer.phase == TimerPhase::Running {
                return false;
            }
            timer.selected_preset = preset;
            timer.use_custom = false;
            timer.duration_seconds = preset.preset().duration_seconds;
            timer.time_remaining_seconds = timer.duration_seconds;
            timer.phase = TimerPhase::Idle;
            if timer.notification_visible {
                timer.notification_visible = false;
                timer.notification_epoch += 1;
            }
            true
        })
    }

    /// Switch to a custom duration; ignored while the countdown is running
    ///
    /// Bounds and step validation belong to the calling surface; the engine
    /// takes the value as given.
    pub fn set_custom_duration(&self, seconds: u64) -> Result<ActionOutcome, String> {
        self.apply("set-custom", |timer| {
            if timer.phase == TimerPhase::Running {
                return false;
            }
            timer.custom_duration_seconds = seconds;
            timer.use_custom = true;
            timer.duration_seconds = seconds;
            timer.time_remaining_seconds = seconds;
            timer.phase = TimerPhase::Idle;
            if timer.notification_visible {
                timer.notification_visible = false;
                timer.notification_epoch += 1;
            }
            true
        })
    }

    /// Hide the completion notification immediately
    pub fn dismiss_notification(&self) -> Result<ActionOutcome, String> {
        self.apply("dismiss-notification", |timer| {
            if !timer.notification_visible {
                return false;
            }
            timer.notification_visible = false;
            timer.notification_epoch += 1;
            true
        })
    }

    /// Land one countdown tick for the given run
    ///
    /// A tick from a superseded run (paused, reset, reselected, or restarted
    /// since it was scheduled) lands as `Stale` and mutates nothing. Ticks
    /// publish snapshots but do not broadcast events: the countdown task is
    /// the only event consumer and it is the one ticking.
    pub fn tick(&self, run_id: u64) -> Result<TickOutcome, String> {
        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        if timer.phase != TimerPhase::Running || timer.run_id != run_id {
            return Ok(TickOutcome::Stale);
        }

        let completed = timer.time_remaining_seconds <= 1;
        if completed {
            timer.time_remaining_seconds = 0;
            timer.phase = TimerPhase::Completed;
            timer.notification_visible = true;
            timer.notification_epoch += 1;
        } else {
            timer.time_remaining_seconds -= 1;
        }
        let new_state = timer.clone();
        drop(timer);

        if let Err(e) = self.snapshot_tx.send(new_state.snapshot()) {
            warn!("Failed to publish timer snapshot: {}", e);
        }

        if completed {
            Ok(TickOutcome::Completed(new_state))
        } else {
            Ok(TickOutcome::Ticked(new_state))
        }
    }

    /// Hide the notification if the given epoch is still current
    ///
    /// The auto-hide timeout carries the epoch from completion time; any
    /// dismiss/reset/reselect since then bumped it, making the timeout a no-op.
    pub fn clear_notification_if(&self, epoch: u64) -> Result<bool, String> {
        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        if !timer.notification_visible || timer.notification_epoch != epoch {
            return Ok(false);
        }
        timer.notification_visible = false;
        timer.notification_epoch += 1;
        let new_state = timer.clone();
        drop(timer);

        if let Err(e) = self.snapshot_tx.send(new_state.snapshot()) {
            warn!("Failed to publish timer snapshot: {}", e);
        }
        Ok(true)
    }

    /// Get a clone of the current timer state
    pub fn current_timer(&self) -> Result<TimerState, String> {
        self.timer.lock()
            .map(|timer| timer.clone())
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Get the current read-only snapshot
    pub fn snapshot(&self) -> Result<TimerSnapshot, String> {
        self.current_timer().map(|timer| timer.snapshot())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
