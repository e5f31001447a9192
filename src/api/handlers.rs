//! HTTP endpoint handlers
//!
//! Every surface goes through here: timer actions, the live snapshot stream,
//! the history list, and the theme preference. Guarded timer actions never
//! fail — an invalid-for-state call comes back `ignored` with the unchanged
//! snapshot, matching how the engine treats them.

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::{stream, Stream};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::{
    services::HistoryStats,
    state::{
        presets::{CUSTOM_TIME_MAX, CUSTOM_TIME_MIN, CUSTOM_TIME_STEP},
        ActionOutcome, AppState, EggPreset, PresetId, EGG_PRESETS,
    },
    utils::format_time,
};
use super::responses::{
    ApiResponse, HealthResponse, HistoryListResponse, StatusResponse, ThemeResponse,
};

/// Request body for POST /timer/custom
#[derive(Debug, Deserialize)]
pub struct CustomTimeRequest {
    pub seconds: u64,
}

/// Translate an action outcome into the standard response shape
fn action_response(
    result: Result<ActionOutcome, String>,
    applied: String,
    ignored: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(outcome) => {
            let snapshot = outcome.timer.snapshot();
            if outcome.changed {
                info!("{}", applied);
                Ok(Json(ApiResponse::applied(applied, snapshot)))
            } else {
                debug!("{} (phase {:?})", ignored, outcome.timer.phase);
                Ok(Json(ApiResponse::ignored(ignored.to_string(), snapshot)))
            }
        }
        Err(e) => {
            error!("Timer action failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timer/start - begin or resume the countdown
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    action_response(
        state.start(),
        "Timer started".to_string(),
        "Start ignored in current state",
    )
}

/// Handle POST /timer/pause - freeze the countdown
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    action_response(
        state.pause(),
        "Timer paused".to_string(),
        "Pause ignored while not running",
    )
}

/// Handle POST /timer/toggle - pause if running, otherwise start
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    action_response(
        state.toggle(),
        "Timer toggled".to_string(),
        "Toggle ignored after completion",
    )
}

/// Handle POST /timer/reset - back to Idle at the full selected duration
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    action_response(state.reset(), "Timer reset".to_string(), "Reset ignored")
}

/// Handle POST /timer/preset/:preset - switch to a named preset
pub async fn select_preset_handler(
    State(state): State<Arc<AppState>>,
    Path(preset): Path<PresetId>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let entry = preset.preset();
    action_response(
        state.select_preset(preset),
        format!("{} selected ({})", entry.name, format_time(entry.duration_seconds)),
        "Preset change ignored while running",
    )
}

/// Handle POST /timer/custom - switch to a custom duration
///
/// Bounds and step checks live here, on the surface; the engine itself has no
/// error conditions.
pub async fn custom_time_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CustomTimeRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let valid = (CUSTOM_TIME_MIN..=CUSTOM_TIME_MAX).contains(&request.seconds)
        && request.seconds % CUSTOM_TIME_STEP == 0;
    if !valid {
        warn!(
            "Rejecting custom time {}s (allowed {}..={} in {}s steps)",
            request.seconds, CUSTOM_TIME_MIN, CUSTOM_TIME_MAX, CUSTOM_TIME_STEP
        );
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    action_response(
        state.set_custom_duration(request.seconds),
        format!("Custom time set to {}", format_time(request.seconds)),
        "Custom time ignored while running",
    )
}

/// Handle POST /notification/dismiss - hide the completion notification
pub async fn dismiss_notification_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    action_response(
        state.dismiss_notification(),
        "Notification dismissed".to_string(),
        "No notification to dismiss",
    )
}

/// Handle GET /presets - the static preset catalog
pub async fn presets_handler() -> Json<&'static [EggPreset; 3]> {
    Json(&EGG_PRESETS)
}

/// Handle GET /status - full snapshot plus server metadata
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    match state.snapshot() {
        Ok(timer) => {
            let (last_action, last_action_time) = state.get_last_action();
            Ok(Json(StatusResponse {
                timer,
                theme: state.settings.theme(),
                uptime: state.get_uptime(),
                port: state.port,
                host: state.host.clone(),
                last_action,
                last_action_time,
            }))
        }
        Err(e) => {
            error!("Failed to read timer state: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /events - live snapshot stream
///
/// Emits the current snapshot immediately, then one event per state change
/// (ticks included), so a surface can attach at any point of a cook.
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.snapshot_tx.subscribe();
    rx.mark_changed();

    let stream = stream::unfold(rx, |mut rx| async move {
        rx.changed().await.ok()?;
        let snapshot = rx.borrow_and_update().clone();
        let event = match serde_json::to_string(&snapshot) {
            Ok(json) => Event::default().data(json),
            Err(e) => {
                error!("Failed to serialize snapshot: {}", e);
                Event::default().comment("serialization failed")
            }
        };
        Some((Ok::<_, Infallible>(event), rx))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle GET /history - the full cook history, newest first
pub async fn history_handler(State(state): State<Arc<AppState>>) -> Json<HistoryListResponse> {
    let entries = state.history.list();
    Json(HistoryListResponse {
        total: entries.len(),
        entries,
    })
}

/// Handle DELETE /history/:id - remove one record
pub async fn delete_history_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<HistoryListResponse>, StatusCode> {
    if !state.history.delete(id) {
        return Err(StatusCode::NOT_FOUND);
    }
    info!("Deleted history entry {}", id);

    let entries = state.history.list();
    Ok(Json(HistoryListResponse {
        total: entries.len(),
        entries,
    }))
}

/// Handle DELETE /history - drop every record
pub async fn clear_history_handler(
    State(state): State<Arc<AppState>>,
) -> Json<HistoryListResponse> {
    state.history.clear();
    info!("History cleared");
    Json(HistoryListResponse {
        total: 0,
        entries: Vec::new(),
    })
}

/// Handle GET /history/stats - aggregates for the history page
pub async fn history_stats_handler(State(state): State<Arc<AppState>>) -> Json<HistoryStats> {
    Json(state.history.stats())
}

/// Handle GET /theme - current light/dark preference
pub async fn theme_handler(State(state): State<Arc<AppState>>) -> Json<ThemeResponse> {
    Json(ThemeResponse {
        theme: state.settings.theme(),
    })
}

/// Handle POST /theme/toggle - flip and persist the preference
pub async fn theme_toggle_handler(State(state): State<Arc<AppState>>) -> Json<ThemeResponse> {
    let theme = state.settings.toggle_theme();
    info!("Theme switched to {}", theme.as_str());
    Json(ThemeResponse { theme })
}

/// Handle GET /health - health check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
