//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timer/start", post(start_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/toggle", post(toggle_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/timer/preset/:preset", post(select_preset_handler))
        .route("/timer/custom", post(custom_time_handler))
        .route("/notification/dismiss", post(dismiss_notification_handler))
        .route("/presets", get(presets_handler))
        .route("/status", get(status_handler))
        .route("/events", get(events_handler))
        .route("/history", get(history_handler).delete(clear_history_handler))
        .route("/history/stats", get(history_stats_handler))
        .route("/history/:id", delete(delete_history_handler))
        .route("/theme", get(theme_handler))
        .route("/theme/toggle", post(theme_toggle_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::services::{HistoryStore, SettingsStore, Theme};
    use super::responses::{ApiResponse, HistoryListResponse, StatusResponse, ThemeResponse};

    fn test_app() -> (TempDir, Arc<AppState>, Router) {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::new(
            3449,
            "127.0.0.1".to_string(),
            HistoryStore::new(dir.path()),
            SettingsStore::new(dir.path()),
        ));
        let app = create_router(Arc::clone(&state));
        (dir, state, app)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (_dir, _state, app) = test_app();
        let response = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn presets_lists_the_catalog() {
        let (_dir, _state, app) = test_app();
        let response = app.oneshot(get_request("/presets")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let presets: serde_json::Value = json_body(response).await;
        let presets = presets.as_array().unwrap();
        assert_eq!(presets.len(), 3);
        assert_eq!(presets[0]["id"], "soft");
        assert_eq!(presets[0]["duration_seconds"], 360);
        assert_eq!(presets[2]["name"], "Hard Boiled");
    }

    #[tokio::test]
    async fn status_starts_idle_on_medium() {
        let (_dir, _state, app) = test_app();
        let response = app.oneshot(get_request("/status")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let status: StatusResponse = json_body(response).await;
        assert!(status.timer.is_idle);
        assert_eq!(status.timer.egg_name, "Medium Boiled");
        assert_eq!(status.timer.duration_seconds, 480);
        assert_eq!(status.timer.time_remaining_seconds, 480);
        assert_eq!(status.theme, Theme::Light);
        assert_eq!(status.last_action, None);
    }

    #[tokio::test]
    async fn selecting_a_preset_reconfigures_the_timer() {
        let (_dir, _state, app) = test_app();
        let response = app
            .clone()
            .oneshot(post_request("/timer/preset/soft"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: ApiResponse = json_body(response).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.timer.egg_name, "Soft Boiled");
        assert_eq!(body.timer.duration_seconds, 360);
        assert!(!body.timer.use_custom);
    }

    #[tokio::test]
    async fn unknown_presets_are_rejected() {
        let (_dir, _state, app) = test_app();
        let response = app
            .oneshot(post_request("/timer/preset/raw"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn custom_time_must_be_in_bounds_and_on_step() {
        let (_dir, _state, app) = test_app();

        for body in ["{\"seconds\":30}", "{\"seconds\":1230}", "{\"seconds\":95}"] {
            let response = app
                .clone()
                .oneshot(post_json("/timer/custom", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }

        let response = app
            .oneshot(post_json("/timer/custom", "{\"seconds\":600}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: ApiResponse = json_body(response).await;
        assert_eq!(body.status, "ok");
        assert!(body.timer.use_custom);
        assert_eq!(body.timer.duration_seconds, 600);
        assert_eq!(body.timer.egg_name, "Custom");
    }

    #[tokio::test]
    async fn reconfiguration_is_ignored_while_running() {
        let (_dir, _state, app) = test_app();
        let response = app
            .clone()
            .oneshot(post_request("/timer/start"))
            .await
            .unwrap();
        let body: ApiResponse = json_body(response).await;
        assert_eq!(body.status, "ok");
        assert!(body.timer.is_running);

        let response = app
            .clone()
            .oneshot(post_request("/timer/preset/hard"))
            .await
            .unwrap();
        let body: ApiResponse = json_body(response).await;
        assert_eq!(body.status, "ignored");
        assert_eq!(body.timer.egg_name, "Medium Boiled");
        assert_eq!(body.timer.duration_seconds, 480);

        let response = app
            .oneshot(post_json("/timer/custom", "{\"seconds\":600}"))
            .await
            .unwrap();
        let body: ApiResponse = json_body(response).await;
        assert_eq!(body.status, "ignored");
        assert_eq!(body.timer.duration_seconds, 480);
    }

    #[tokio::test]
    async fn pause_and_reset_round_trip() {
        let (_dir, _state, app) = test_app();
        app.clone()
            .oneshot(post_request("/timer/start"))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(post_request("/timer/pause"))
            .await
            .unwrap();
        let body: ApiResponse = json_body(response).await;
        assert_eq!(body.status, "ok");
        assert!(body.timer.is_paused);

        let response = app
            .oneshot(post_request("/timer/reset"))
            .await
            .unwrap();
        let body: ApiResponse = json_body(response).await;
        assert!(body.timer.is_idle);
        assert_eq!(body.timer.time_remaining_seconds, 480);
    }

    #[tokio::test]
    async fn dismissing_without_a_notification_is_ignored() {
        let (_dir, _state, app) = test_app();
        let response = app
            .oneshot(post_request("/notification/dismiss"))
            .await
            .unwrap();
        let body: ApiResponse = json_body(response).await;
        assert_eq!(body.status, "ignored");
        assert!(!body.timer.notification_visible);
    }

    #[tokio::test]
    async fn history_listing_deleting_and_clearing() {
        let (_dir, state, app) = test_app();

        let response = app.clone().oneshot(get_request("/history")).await.unwrap();
        let body: HistoryListResponse = json_body(response).await;
        assert_eq!(body.total, 0);

        let record = state
            .history
            .append("Soft Boiled".to_string(), 360, Some(crate::state::PresetId::Soft))
            .unwrap();

        let response = app.clone().oneshot(get_request("/history")).await.unwrap();
        let body: HistoryListResponse = json_body(response).await;
        assert_eq!(body.total, 1);
        assert_eq!(body.entries[0].egg_type, "Soft Boiled");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/history/12345")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/history/{}", record.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: HistoryListResponse = json_body(response).await;
        assert_eq!(body.total, 0);

        state.history.append("Custom".to_string(), 90, None);
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/history")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.history.list().is_empty());
    }

    #[tokio::test]
    async fn theme_toggles_between_light_and_dark() {
        let (_dir, _state, app) = test_app();

        let response = app.clone().oneshot(get_request("/theme")).await.unwrap();
        let body: ThemeResponse = json_body(response).await;
        assert_eq!(body.theme, Theme::Light);

        let response = app
            .clone()
            .oneshot(post_request("/theme/toggle"))
            .await
            .unwrap();
        let body: ThemeResponse = json_body(response).await;
        assert_eq!(body.theme, Theme::Dark);

        let response = app.oneshot(get_request("/theme")).await.unwrap();
        let body: ThemeResponse = json_body(response).await;
        assert_eq!(body.theme, Theme::Dark);
    }

    #[tokio::test]
    async fn events_endpoint_streams_server_sent_events() {
        let (_dir, _state, app) = test_app();
        let response = app.oneshot(get_request("/events")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("text/event-stream")
        );
    }
}
