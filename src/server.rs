//! Webhook HTTP listener.
//!
//! Thin transport shell over the dispatcher. Webhooks are fire-and-forget
//! from the sender's perspective: every request is answered `204 No Content`
//! whatever happens, and all error signaling stays in the logs. The body is
//! parsed by hand rather than through an extractor so even unreadable
//! payloads get the no-content answer instead of a framework rejection.

use crate::config::ProjectPolicy;
use crate::services::dispatcher;
use crate::services::tracking_client::TrackingClient;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Shared state for the webhook routes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TrackingClient>,
    pub policy: Arc<ProjectPolicy>,
}

/// Build the webhook router.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/github/commit-hook", post(commit_hook))
        .route("/github/cr-assignment", post(cr_assignment))
        .with_state(state)
}

/// Deserialize an event payload, logging a warning when the shape is off.
fn parse_event<T: DeserializeOwned>(route: &str, body: &[u8]) -> Option<T> {
    match serde_json::from_slice(body) {
        Ok(event) => Some(event),
        Err(e) => {
            log::warn!("[server] {}: malformed payload: {}", route, e);
            None
        }
    }
}

async fn commit_hook(State(state): State<AppState>, body: Bytes) -> StatusCode {
    if let Some(event) = parse_event("commit-hook", &body) {
        if let Err(e) = dispatcher::dispatch_push(state.store.as_ref(), &state.policy, &event).await
        {
            log::error!("[server] push event processing failed: {}", e);
        }
    }
    StatusCode::NO_CONTENT
}

async fn cr_assignment(State(state): State<AppState>, body: Bytes) -> StatusCode {
    if let Some(event) = parse_event("cr-assignment", &body) {
        if let Err(e) = dispatcher::dispatch_pull_request(state.store.as_ref(), &event).await {
            log::error!("[server] pull request event processing failed: {}", e);
        }
    }
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProjectPolicy, TrackerConfig};
    use crate::models::entity::EntityRef;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState {
            store: Arc::new(
                TrackingClient::new(TrackerConfig {
                    base_url: "http://tracker.invalid".to_string(),
                    ..TrackerConfig::default()
                })
                .unwrap(),
            ),
            policy: Arc::new(ProjectPolicy {
                default_project: EntityRef::project(1),
                toolkit_project: EntityRef::project(2),
                toolkit_prefix: "tk-".to_string(),
                bare_label_repo: "tracker".to_string(),
            }),
        }
    }

    async fn post(route: &str, body: &str) -> StatusCode {
        let app = routes(test_state());
        let response = app
            .oneshot(
                Request::post(route)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn unreadable_payload_still_answers_no_content() {
        let status = post("/github/commit-hook", "not json at all").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn wrongly_shaped_payload_still_answers_no_content() {
        let status = post("/github/commit-hook", r#"{"ref": 5}"#).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn unhandled_action_answers_no_content() {
        // "closed" is outside the handled actions, so no remote call is
        // attempted and the sender still gets its acknowledgement.
        let status = post("/github/cr-assignment", r#"{"action": "closed"}"#).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
