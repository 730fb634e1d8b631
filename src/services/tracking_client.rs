//! Tracking-system API client.
//!
//! Single point of remote connectivity. The client is constructed explicitly
//! and passed by reference; there is no process-wide handle. A session token
//! is acquired lazily on first use and cached; an expired session is cleared
//! and re-acquired once per request, so reconnecting is idempotent.

use crate::config::TrackerConfig;
use crate::error::AppError;
use crate::models::entity::{EntityRef, MultiValueOp, RevisionDraft, TicketUpdate, User, UserField};
use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;

/// Remote operations the synchronizers need.
///
/// `TrackingClient` is the production implementation; tests substitute a
/// recording double to assert call counts and payloads.
#[async_trait]
pub trait TrackingStore: Send + Sync {
    /// Find the single user whose `field` equals `value`.
    async fn find_user(&self, field: UserField, value: &str) -> Result<Option<User>, AppError>;

    /// Find a component by name within a project. Absence is tolerated.
    async fn find_component(
        &self,
        name: &str,
        project: &EntityRef,
    ) -> Result<Option<EntityRef>, AppError>;

    /// Apply a field mutation to a ticket. `mode` selects add/remove
    /// semantics for the multi-valued code-review association.
    async fn update_ticket(
        &self,
        ticket_id: i64,
        update: TicketUpdate,
        mode: MultiValueOp,
    ) -> Result<(), AppError>;

    /// Append a reply to a ticket.
    async fn create_reply(&self, ticket_id: i64, content: &str) -> Result<EntityRef, AppError>;

    /// Create an immutable revision record.
    async fn create_revision(&self, draft: &RevisionDraft) -> Result<EntityRef, AppError>;
}

/// Reqwest-backed client for the tracking system's entity API.
#[derive(Debug)]
pub struct TrackingClient {
    client: Client,
    config: TrackerConfig,
    /// Cached session token, `None` until the first authenticated request.
    session: Mutex<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    data: EntityRef,
}

impl TrackingClient {
    /// Create a new client. No connection is made until the first request.
    pub fn new(config: TrackerConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            session: Mutex::new(None),
        })
    }

    /// Get the base URL for API requests.
    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/v1{}",
            self.config.base_url.trim_end_matches('/'),
            path
        )
    }

    /// Return the cached session token, authenticating first if necessary.
    async fn session_token(&self) -> Result<String, AppError> {
        let mut session = self.session.lock().await;
        if let Some(token) = session.as_ref() {
            return Ok(token.clone());
        }

        log::debug!("[tracker] acquiring session token");
        let url = self.api_url("/auth/access_token");
        let response = self
            .client
            .post(&url)
            .json(&json!({
                "script_name": self.config.script_name,
                "api_key": self.config.api_key,
            }))
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AppError::authentication(
                "Tracker rejected the script credentials",
            ));
        }
        let token = self
            .handle_response::<AccessTokenResponse>(response, "/auth/access_token")
            .await?
            .access_token;

        *session = Some(token.clone());
        Ok(token)
    }

    /// Drop the cached session so the next request re-authenticates.
    async fn clear_session(&self) {
        *self.session.lock().await = None;
    }

    /// Send an authenticated request, re-authenticating once on 401.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<Response, AppError> {
        let url = self.api_url(path);
        let mut retried = false;

        loop {
            let token = self.session_token().await?;
            let response = self
                .client
                .request(method.clone(), &url)
                .bearer_auth(&token)
                .json(body)
                .send()
                .await?;

            if response.status() == StatusCode::UNAUTHORIZED && !retried {
                log::debug!("[tracker] session expired, reconnecting");
                self.clear_session().await;
                retried = true;
                continue;
            }
            return Ok(response);
        }
    }

    /// Handle API response errors.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        endpoint: &str,
    ) -> Result<T, AppError> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| AppError::internal(format!("Failed to parse response: {}", e)))
        } else if status == StatusCode::UNAUTHORIZED {
            Err(AppError::authentication(
                "Tracker session expired or revoked",
            ))
        } else {
            let status_code = status.as_u16();
            let body = response.text().await.unwrap_or_default();
            let body_message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| {
                    v.get("message")
                        .or_else(|| v.get("error"))
                        .map(|m| match m.as_str() {
                            Some(s) => s.to_string(),
                            None => m.to_string(),
                        })
                });

            let message = match (status, &body_message) {
                (StatusCode::FORBIDDEN, _) => "Access denied".to_string(),
                (StatusCode::NOT_FOUND, _) => "Resource not found".to_string(),
                (_, Some(msg)) => msg.clone(),
                _ => format!("Request failed ({}): {}", status_code, body),
            };

            Err(AppError::tracker_api_full(message, status_code, endpoint))
        }
    }

    /// Find at most one entity of `entity_type` matching the filters.
    async fn find_one<T: DeserializeOwned>(
        &self,
        entity_type: &str,
        filters: serde_json::Value,
        fields: &[&str],
    ) -> Result<Option<T>, AppError> {
        let endpoint = format!("/entity/{}/_search", entity_type);
        let body = json!({
            "filters": filters,
            "fields": fields,
            "limit": 1,
        });
        let response = self.request(Method::POST, &endpoint, &body).await?;
        let found: SearchResponse<T> = self.handle_response(response, &endpoint).await?;
        Ok(found.data.into_iter().next())
    }
}

/// Build an `[field, "is", value]` filter clause.
fn is_filter(field: &str, value: &str) -> serde_json::Value {
    json!([field, "is", value])
}

#[async_trait]
impl TrackingStore for TrackingClient {
    async fn find_user(&self, field: UserField, value: &str) -> Result<Option<User>, AppError> {
        self.find_one(
            "human_users",
            json!([is_filter(field.api_name(), value)]),
            &["name"],
        )
        .await
    }

    async fn find_component(
        &self,
        name: &str,
        project: &EntityRef,
    ) -> Result<Option<EntityRef>, AppError> {
        self.find_one(
            "components",
            json!([
                is_filter("code", name),
                ["project", "is", project],
            ]),
            &[],
        )
        .await
    }

    async fn update_ticket(
        &self,
        ticket_id: i64,
        update: TicketUpdate,
        mode: MultiValueOp,
    ) -> Result<(), AppError> {
        let endpoint = format!("/entity/tickets/{}", ticket_id);
        let body = json!({
            "fields": update,
            "multi_entity_update_modes": {"code_review": mode},
        });
        let response = self.request(Method::PUT, &endpoint, &body).await?;
        let status = response.status();
        if status.is_success() {
            log::debug!("[tracker] updated ticket {}", ticket_id);
            Ok(())
        } else {
            self.handle_response::<serde_json::Value>(response, &endpoint)
                .await
                .map(|_| ())
        }
    }

    async fn create_reply(&self, ticket_id: i64, content: &str) -> Result<EntityRef, AppError> {
        let endpoint = "/entity/replies";
        let body = json!({
            "fields": {
                "entity": EntityRef::ticket(ticket_id),
                "content": content,
            }
        });
        let response = self.request(Method::POST, endpoint, &body).await?;
        let created: CreatedResponse = self.handle_response(response, endpoint).await?;
        log::debug!("[tracker] added reply {} to ticket {}", created.data.id, ticket_id);
        Ok(created.data)
    }

    async fn create_revision(&self, draft: &RevisionDraft) -> Result<EntityRef, AppError> {
        let endpoint = "/entity/revisions";
        let body = json!({ "fields": draft });
        let response = self.request(Method::POST, endpoint, &body).await?;
        let created: CreatedResponse = self.handle_response(response, endpoint).await?;
        Ok(created.data)
    }
}
