//! Event dispatch.
//!
//! Entry points the transport shell calls with already-parsed event
//! payloads. The dispatcher inspects the declared action or ref type,
//! checks the shared preconditions once, and routes to the matching
//! synchronizer. Events it cannot act on are logged and dropped; a missing
//! payload member is a tolerated no-op, never a panic.

use crate::config::ProjectPolicy;
use crate::error::AppError;
use crate::models::event::{PullRequestEvent, PushEvent};
use crate::services::tracking_client::TrackingStore;
use crate::services::{review_sync, revision_sync, ticket_ref};

/// Pull-request actions this service reacts to.
pub const VALID_CR_ACTIONS: &[&str] = &["assigned", "unassigned", "edited"];

/// Route a pull-request event to the code-review synchronizer.
pub async fn dispatch_pull_request(
    store: &dyn TrackingStore,
    event: &PullRequestEvent,
) -> Result<(), AppError> {
    let action = event.action.as_str();
    if !VALID_CR_ACTIONS.contains(&action) {
        log::debug!("[dispatch] ignoring pull request action: {}", action);
        return Ok(());
    }

    let Some(pr) = event.pull_request.as_ref() else {
        log::info!("[dispatch] no pull request data received, skipping");
        return Ok(());
    };

    let Some(ticket_id) = ticket_ref::parse_ticket_ref(&pr.title) else {
        log::info!(
            "[dispatch] no ticket reference in PR title: {:?}",
            pr.title
        );
        return Ok(());
    };

    match action {
        "assigned" => review_sync::handle_assigned(store, ticket_id, pr).await,
        "unassigned" => {
            review_sync::handle_unassigned(store, ticket_id, event.assignee.as_ref()).await
        }
        "edited" => {
            review_sync::handle_edited(store, ticket_id, pr, event.changes.as_ref()).await
        }
        _ => Ok(()),
    }
}

/// Route a push event to the revision synchronizer.
pub async fn dispatch_push(
    store: &dyn TrackingStore,
    policy: &ProjectPolicy,
    event: &PushEvent,
) -> Result<(), AppError> {
    revision_sync::handle_push(store, policy, event).await
}
