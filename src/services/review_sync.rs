//! Code-review synchronization for pull-request events.
//!
//! Projects assignment, unassignment and edit actions onto ticket field
//! mutations and replies. Every flow tolerates an unresolvable identity as
//! a logged no-op; none of them ever creates or deletes a ticket. Replayed
//! events are applied again, not deduplicated.

use crate::error::AppError;
use crate::models::entity::{MultiValueOp, TicketUpdate, User, STATUS_CODE_REVIEW};
use crate::models::event::{Account, PullRequest};
use crate::services::identity;
use crate::services::reply::{AssignedReply, EditedReply};
use crate::services::tracking_client::TrackingStore;

/// A code review was assigned: mark the ticket pending code review, add the
/// reviewer to the code-review association, and post the details as a reply.
pub async fn handle_assigned(
    store: &dyn TrackingStore,
    ticket_id: i64,
    pr: &PullRequest,
) -> Result<(), AppError> {
    let Some(user) = resolve_assignee(store, pr.assignee.as_ref()).await? else {
        return Ok(());
    };

    let update = TicketUpdate {
        status: Some(STATUS_CODE_REVIEW.to_string()),
        code_review: vec![user.entity_ref()],
    };
    store
        .update_ticket(ticket_id, update, MultiValueOp::Add)
        .await?;

    let text = AssignedReply {
        reviewer: &user.name,
        url: &pr.html_url,
        title: &pr.title,
        body: pr.body.as_deref().unwrap_or(""),
    }
    .render();
    store.create_reply(ticket_id, &text).await?;

    log::info!(
        "[review] ticket {}: code review assigned to {}",
        ticket_id,
        user.name
    );
    Ok(())
}

/// A code review was unassigned: remove that user from the code-review
/// association. No status change, no reply.
///
/// The identity comes from the event's stand-alone assignee field, not from
/// the pull request's own assignee (which already reflects the removal).
pub async fn handle_unassigned(
    store: &dyn TrackingStore,
    ticket_id: i64,
    event_assignee: Option<&Account>,
) -> Result<(), AppError> {
    let Some(user) = resolve_assignee(store, event_assignee).await? else {
        return Ok(());
    };

    let update = TicketUpdate {
        status: None,
        code_review: vec![user.entity_ref()],
    };
    store
        .update_ticket(ticket_id, update, MultiValueOp::Remove)
        .await?;

    log::info!(
        "[review] ticket {}: code review unassigned from {}",
        ticket_id,
        user.name
    );
    Ok(())
}

/// An assigned pull request was edited: tell the current reviewer which
/// fields changed by posting a reply with the updated title and body.
///
/// Edits on a pull request nobody is reviewing are not reported.
pub async fn handle_edited(
    store: &dyn TrackingStore,
    ticket_id: i64,
    pr: &PullRequest,
    changes: Option<&serde_json::Map<String, serde_json::Value>>,
) -> Result<(), AppError> {
    if pr.assignee.is_none() {
        log::debug!("[review] ticket {}: edit with no assignee, skipping", ticket_id);
        return Ok(());
    }
    let Some(user) = resolve_assignee(store, pr.assignee.as_ref()).await? else {
        return Ok(());
    };

    let Some(changes) = changes else {
        log::warn!("[review] ticket {}: edit without change set, skipping", ticket_id);
        return Ok(());
    };
    let changed_fields: Vec<String> = changes.keys().cloned().collect();

    let text = EditedReply {
        reviewer: &user.name,
        url: &pr.html_url,
        changed_fields: &changed_fields,
        title: &pr.title,
        body: pr.body.as_deref().unwrap_or(""),
    }
    .render();
    store.create_reply(ticket_id, &text).await?;

    log::info!(
        "[review] ticket {}: posted edit notification ({})",
        ticket_id,
        changed_fields.join(", ")
    );
    Ok(())
}

/// Resolve an optional assignee account, logging the expected misses.
async fn resolve_assignee(
    store: &dyn TrackingStore,
    account: Option<&Account>,
) -> Result<Option<User>, AppError> {
    let Some(account) = account else {
        log::info!("[review] no assignee on event, skipping");
        return Ok(None);
    };
    let user = identity::resolve_by_login(store, &account.login).await?;
    if user.is_none() {
        log::info!("[review] no tracker user for login: {}", account.login);
    }
    Ok(user)
}
