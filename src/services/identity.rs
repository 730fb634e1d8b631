//! Identity resolution.
//!
//! Maps source-platform account identities (login handles and commit author
//! emails) onto tracking-system user records. Users are only ever resolved,
//! never created; an unresolvable identity is an expected outcome.

use crate::error::AppError;
use crate::models::entity::{User, UserField};
use crate::models::event::CommitAuthor;
use crate::services::tracking_client::TrackingStore;

/// Resolve a user by their stored source-platform login.
///
/// An empty login short-circuits to `None` without a remote call.
pub async fn resolve_by_login(
    store: &dyn TrackingStore,
    login: &str,
) -> Result<Option<User>, AppError> {
    if login.is_empty() {
        return Ok(None);
    }
    store.find_user(UserField::Login, login).await
}

/// Resolve a commit author to a user record.
///
/// Tries the author's email against the primary email field, then against
/// the stored source-platform email field, then falls back to a login
/// lookup when the author carries one. First match wins.
pub async fn resolve_commit_author(
    store: &dyn TrackingStore,
    author: &CommitAuthor,
) -> Result<Option<User>, AppError> {
    if let Some(email) = author.email.as_deref().filter(|e| !e.is_empty()) {
        if let Some(user) = store.find_user(UserField::Email, email).await? {
            return Ok(Some(user));
        }
        if let Some(user) = store.find_user(UserField::ExternalEmail, email).await? {
            return Ok(Some(user));
        }
    }

    match author.username.as_deref() {
        Some(login) => resolve_by_login(store, login).await,
        None => Ok(None),
    }
}
