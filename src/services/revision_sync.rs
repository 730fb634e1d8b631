//! Revision synchronization for push events.
//!
//! Converts a push event into immutable revision records: one per commit
//! for branch pushes, exactly one synthetic revision for tag pushes.
//! A revision-creation failure is logged with full context and re-raised,
//! aborting the rest of the event; operators must notice gaps in the
//! historical revision trail.

use crate::config::ProjectPolicy;
use crate::error::AppError;
use crate::models::entity::{Attachment, EntityRef, RevisionDraft};
use crate::models::event::{Commit, CommitAuthor, PushEvent};
use crate::services::identity;
use crate::services::tracking_client::TrackingStore;

/// What a push event's ref points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitRef<'a> {
    Branch(&'a str),
    Tag(&'a str),
    Other,
}

/// Classify a full ref name.
pub fn classify_ref(ref_name: &str) -> GitRef<'_> {
    if let Some(branch) = ref_name.strip_prefix("refs/heads/") {
        GitRef::Branch(branch)
    } else if let Some(tag) = ref_name.strip_prefix("refs/tags/") {
        GitRef::Tag(tag)
    } else {
        GitRef::Other
    }
}

/// Project a push event onto revision records.
pub async fn handle_push(
    store: &dyn TrackingStore,
    policy: &ProjectPolicy,
    event: &PushEvent,
) -> Result<(), AppError> {
    let repo = &event.repository.name;
    let project = policy.project_for_repo(repo);

    match classify_ref(&event.ref_name) {
        GitRef::Branch(branch) => {
            log::info!(
                "[push] {} commit(s) on {}/{}",
                event.commits.len(),
                repo,
                branch
            );
            for commit in &event.commits {
                if let Err(e) = sync_commit(store, policy, &project, repo, branch, commit).await {
                    log::error!(
                        "[push] commit {}: create revision failed: {}",
                        commit.id,
                        e
                    );
                    return Err(e);
                }
            }
            Ok(())
        }
        GitRef::Tag(tag) => {
            log::info!("[push] tag {} on {}", tag, repo);
            if let Err(e) = sync_tag(store, policy, &project, repo, tag, event).await {
                log::error!("[push] tag {}: create revision failed: {}", tag, e);
                return Err(e);
            }
            Ok(())
        }
        GitRef::Other => {
            log::warn!("[push] unhandled ref: {}", event.ref_name);
            Ok(())
        }
    }
}

/// Create one revision for one commit on a branch.
async fn sync_commit(
    store: &dyn TrackingStore,
    policy: &ProjectPolicy,
    project: &EntityRef,
    repo: &str,
    branch: &str,
    commit: &Commit,
) -> Result<(), AppError> {
    let draft = build_draft(
        store,
        policy,
        project,
        repo,
        branch,
        &commit.id,
        &commit.message,
        &commit.url,
        commit.author.as_ref(),
    )
    .await?;

    let revision = store.create_revision(&draft).await?;
    log::info!(
        "[push] created revision {} for commit {}",
        revision.id,
        commit.id
    );
    Ok(())
}

/// Create the single synthetic revision for a tag push.
///
/// The tagged commit sha and comparison URL identify the revision; the
/// pusher stands in as the author. A payload missing either sha or URL is
/// dropped with a warning rather than failing the event.
async fn sync_tag(
    store: &dyn TrackingStore,
    policy: &ProjectPolicy,
    project: &EntityRef,
    repo: &str,
    tag: &str,
    event: &PushEvent,
) -> Result<(), AppError> {
    let (Some(after), Some(compare)) = (event.after.as_deref(), event.compare.as_deref()) else {
        log::warn!("[push] tag {} payload missing after/compare, skipping", tag);
        return Ok(());
    };

    let description = format!("Tag \"{}\" created", tag);
    let pusher = event.pusher.clone().unwrap_or_default();
    let draft = build_draft(
        store,
        policy,
        project,
        repo,
        tag,
        after,
        &description,
        compare,
        Some(&pusher),
    )
    .await?;

    let revision = store.create_revision(&draft).await?;
    log::info!("[push] created revision {} for tag {}", revision.id, tag);
    Ok(())
}

/// Assemble revision fields, resolving author and component best-effort.
#[allow(clippy::too_many_arguments)]
async fn build_draft(
    store: &dyn TrackingStore,
    policy: &ProjectPolicy,
    project: &EntityRef,
    repo: &str,
    branch: &str,
    code: &str,
    description: &str,
    url: &str,
    author: Option<&CommitAuthor>,
) -> Result<RevisionDraft, AppError> {
    let created_by = match author {
        Some(author) => {
            let user = identity::resolve_commit_author(store, author).await?;
            if user.is_none() {
                log::info!("[push] no tracker user for commit author on {}", code);
            }
            user.map(|u| u.entity_ref())
        }
        None => None,
    };

    let component = store.find_component(repo, project).await?;

    Ok(RevisionDraft {
        project: project.clone(),
        code: code.to_string(),
        description: description.to_string(),
        attachment: Attachment::github(url),
        branch: policy.branch_label(repo, branch),
        component,
        created_by,
    })
}
