//! Data models.
//!
//! Split along the system boundary: `event` holds the inbound GitHub webhook
//! payload shapes (deserialization only), `entity` holds the remote
//! tracking-system entities and the drafts this service creates.

pub mod entity;
pub mod event;

// Re-exports for convenient access
pub use entity::{
    Attachment, EntityRef, MultiValueOp, RevisionDraft, TicketUpdate, User, UserField,
    STATUS_CODE_REVIEW,
};
pub use event::{Account, Commit, CommitAuthor, PullRequest, PullRequestEvent, PushEvent, Repository};
