//! Tracking-system entity models.
//!
//! Entities live in the remote tracking system; this service only reads
//! users/components and creates replies/revisions or mutates ticket fields.
//! Drafts serialize straight into the entity API's `fields` payload.

use serde::{Deserialize, Serialize};

/// Ticket status value meaning "pending code review".
pub const STATUS_CODE_REVIEW: &str = "code";

/// Reference to a remote entity, `{"type": ..., "id": ...}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(rename = "type")]
    pub kind: String,

    pub id: i64,
}

impl EntityRef {
    pub fn new(kind: impl Into<String>, id: i64) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }

    /// Reference to a project entity.
    pub fn project(id: i64) -> Self {
        Self::new("Project", id)
    }

    /// Reference to a ticket entity.
    pub fn ticket(id: i64) -> Self {
        Self::new("Ticket", id)
    }
}

/// Internal user record, resolved (never created) by this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Display name, used in reply text.
    pub name: String,
}

impl User {
    /// Reference usable in entity association fields.
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new("HumanUser", self.id)
    }
}

/// User lookup key for identity resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    /// The stored source-platform login handle.
    Login,
    /// The user's primary email address.
    Email,
    /// The stored source-platform email address.
    ExternalEmail,
}

impl UserField {
    /// Field name in the tracking system's user schema.
    pub fn api_name(&self) -> &'static str {
        match self {
            Self::Login => "github_login",
            Self::Email => "email",
            Self::ExternalEmail => "github_email",
        }
    }
}

/// How an update applies to a multi-valued association field.
///
/// The remote store applies add/remove natively; this is not a
/// read-modify-write merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiValueOp {
    Add,
    Remove,
}

/// Field mutation applied to a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketUpdate {
    /// New status value, untouched when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Users added to or removed from the code-review association,
    /// depending on the accompanying [`MultiValueOp`].
    pub code_review: Vec<EntityRef>,
}

/// Link back to the source platform stored on a revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub name: String,
    pub url: String,
}

impl Attachment {
    /// Attachment pointing at a GitHub URL.
    pub fn github(url: impl Into<String>) -> Self {
        Self {
            name: "GitHub".to_string(),
            url: url.into(),
        }
    }
}

/// Fields for a revision entity about to be created.
///
/// One draft per commit, or one per tag-creation event. Optional fields are
/// omitted from the payload entirely when absent; the tracking system treats
/// a missing author or component as acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionDraft {
    pub project: EntityRef,

    /// Commit sha or tag identity.
    pub code: String,

    /// Commit message or synthesized tag description.
    pub description: String,

    pub attachment: Attachment,

    /// Branch label, usually `repo/branch`.
    pub branch: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<EntityRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<EntityRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ref_wire_shape() {
        let json = serde_json::to_value(EntityRef::ticket(482)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Ticket", "id": 482}));
    }

    #[test]
    fn test_multi_value_op_serialization() {
        assert_eq!(serde_json::to_value(MultiValueOp::Add).unwrap(), "add");
        assert_eq!(serde_json::to_value(MultiValueOp::Remove).unwrap(), "remove");
    }

    #[test]
    fn test_ticket_update_omits_untouched_status() {
        let update = TicketUpdate {
            status: None,
            code_review: vec![EntityRef::new("HumanUser", 7)],
        };
        let json = serde_json::to_value(&update).unwrap();
        assert!(json.get("status").is_none());
        assert_eq!(json["code_review"][0]["id"], 7);
    }

    #[test]
    fn test_revision_draft_omits_absent_optionals() {
        let draft = RevisionDraft {
            project: EntityRef::project(1),
            code: "abc123".to_string(),
            description: "Fix login".to_string(),
            attachment: Attachment::github("https://github.com/acme/widget-app/commit/abc123"),
            branch: "widget-app/main".to_string(),
            component: None,
            created_by: None,
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("component").is_none());
        assert!(json.get("created_by").is_none());
        assert_eq!(json["attachment"]["name"], "GitHub");
    }
}
