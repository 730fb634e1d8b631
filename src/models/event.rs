//! Inbound GitHub webhook payload shapes.
//!
//! These mirror the slice of the GitHub event JSON this service reads.
//! Unknown fields are ignored by serde, and members GitHub may omit or null
//! out are `Option` so a sparse payload deserializes instead of failing.

use serde::Deserialize;

/// Repository block common to all events.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
}

/// Commit author (or pusher) identity from a push event.
///
/// GitHub's `pusher` object carries `name`/`email` but no `username`, so
/// every field is optional and resolution degrades gracefully.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitAuthor {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

/// One commit from a push event's commit list.
#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    /// Commit sha.
    pub id: String,

    /// Web URL of the commit.
    pub url: String,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub author: Option<CommitAuthor>,
}

/// A `push` event: commits pushed to a branch, or a tag created.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    pub repository: Repository,

    /// Full ref name, `refs/heads/<branch>` or `refs/tags/<tag>`.
    #[serde(rename = "ref")]
    pub ref_name: String,

    /// Commits in delivery order, oldest first.
    #[serde(default)]
    pub commits: Vec<Commit>,

    /// Sha the ref points at after the push. Identifies the tagged commit
    /// for tag pushes.
    #[serde(default)]
    pub after: Option<String>,

    /// Comparison URL for the whole push.
    #[serde(default)]
    pub compare: Option<String>,

    /// Who pushed. Stands in as the author for tag revisions.
    #[serde(default)]
    pub pusher: Option<CommitAuthor>,
}

/// A source-platform account, used only as an identity lookup key.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub login: String,
}

/// Pull request block of a `pull_request` event.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub body: Option<String>,

    pub html_url: String,

    /// Current assignee. `null` when nobody is reviewing.
    #[serde(default)]
    pub assignee: Option<Account>,
}

/// A `pull_request` event.
///
/// Note the two distinct assignee locations: `pull_request.assignee` is the
/// current assignee, while the top-level `assignee` names the account the
/// action was performed on (the person just unassigned, for `unassigned`).
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,

    #[serde(default)]
    pub pull_request: Option<PullRequest>,

    /// Stand-alone assignee the action applies to.
    #[serde(default)]
    pub assignee: Option<Account>,

    /// Changed fields for `edited`, keyed by field name in delivery order.
    #[serde(default)]
    pub changes: Option<serde_json::Map<String, serde_json::Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_push_event() {
        let json = r#"{
            "ref": "refs/heads/main",
            "after": "abc123",
            "compare": "https://github.com/acme/widget-app/compare/1...2",
            "repository": {"name": "widget-app", "full_name": "acme/widget-app"},
            "pusher": {"name": "jane", "email": "jane@example.com"},
            "commits": [
                {
                    "id": "c1",
                    "url": "https://github.com/acme/widget-app/commit/c1",
                    "message": "Fix login #482",
                    "author": {"email": "jane@example.com", "username": "janedev"}
                }
            ]
        }"#;

        let event: PushEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.repository.name, "widget-app");
        assert_eq!(event.ref_name, "refs/heads/main");
        assert_eq!(event.commits.len(), 1);
        let author = event.commits[0].author.as_ref().unwrap();
        assert_eq!(author.username.as_deref(), Some("janedev"));
        // Pusher has no username in GitHub payloads.
        assert!(event.pusher.unwrap().username.is_none());
    }

    #[test]
    fn test_parse_pull_request_event() {
        let json = r#"{
            "action": "unassigned",
            "assignee": {"login": "former-reviewer"},
            "pull_request": {
                "title": "Fix login #482 issue",
                "body": "Details",
                "html_url": "https://github.com/acme/widget-app/pull/7",
                "assignee": {"login": "current-reviewer"}
            }
        }"#;

        let event: PullRequestEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.action, "unassigned");
        assert_eq!(event.assignee.unwrap().login, "former-reviewer");
        let pr = event.pull_request.unwrap();
        assert_eq!(pr.assignee.unwrap().login, "current-reviewer");
    }

    #[test]
    fn test_sparse_pull_request_event() {
        // Missing pull_request, assignee and changes must still deserialize.
        let event: PullRequestEvent =
            serde_json::from_str(r#"{"action": "synchronize"}"#).unwrap();
        assert!(event.pull_request.is_none());
        assert!(event.assignee.is_none());
        assert!(event.changes.is_none());
    }

    #[test]
    fn test_changes_preserve_delivery_order() {
        let json = r#"{
            "action": "edited",
            "changes": {"title": {"from": "a"}, "body": {"from": "b"}}
        }"#;
        let event: PullRequestEvent = serde_json::from_str(json).unwrap();
        let keys: Vec<&String> = event.changes.as_ref().unwrap().keys().collect();
        assert_eq!(keys, ["title", "body"]);
    }
}
