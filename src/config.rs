//! Environment-based configuration.
//!
//! The service is configured entirely through environment variables, read
//! once at startup. Project selection policy is a static table built from
//! the configured project ids; it is never looked up remotely.

use crate::error::AppError;
use crate::models::entity::EntityRef;
use std::env;

/// Tracking-system API client configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Base URL of the tracking-system instance (e.g., `https://tracker.example.com`).
    pub base_url: String,

    /// Script (service account) name used for authentication.
    pub script_name: String,

    /// API key paired with the script name.
    pub api_key: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            script_name: String::new(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Static mapping from repository names to tracking-system projects.
///
/// Repository names carrying the toolkit prefix belong to the toolkit
/// project; everything else belongs to the default project. The tracking
/// system's own repository is a named exception whose revisions are labeled
/// with the bare branch name instead of `repo/branch`.
#[derive(Debug, Clone)]
pub struct ProjectPolicy {
    /// Project for repositories without a more specific rule.
    pub default_project: EntityRef,

    /// Project for toolkit repositories.
    pub toolkit_project: EntityRef,

    /// Repository-name prefix selecting the toolkit project.
    pub toolkit_prefix: String,

    /// Repository whose branch labels omit the `repo/` prefix.
    pub bare_label_repo: String,
}

impl ProjectPolicy {
    /// Select the project a repository's revisions belong to.
    pub fn project_for_repo(&self, repo: &str) -> EntityRef {
        if repo.starts_with(&self.toolkit_prefix) {
            self.toolkit_project.clone()
        } else {
            self.default_project.clone()
        }
    }

    /// Build the branch label recorded on a revision.
    pub fn branch_label(&self, repo: &str, branch: &str) -> String {
        if repo == self.bare_label_repo {
            branch.to_string()
        } else {
            format!("{}/{}", repo, branch)
        }
    }
}

/// Full service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the webhook listener binds to.
    pub bind_addr: String,

    /// Tracking-system client settings.
    pub tracker: TrackerConfig,

    /// Repository-to-project mapping.
    pub projects: ProjectPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required: `TRACKER_BASE_URL`, `TRACKER_SCRIPT_NAME`, `TRACKER_API_KEY`,
    /// `TRACKER_DEFAULT_PROJECT_ID`, `TRACKER_TOOLKIT_PROJECT_ID`.
    /// Optional: `BIND_ADDR` (default `0.0.0.0:8080`).
    pub fn from_env() -> Result<Self, AppError> {
        let tracker = TrackerConfig {
            base_url: require("TRACKER_BASE_URL")?,
            script_name: require("TRACKER_SCRIPT_NAME")?,
            api_key: require("TRACKER_API_KEY")?,
            ..TrackerConfig::default()
        };

        let projects = ProjectPolicy {
            default_project: EntityRef::project(require_id("TRACKER_DEFAULT_PROJECT_ID")?),
            toolkit_project: EntityRef::project(require_id("TRACKER_TOOLKIT_PROJECT_ID")?),
            toolkit_prefix: "tk-".to_string(),
            bare_label_repo: "tracker".to_string(),
        };

        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            tracker,
            projects,
        })
    }
}

fn require(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::invalid_input(format!("missing environment variable {}", name)))
}

fn require_id(name: &str) -> Result<i64, AppError> {
    require(name)?
        .parse()
        .map_err(|_| AppError::invalid_input(format!("{} must be an integer id", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ProjectPolicy {
        ProjectPolicy {
            default_project: EntityRef::project(1),
            toolkit_project: EntityRef::project(2),
            toolkit_prefix: "tk-".to_string(),
            bare_label_repo: "tracker".to_string(),
        }
    }

    #[test]
    fn test_project_selection_by_prefix() {
        let policy = policy();
        assert_eq!(policy.project_for_repo("tk-core").id, 2);
        assert_eq!(policy.project_for_repo("widget-app").id, 1);
        // The prefix must be a prefix, not a substring.
        assert_eq!(policy.project_for_repo("network-tk-tools").id, 1);
    }

    #[test]
    fn test_branch_label() {
        let policy = policy();
        assert_eq!(policy.branch_label("widget-app", "main"), "widget-app/main");
        assert_eq!(policy.branch_label("tracker", "main"), "main");
    }
}
