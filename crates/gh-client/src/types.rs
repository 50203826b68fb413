//! GitHub API data transfer objects
//!
//! These types represent the subset of GitHub data the relay consumes.
//! They are intentionally separate from octocrab's models so callers
//! (and their test doubles) never need to construct octocrab types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A repository belonging to an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Owning organization (or user) login
    pub owner: String,

    /// Repository name without the owner prefix
    pub name: String,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// One page of an organization's repository listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryPage {
    /// Repositories on this page, in API order
    pub repositories: Vec<Repository>,

    /// Whether GitHub advertised a following page
    pub has_next_page: bool,
}

/// Issue state as reported by GitHub
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    /// Issue is open
    #[default]
    Open,
    /// Issue has been closed
    Closed,
}

/// An issue from the GitHub API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number (e.g., 123)
    pub number: u64,

    /// Issue title
    pub title: String,

    /// Issue URL for opening in browser
    pub html_url: String,

    /// Current state
    pub state: IssueState,

    /// When the issue was created
    pub created_at: DateTime<Utc>,

    /// Label names attached to the issue
    pub labels: Vec<String>,
}

/// Filter for listing issues of a single repository
///
/// GitHub's `since` parameter filters on the last update time, not on
/// creation time, so callers that care about creation must re-check
/// `Issue::created_at` themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueQuery {
    /// Only issues carrying this label
    pub label: String,

    /// Only issues updated at or after this instant
    pub since: DateTime<Utc>,

    /// Only issues in this state
    pub state: IssueState,
}

impl IssueQuery {
    /// Open issues with `label`, touched since `since`
    pub fn open_with_label(label: impl Into<String>, since: DateTime<Utc>) -> Self {
        Self {
            label: label.into(),
            since,
            state: IssueState::Open,
        }
    }
}
