//! GitHub client trait
//!
//! This module defines the `GitHubClient` trait that all client
//! implementations must satisfy. The relay only depends on this trait,
//! so tests can substitute an in-memory implementation.

use crate::types::{Issue, IssueQuery, RepositoryPage};
use async_trait::async_trait;

/// GitHub API client trait
///
/// Defines the read-only slice of the GitHub API the relay needs.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::{GitHubClient, IssueQuery};
///
/// async fn count_open(client: &dyn GitHubClient, since: chrono::DateTime<chrono::Utc>) -> anyhow::Result<usize> {
///     let query = IssueQuery::open_with_label("help wanted", since);
///     Ok(client.list_issues("kubernetes", "kubectl", &query).await?.len())
/// }
/// ```
#[async_trait]
pub trait GitHubClient: Send + Sync {
    /// List one page of an organization's repositories
    ///
    /// # Arguments
    ///
    /// * `org` - Organization login
    /// * `page` - 1-based page number
    /// * `per_page` - Page size (GitHub caps this at 100)
    ///
    /// # Returns
    ///
    /// The repositories on the page and whether another page follows.
    async fn list_org_repositories(
        &self,
        org: &str,
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<RepositoryPage>;

    /// List issues of a repository matching `query`
    ///
    /// Implementations follow pagination themselves and return every
    /// matching issue in API order.
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `query` - Label, state and `since` filter
    async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        query: &IssueQuery,
    ) -> anyhow::Result<Vec<Issue>>;
}
