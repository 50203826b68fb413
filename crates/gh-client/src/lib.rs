//! GitHub API client for the issue relay
//!
//! This crate provides a trait-based GitHub API client. The relay talks to
//! the `GitHubClient` trait only; `OctocrabClient` is the production
//! implementation and tests plug in their own.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GitHubClient trait                  │
//! │  - list_org_repositories()                       │
//! │  - list_issues()                                 │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!              ┌─────────────────┐
//!              │ OctocrabClient  │
//!              │ (direct API)    │
//!              └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::{GitHubClient, IssueQuery, OctocrabClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = OctocrabClient::from_token("token")?;
//!
//! let page = client.list_org_repositories("kubernetes", 1, 100).await?;
//! let since = chrono::Utc::now() - chrono::Duration::minutes(30);
//! for repo in page.repositories {
//!     let query = IssueQuery::open_with_label("help wanted", since);
//!     let issues = client.list_issues(&repo.owner, &repo.name, &query).await?;
//!     println!("{}: {} issues", repo.full_name(), issues.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod octocrab_client;
pub mod types;

pub use client::GitHubClient;
pub use issue_relay_config::MAX_PER_PAGE;
pub use octocrab_client::OctocrabClient;
pub use types::{Issue, IssueQuery, IssueState, Repository, RepositoryPage};
