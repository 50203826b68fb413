//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait using the octocrab library.

use crate::client::GitHubClient;
use crate::types::{Issue, IssueQuery, IssueState, Repository, RepositoryPage};
use crate::MAX_PER_PAGE;
use anyhow::Context;
use async_trait::async_trait;
use log::debug;
use octocrab::Octocrab;
use std::sync::Arc;

/// Direct GitHub API client using octocrab
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// Build an authenticated client for github.com from a personal access token
    pub fn from_token(token: impl Into<String>) -> anyhow::Result<Self> {
        let token: String = token.into();
        let octocrab = Octocrab::builder()
            .personal_token(token)
            .build()
            .context("Failed to build Octocrab client")?;
        Ok(Self::new(Arc::new(octocrab)))
    }
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn list_org_repositories(
        &self,
        org: &str,
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<RepositoryPage> {
        debug!("Fetching repositories for org {} (page {})", org, page);

        let orgs = self.octocrab.orgs(org);
        let response = orgs
            .list_repos()
            .per_page(per_page)
            .page(page)
            .send()
            .await
            .with_context(|| format!("Failed to list repositories for org {}", org))?;

        let has_next_page = response.next.is_some();
        let repositories = response
            .items
            .into_iter()
            .map(|repo| convert_repository(org, &repo))
            .collect();

        Ok(RepositoryPage {
            repositories,
            has_next_page,
        })
    }

    async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        query: &IssueQuery,
    ) -> anyhow::Result<Vec<Issue>> {
        debug!(
            "Fetching '{}' issues for {}/{} since {}",
            query.label, owner, repo, query.since
        );

        let labels = vec![query.label.clone()];
        let mut issues = Vec::new();
        let mut page_num = 1u32;

        loop {
            let handler = self.octocrab.issues(owner, repo);
            let page = handler
                .list()
                .state(convert_state_param(query.state))
                .labels(&labels)
                .since(query.since)
                .per_page(MAX_PER_PAGE)
                .page(page_num)
                .send()
                .await
                .with_context(|| format!("Failed to list issues for {}/{}", owner, repo))?;

            let page_is_empty = page.items.is_empty();
            let has_next = page.next.is_some();
            issues.extend(page.items.iter().map(convert_issue));

            if page_is_empty || !has_next {
                break;
            }

            page_num += 1;
        }

        debug!("Fetched {} issues for {}/{}", issues.len(), owner, repo);
        Ok(issues)
    }
}

/// Convert octocrab Repository to our Repository type
fn convert_repository(org: &str, repo: &octocrab::models::Repository) -> Repository {
    let owner = repo
        .owner
        .as_ref()
        .map(|o| o.login.clone())
        .unwrap_or_else(|| org.to_string());
    Repository::new(owner, repo.name.clone())
}

/// Convert octocrab Issue to our Issue type
fn convert_issue(issue: &octocrab::models::issues::Issue) -> Issue {
    Issue {
        number: issue.number,
        title: issue.title.clone(),
        html_url: issue.html_url.to_string(),
        state: convert_issue_state(&issue.state),
        created_at: issue.created_at,
        labels: issue.labels.iter().map(|l| l.name.clone()).collect(),
    }
}

/// Convert octocrab IssueState to our IssueState
fn convert_issue_state(state: &octocrab::models::IssueState) -> IssueState {
    match state {
        octocrab::models::IssueState::Open => IssueState::Open,
        octocrab::models::IssueState::Closed => IssueState::Closed,
        _ => IssueState::Closed,
    }
}

/// Map our IssueState to octocrab's list filter parameter
fn convert_state_param(state: IssueState) -> octocrab::params::State {
    match state {
        IssueState::Open => octocrab::params::State::Open,
        IssueState::Closed => octocrab::params::State::Closed,
    }
}
