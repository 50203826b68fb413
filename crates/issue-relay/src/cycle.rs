//! Scan-and-notify cycle
//!
//! One cycle walks every configured organization, lists its repositories
//! page by page, queries labeled open issues per repository, keeps the
//! ones created inside the trailing window and posts a single summary.
//!
//! Failure policy:
//! - listing an organization's repositories fails → the whole cycle aborts,
//!   nothing is sent
//! - listing one repository's issues fails → logged, repository skipped
//! - posting the summary fails → logged, cycle still succeeds

use chrono::{DateTime, Utc};
use gh_client::{GitHubClient, Issue, IssueQuery, IssueState};
use issue_relay_config::ScanConfig;
use log::{debug, error, info, warn};
use slack_client::ChatNotifier;
use thiserror::Error;

use crate::message::format_message;

/// Fatal cycle errors
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("failed to list repositories for organization {organization} (page {page}): {reason:#}")]
    RepositoryListing {
        organization: String,
        page: u32,
        reason: anyhow::Error,
    },
}

/// What happened to the summary message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// No matching issues, nothing was posted
    NothingToSend,
    /// The summary was posted
    Delivered,
    /// Posting failed with the given reason
    Failed(String),
}

/// Summary of a completed cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub since: DateTime<Utc>,
    pub organizations_scanned: usize,
    pub repositories_scanned: usize,
    pub repositories_skipped: usize,
    /// Matching issue URLs in discovery order
    pub issue_urls: Vec<String>,
    pub notification: NotificationOutcome,
}

/// Run one cycle against the current time
pub async fn run_cycle(
    tracker: &dyn GitHubClient,
    notifier: &dyn ChatNotifier,
    config: &ScanConfig,
    channel: &str,
) -> Result<CycleReport, CycleError> {
    run_cycle_at(tracker, notifier, config, channel, Utc::now()).await
}

/// Run one cycle with `now` as the end of the window
pub async fn run_cycle_at(
    tracker: &dyn GitHubClient,
    notifier: &dyn ChatNotifier,
    config: &ScanConfig,
    channel: &str,
    now: DateTime<Utc>,
) -> Result<CycleReport, CycleError> {
    // Computed once; every query and comparison in this cycle uses it.
    let since = now - config.window();
    let query = IssueQuery::open_with_label(config.label.clone(), since);

    info!(
        "Scanning {} organizations for '{}' issues created after {}",
        config.organizations.len(),
        config.label,
        since
    );

    let mut issue_urls = Vec::new();
    let mut repositories_scanned = 0;
    let mut repositories_skipped = 0;

    for org in &config.organizations {
        let mut page = 1u32;
        loop {
            let listing = tracker
                .list_org_repositories(org, page, config.per_page)
                .await
                .map_err(|reason| CycleError::RepositoryListing {
                    organization: org.clone(),
                    page,
                    reason,
                })?;

            info!(
                "Fetched {} repositories for org: {} (page {})",
                listing.repositories.len(),
                org,
                page
            );

            for repo in &listing.repositories {
                repositories_scanned += 1;

                let issues = match tracker.list_issues(&repo.owner, &repo.name, &query).await {
                    Ok(issues) => issues,
                    Err(e) => {
                        warn!("Error fetching issues from repo {}: {:#}", repo.full_name(), e);
                        repositories_skipped += 1;
                        continue;
                    }
                };

                let before = issue_urls.len();
                issue_urls.extend(
                    issues
                        .into_iter()
                        .filter(|issue| is_new_open_issue(issue, since))
                        .map(|issue| issue.html_url),
                );
                debug!(
                    "{}: {} new issues",
                    repo.full_name(),
                    issue_urls.len() - before
                );
            }

            if !listing.has_next_page {
                break;
            }
            page += 1;
        }
    }

    info!("Found {} issues", issue_urls.len());

    let notification = if issue_urls.is_empty() {
        info!(
            "No new '{}' issues found in the last {} minutes",
            config.label, config.window_minutes
        );
        NotificationOutcome::NothingToSend
    } else {
        let message = format_message(&config.alert_header, &issue_urls);
        match notifier.post_message(channel, &message).await {
            Ok(()) => {
                info!("Sent {} issues to channel {}", issue_urls.len(), channel);
                NotificationOutcome::Delivered
            }
            Err(e) => {
                error!("Failed to send message to channel {}: {}", channel, e);
                NotificationOutcome::Failed(e.to_string())
            }
        }
    };

    Ok(CycleReport {
        since,
        organizations_scanned: config.organizations.len(),
        repositories_scanned,
        repositories_skipped,
        issue_urls,
        notification,
    })
}

/// GitHub's `since` filters on update time, so creation is re-checked here.
fn is_new_open_issue(issue: &Issue, since: DateTime<Utc>) -> bool {
    issue.state == IssueState::Open && issue.created_at > since
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use gh_client::{Repository, RepositoryPage};
    use slack_client::NotifyError;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn issue(repo: &str, number: u64, created_at: DateTime<Utc>) -> Issue {
        Issue {
            number,
            title: format!("Issue {}", number),
            html_url: format!("https://github.com/{}/issues/{}", repo, number),
            state: IssueState::Open,
            created_at,
            labels: vec!["help wanted".to_string()],
        }
    }

    fn config(orgs: &[&str]) -> ScanConfig {
        ScanConfig {
            organizations: orgs.iter().map(|o| o.to_string()).collect(),
            ..ScanConfig::default()
        }
    }

    /// Mock tracker for testing
    ///
    /// Repository pages are keyed by organization; issue responses by
    /// `owner/name`. Repositories without an entry have no issues.
    #[derive(Default)]
    struct MockTracker {
        pages: HashMap<String, Vec<Result<RepositoryPage, String>>>,
        issues: HashMap<String, Result<Vec<Issue>, String>>,
        page_calls: Mutex<Vec<(String, u32, u8)>>,
        issue_calls: Mutex<Vec<(String, IssueQuery)>>,
    }

    impl MockTracker {
        fn with_org(mut self, org: &str, pages: Vec<Vec<&str>>) -> Self {
            let count = pages.len();
            let pages = pages
                .into_iter()
                .enumerate()
                .map(|(idx, names)| {
                    Ok(RepositoryPage {
                        repositories: names.into_iter().map(|n| Repository::new(org, n)).collect(),
                        has_next_page: idx + 1 < count,
                    })
                })
                .collect();
            self.pages.insert(org.to_string(), pages);
            self
        }

        fn with_failing_org(mut self, org: &str) -> Self {
            self.pages
                .insert(org.to_string(), vec![Err("502 Bad Gateway".to_string())]);
            self
        }

        fn with_issues(mut self, full_name: &str, issues: Vec<Issue>) -> Self {
            self.issues.insert(full_name.to_string(), Ok(issues));
            self
        }

        fn with_failing_repo(mut self, full_name: &str) -> Self {
            self.issues
                .insert(full_name.to_string(), Err("404 Not Found".to_string()));
            self
        }

        fn issue_calls(&self) -> Vec<(String, IssueQuery)> {
            self.issue_calls.lock().unwrap().clone()
        }

        fn page_calls(&self) -> Vec<(String, u32, u8)> {
            self.page_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GitHubClient for MockTracker {
        async fn list_org_repositories(
            &self,
            org: &str,
            page: u32,
            per_page: u8,
        ) -> anyhow::Result<RepositoryPage> {
            self.page_calls
                .lock()
                .unwrap()
                .push((org.to_string(), page, per_page));
            let pages = self
                .pages
                .get(org)
                .ok_or_else(|| anyhow::anyhow!("unknown org {}", org))?;
            match pages.get(page as usize - 1) {
                Some(Ok(listing)) => Ok(listing.clone()),
                Some(Err(e)) => Err(anyhow::anyhow!(e.clone())),
                None => Ok(RepositoryPage::default()),
            }
        }

        async fn list_issues(
            &self,
            owner: &str,
            repo: &str,
            query: &IssueQuery,
        ) -> anyhow::Result<Vec<Issue>> {
            let full_name = format!("{}/{}", owner, repo);
            self.issue_calls
                .lock()
                .unwrap()
                .push((full_name.clone(), query.clone()));
            match self.issues.get(&full_name) {
                Some(Ok(issues)) => Ok(issues.clone()),
                Some(Err(e)) => Err(anyhow::anyhow!(e.clone())),
                None => Ok(vec![]),
            }
        }
    }

    /// Mock notifier recording every posted message
    #[derive(Clone, Default)]
    struct MockNotifier {
        messages: Arc<Mutex<Vec<(String, String)>>>,
        fail_with: Option<String>,
    }

    impl MockNotifier {
        fn failing(reason: &str) -> Self {
            Self {
                fail_with: Some(reason.to_string()),
                ..Self::default()
            }
        }

        fn messages(&self) -> Vec<(String, String)> {
            self.messages.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatNotifier for MockNotifier {
        async fn post_message(&self, channel: &str, text: &str) -> Result<(), NotifyError> {
            self.messages
                .lock()
                .unwrap()
                .push((channel.to_string(), text.to_string()));
            match &self.fail_with {
                Some(reason) => Err(NotifyError::Api(reason.clone())),
                None => Ok(()),
            }
        }
    }

    #[tokio::test]
    async fn test_excludes_issues_created_at_or_before_since() {
        let since = now() - Duration::minutes(30);
        let tracker = MockTracker::default()
            .with_org("kubernetes", vec![vec!["kubectl"]])
            .with_issues(
                "kubernetes/kubectl",
                vec![
                    issue("kubernetes/kubectl", 1, since - Duration::minutes(5)),
                    issue("kubernetes/kubectl", 2, since),
                    issue("kubernetes/kubectl", 3, since + Duration::seconds(1)),
                ],
            );
        let notifier = MockNotifier::default();

        let report = run_cycle_at(&tracker, &notifier, &config(&["kubernetes"]), "C1", now())
            .await
            .unwrap();

        assert_eq!(
            report.issue_urls,
            vec!["https://github.com/kubernetes/kubectl/issues/3"]
        );
        assert_eq!(report.since, since);
    }

    #[tokio::test]
    async fn test_excludes_closed_issues() {
        let mut closed = issue("etcd-io/etcd", 9, now() - Duration::minutes(1));
        closed.state = IssueState::Closed;
        let tracker = MockTracker::default()
            .with_org("etcd-io", vec![vec!["etcd"]])
            .with_issues("etcd-io/etcd", vec![closed]);
        let notifier = MockNotifier::default();

        let report = run_cycle_at(&tracker, &notifier, &config(&["etcd-io"]), "C1", now())
            .await
            .unwrap();

        assert!(report.issue_urls.is_empty());
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_includes_matches_in_discovery_order() {
        let fresh = now() - Duration::minutes(10);
        let tracker = MockTracker::default()
            .with_org("kubernetes", vec![vec!["website"], vec!["kubectl"]])
            .with_org("etcd-io", vec![vec!["etcd"]])
            .with_issues(
                "kubernetes/website",
                vec![
                    issue("kubernetes/website", 5, fresh),
                    issue("kubernetes/website", 4, fresh),
                ],
            )
            .with_issues("kubernetes/kubectl", vec![issue("kubernetes/kubectl", 1, fresh)])
            .with_issues("etcd-io/etcd", vec![issue("etcd-io/etcd", 2, fresh)]);
        let notifier = MockNotifier::default();

        let report = run_cycle_at(
            &tracker,
            &notifier,
            &config(&["kubernetes", "etcd-io"]),
            "C1",
            now(),
        )
        .await
        .unwrap();

        assert_eq!(
            report.issue_urls,
            vec![
                "https://github.com/kubernetes/website/issues/5",
                "https://github.com/kubernetes/website/issues/4",
                "https://github.com/kubernetes/kubectl/issues/1",
                "https://github.com/etcd-io/etcd/issues/2",
            ]
        );
        assert_eq!(report.repositories_scanned, 3);
        assert_eq!(report.organizations_scanned, 2);

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, "C1");
        assert_eq!(messages[0].1.lines().count(), 5);
    }

    #[tokio::test]
    async fn test_duplicate_issues_are_not_deduplicated() {
        let fresh = now() - Duration::minutes(4);
        let repeated = issue("kubernetes/kubectl", 7, fresh);
        let tracker = MockTracker::default()
            .with_org("kubernetes", vec![vec!["kubectl"]])
            .with_issues("kubernetes/kubectl", vec![repeated.clone(), repeated]);
        let notifier = MockNotifier::default();
        let cfg = config(&["kubernetes"]);

        let report = run_cycle_at(&tracker, &notifier, &cfg, "C1", now())
            .await
            .unwrap();

        let url = "https://github.com/kubernetes/kubectl/issues/7";
        assert_eq!(report.issue_urls, vec![url, url]);

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].1,
            format!("{}\n{}\n{}\n", cfg.alert_header, url, url)
        );
    }

    #[tokio::test]
    async fn test_paginates_until_no_next_page_with_constant_since() {
        let tracker = MockTracker::default().with_org(
            "kubernetes-sigs",
            vec![vec!["kind"], vec!["kustomize"], vec!["cluster-api"]],
        );
        let notifier = MockNotifier::default();
        let mut cfg = config(&["kubernetes-sigs"]);
        cfg.per_page = 50;

        run_cycle_at(&tracker, &notifier, &cfg, "C1", now())
            .await
            .unwrap();

        let pages: Vec<u32> = tracker.page_calls().iter().map(|(_, p, _)| *p).collect();
        assert_eq!(pages, vec![1, 2, 3]);
        assert!(tracker.page_calls().iter().all(|(_, _, per)| *per == 50));

        let calls = tracker.issue_calls();
        assert_eq!(calls.len(), 3);
        let expected_since = now() - Duration::minutes(30);
        for (_, query) in &calls {
            assert_eq!(query.since, expected_since);
            assert_eq!(query.label, "help wanted");
            assert_eq!(query.state, IssueState::Open);
        }
    }

    #[tokio::test]
    async fn test_repository_listing_failure_aborts_cycle() {
        let fresh = now() - Duration::minutes(1);
        let tracker = MockTracker::default()
            .with_org("kubernetes", vec![vec!["kubectl"]])
            .with_failing_org("kubernetes-sigs")
            .with_org("etcd-io", vec![vec!["etcd"]])
            .with_issues("kubernetes/kubectl", vec![issue("kubernetes/kubectl", 1, fresh)]);
        let notifier = MockNotifier::default();

        let err = run_cycle_at(
            &tracker,
            &notifier,
            &config(&["kubernetes", "kubernetes-sigs", "etcd-io"]),
            "C1",
            now(),
        )
        .await
        .unwrap_err();

        let CycleError::RepositoryListing {
            organization, page, ..
        } = &err;
        assert_eq!(organization, "kubernetes-sigs");
        assert_eq!(*page, 1);
        assert!(err.to_string().contains("502 Bad Gateway"));

        assert!(notifier.messages().is_empty());
        // The third organization is never reached.
        assert!(tracker.page_calls().iter().all(|(org, _, _)| org != "etcd-io"));
    }

    #[tokio::test]
    async fn test_issue_listing_failure_skips_repository() {
        let fresh = now() - Duration::minutes(1);
        let repos = vec!["a", "b", "c", "d", "e"];
        let mut tracker = MockTracker::default().with_org("kubernetes", vec![repos.clone()]);
        for name in &repos {
            let full = format!("kubernetes/{}", name);
            tracker = if *name == "c" {
                tracker.with_failing_repo(&full)
            } else {
                tracker.with_issues(&full, vec![issue(&full, 1, fresh)])
            };
        }
        let notifier = MockNotifier::default();

        let report = run_cycle_at(&tracker, &notifier, &config(&["kubernetes"]), "C1", now())
            .await
            .unwrap();

        assert_eq!(report.repositories_scanned, 5);
        assert_eq!(report.repositories_skipped, 1);
        assert_eq!(
            report.issue_urls,
            vec![
                "https://github.com/kubernetes/a/issues/1",
                "https://github.com/kubernetes/b/issues/1",
                "https://github.com/kubernetes/d/issues/1",
                "https://github.com/kubernetes/e/issues/1",
            ]
        );
        assert_eq!(report.notification, NotificationOutcome::Delivered);
        assert_eq!(notifier.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_no_matches_sends_nothing() {
        let tracker = MockTracker::default()
            .with_org("kubernetes", vec![vec!["kubectl"]])
            .with_org("kubernetes-sigs", vec![vec![]])
            .with_org("etcd-io", vec![vec!["etcd"]]);
        let notifier = MockNotifier::default();

        let report = run_cycle_at(&tracker, &notifier, &ScanConfig::default(), "C1", now())
            .await
            .unwrap();

        assert!(report.issue_urls.is_empty());
        assert_eq!(report.notification, NotificationOutcome::NothingToSend);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_single_match_message_body() {
        let mut single = issue("x/y", 1, now() - Duration::minutes(2));
        single.html_url = "https://x/y/issues/1".to_string();
        let tracker = MockTracker::default()
            .with_org("x", vec![vec!["y"]])
            .with_issues("x/y", vec![single]);
        let notifier = MockNotifier::default();
        let cfg = config(&["x"]);

        run_cycle_at(&tracker, &notifier, &cfg, "C42", now())
            .await
            .unwrap();

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, "C42");
        assert_eq!(
            messages[0].1,
            format!("{}\nhttps://x/y/issues/1\n", cfg.alert_header)
        );
    }

    #[tokio::test]
    async fn test_notification_failure_is_not_fatal() {
        let tracker = MockTracker::default()
            .with_org("etcd-io", vec![vec!["etcd"]])
            .with_issues(
                "etcd-io/etcd",
                vec![issue("etcd-io/etcd", 3, now() - Duration::minutes(3))],
            );
        let notifier = MockNotifier::failing("channel_not_found");

        let report = run_cycle_at(&tracker, &notifier, &config(&["etcd-io"]), "C1", now())
            .await
            .unwrap();

        assert_eq!(report.issue_urls.len(), 1);
        assert!(matches!(
            report.notification,
            NotificationOutcome::Failed(ref reason) if reason.contains("channel_not_found")
        ));
    }

    #[test]
    fn test_is_new_open_issue_boundary() {
        let since = now();
        assert!(!is_new_open_issue(&issue("a/b", 1, since), since));
        assert!(is_new_open_issue(
            &issue("a/b", 1, since + Duration::milliseconds(1)),
            since
        ));
    }
}
