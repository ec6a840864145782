//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    Platform, PlatformConfig, PrState, PullRequestRef, ReviewStatus, ReviewerState,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::models::pulls::ReviewState;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize)]
struct RequestedReviewers {
    #[serde(default)]
    users: Vec<RequestedUser>,
    #[serde(default)]
    teams: Vec<RequestedTeam>,
}

#[derive(Deserialize)]
struct RequestedUser {
    login: String,
}

#[derive(Deserialize)]
struct RequestedTeam {
    slug: String,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for raw HTTP requests (requested reviewers)
    token: String,
    /// HTTP client for raw requests
    http_client: Client,
    /// API host for raw requests
    api_host: String,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        let api_host = if let Some(ref h) = host {
            let base_url = format!("https://{h}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
            format!("{h}/api/v3")
        } else {
            "api.github.com".to_string()
        };

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent(concat!("git-chain/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: PlatformConfig {
                platform: Platform::GitHub,
                owner,
                repo,
                host,
            },
            token: token.to_string(),
            http_client,
            api_host,
        })
    }

    /// Create a service for an already detected repository
    pub fn from_config(token: &str, config: &PlatformConfig) -> Result<Self> {
        Self::new(
            token,
            config.owner.clone(),
            config.repo.clone(),
            config.host.clone(),
        )
    }

    /// Outstanding review requests, which octocrab's review list does not include
    async fn requested_reviewers(&self, number: u64) -> Result<Vec<String>> {
        let url = format!(
            "https://{}/repos/{}/{}/pulls/{}/requested_reviewers",
            self.api_host, self.config.owner, self.config.repo, number
        );

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch requested reviewers: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "requested reviewers for PR #{number}: HTTP {}",
                response.status()
            )));
        }

        let requested: RequestedReviewers = response.json().await.map_err(|e| {
            Error::GitHubApi(format!("Failed to parse requested reviewers: {e}"))
        })?;

        Ok(requested
            .users
            .into_iter()
            .map(|u| u.login)
            .chain(requested.teams.into_iter().map(|t| t.slug))
            .collect())
    }
}

fn review_status(state: &ReviewState) -> ReviewStatus {
    match state {
        ReviewState::Approved => ReviewStatus::Approved,
        ReviewState::ChangesRequested => ReviewStatus::ChangesRequested,
        ReviewState::Commented => ReviewStatus::Commented,
        ReviewState::Pending => ReviewStatus::Pending,
        other => ReviewStatus::Other(format!("{other:?}").to_uppercase()),
    }
}

/// Keep the last status per login, in order of first appearance
fn latest_per_login(reviews: impl IntoIterator<Item = (String, ReviewStatus)>) -> Vec<ReviewerState> {
    let mut latest: Vec<ReviewerState> = Vec::new();
    for (login, status) in reviews {
        match latest.iter_mut().find(|r| r.login == login) {
            Some(existing) => existing.status = status,
            None => latest.push(ReviewerState::new(login, status)),
        }
    }
    latest
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn current_user(&self) -> Result<String> {
        let user = self.client.current().user().await?;
        debug!(login = %user.login, "resolved current user");
        Ok(user.login)
    }

    async fn list_authored_pr_numbers(
        &self,
        author: &str,
        include_closed: bool,
    ) -> Result<Vec<u64>> {
        let mut query = format!("is:pr author:{author} repo:{}", self.config.full_name());
        if !include_closed {
            query.push_str(" is:open");
        }
        debug!(%query, "searching authored PRs");

        let page = self
            .client
            .search()
            .issues_and_pull_requests(&query)
            .per_page(100)
            .send()
            .await?;
        let issues = self.client.all_pages(page).await?;

        let numbers: Vec<u64> = issues.iter().map(|issue| issue.number).collect();
        debug!(count = numbers.len(), "found authored PRs");
        Ok(numbers)
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequestRef> {
        debug!(pr_number = number, "getting PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(number)
            .await?;

        let state = match pr.state {
            Some(octocrab::models::IssueState::Open) => PrState::Open,
            // IssueState is non-exhaustive
            Some(_) | None => PrState::Closed,
        };

        Ok(PullRequestRef {
            number: pr.number,
            head_ref: pr.head.ref_field.clone(),
            head_sha: pr.head.sha.clone(),
            base_ref: pr.base.ref_field.clone(),
            base_sha: pr.base.sha.clone(),
            state,
        })
    }

    async fn list_reviewers(&self, number: u64) -> Result<Vec<ReviewerState>> {
        debug!(pr_number = number, "listing reviewers");
        let page = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list_reviews(number)
            .per_page(100)
            .send()
            .await?;
        let reviews = self.client.all_pages(page).await?;

        let given = reviews.into_iter().filter_map(|review| {
            let login = review.user?.login;
            let status = review.state.as_ref().map(review_status)?;
            Some((login, status))
        });
        let mut reviewers = latest_per_login(given);

        for login in self.requested_reviewers(number).await? {
            // A re-requested review replaces the earlier verdict.
            reviewers.retain(|r| r.login != login);
            reviewers.push(ReviewerState::new(login, ReviewStatus::Pending));
        }

        debug!(pr_number = number, count = reviewers.len(), "listed reviewers");
        Ok(reviewers)
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_review_per_login_wins() {
        let reviewers = latest_per_login([
            ("alice".to_string(), ReviewStatus::ChangesRequested),
            ("bob".to_string(), ReviewStatus::Commented),
            ("alice".to_string(), ReviewStatus::Approved),
        ]);

        assert_eq!(
            reviewers,
            vec![
                ReviewerState::new("alice", ReviewStatus::Approved),
                ReviewerState::new("bob", ReviewStatus::Commented),
            ]
        );
    }

    #[test]
    fn test_review_status_mapping() {
        assert_eq!(review_status(&ReviewState::Approved), ReviewStatus::Approved);
        assert_eq!(
            review_status(&ReviewState::Dismissed),
            ReviewStatus::Other("DISMISSED".to_string())
        );
    }

    #[tokio::test]
    async fn test_enterprise_host_uses_api_v3() {
        let service = GitHubService::new(
            "token",
            "octo".into(),
            "repo".into(),
            Some("github.example.com".into()),
        )
        .unwrap();
        assert_eq!(service.api_host, "github.example.com/api/v3");
        assert_eq!(service.config().full_name(), "octo/repo");
    }
}
