//! Remote repository services
//!
//! The core only sees pull requests and reviewer states through
//! [`PlatformService`]; [`fetch_snapshot`] gathers both in bounded parallel.

mod detection;
mod fetch;
mod github;

pub use detection::{detect_platform, parse_repo_info};
pub use fetch::{fetch_snapshot, RemoteSnapshot};
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{PlatformConfig, PullRequestRef, ReviewerState};
use async_trait::async_trait;

/// Read-only queries against the hosting service
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Login of the authenticated user
    async fn current_user(&self) -> Result<String>;

    /// Numbers of PRs in this repository authored by `author`.
    ///
    /// Open PRs only unless `include_closed` is set.
    async fn list_authored_pr_numbers(&self, author: &str, include_closed: bool)
    -> Result<Vec<u64>>;

    /// Head/base snapshot of one PR
    async fn get_pull_request(&self, number: u64) -> Result<PullRequestRef>;

    /// Latest review per reviewer, plus outstanding requests as pending
    async fn list_reviewers(&self, number: u64) -> Result<Vec<ReviewerState>>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
