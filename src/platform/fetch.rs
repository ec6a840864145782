//! Bounded fan-out fetch of the remote PR state

use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::{PullRequestRef, ReviewerState};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::HashMap;
use tracing::debug;

/// Everything the core needs from the hosting service for one run
#[derive(Debug, Clone, Default)]
pub struct RemoteSnapshot {
    /// PRs authored by the current user, sorted by number
    pub pulls: Vec<PullRequestRef>,
    /// Reviewer states keyed by PR number
    pub reviews: HashMap<u64, Vec<ReviewerState>>,
}

/// Fetch PR details and reviewer states with at most `concurrency` requests
/// in flight. Any failed request fails the whole fetch.
pub async fn fetch_snapshot(
    platform: &dyn PlatformService,
    include_closed: bool,
    concurrency: usize,
) -> Result<RemoteSnapshot> {
    let concurrency = concurrency.max(1);
    let user = platform.current_user().await?;
    let numbers = platform
        .list_authored_pr_numbers(&user, include_closed)
        .await?;
    debug!(user = %user, count = numbers.len(), concurrency, "fetching PR snapshot");

    let mut pulls: Vec<PullRequestRef> = stream::iter(numbers.iter().copied())
        .map(|number| platform.get_pull_request(number))
        .buffer_unordered(concurrency)
        .try_collect()
        .await?;
    pulls.sort_by_key(|pr| pr.number);

    let reviews: HashMap<u64, Vec<ReviewerState>> = stream::iter(numbers)
        .map(|number| async move {
            platform
                .list_reviewers(number)
                .await
                .map(|reviewers| (number, reviewers))
        })
        .buffer_unordered(concurrency)
        .try_collect()
        .await?;

    Ok(RemoteSnapshot { pulls, reviews })
}
