//! Mock platform service for testing

#![allow(dead_code)]

use async_trait::async_trait;
use git_chain::error::{Error, Result};
use git_chain::platform::PlatformService;
use git_chain::types::{
    Platform, PlatformConfig, PrState, PullRequestRef, ReviewStatus, ReviewerState,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Simple mock platform service for testing
///
/// Features:
/// - Configurable PRs and reviewer states
/// - Call tracking for verification
/// - In-flight tracking to observe fan-out width
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    user: String,
    pulls: Mutex<HashMap<u64, PullRequestRef>>,
    reviews: Mutex<HashMap<u64, Vec<ReviewerState>>>,
    // Call tracking
    list_calls: Mutex<Vec<(String, bool)>>,
    get_pr_calls: Mutex<Vec<u64>>,
    list_reviewers_calls: Mutex<Vec<u64>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    // Error injection
    error_on_get_pr: Mutex<Option<u64>>,
    error_on_reviewers: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            user: "octocat".to_string(),
            pulls: Mutex::new(HashMap::new()),
            reviews: Mutex::new(HashMap::new()),
            list_calls: Mutex::new(Vec::new()),
            get_pr_calls: Mutex::new(Vec::new()),
            list_reviewers_calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            error_on_get_pr: Mutex::new(None),
            error_on_reviewers: Mutex::new(None),
        }
    }

    /// Mock for `octo/repo` on github.com
    pub fn new() -> Self {
        Self::with_config(PlatformConfig {
            platform: Platform::GitHub,
            owner: "octo".to_string(),
            repo: "repo".to_string(),
            host: None,
        })
    }

    // === Setup ===

    /// Add a PR; its head and base commits are `<branch>-sha`
    pub fn add_pr(&self, number: u64, head: &str, base: &str, state: PrState) {
        self.pulls.lock().unwrap().insert(
            number,
            PullRequestRef {
                number,
                head_ref: head.to_string(),
                head_sha: format!("{head}-sha"),
                base_ref: base.to_string(),
                base_sha: format!("{base}-sha"),
                state,
            },
        );
    }

    /// Set reviewer states for a PR
    pub fn set_reviews(&self, number: u64, reviewers: Vec<(&str, ReviewStatus)>) {
        self.reviews.lock().unwrap().insert(
            number,
            reviewers
                .into_iter()
                .map(|(login, status)| ReviewerState::new(login, status))
                .collect(),
        );
    }

    // === Error injection methods ===

    /// Make `get_pull_request` fail for one PR number
    pub fn fail_get_pr(&self, number: u64) {
        *self.error_on_get_pr.lock().unwrap() = Some(number);
    }

    /// Make `list_reviewers` return an error
    pub fn fail_reviewers(&self, msg: &str) {
        *self.error_on_reviewers.lock().unwrap() = Some(msg.to_string());
    }

    // === Call inspection ===

    pub fn get_list_calls(&self) -> Vec<(String, bool)> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn get_pr_calls(&self) -> Vec<u64> {
        let mut calls = self.get_pr_calls.lock().unwrap().clone();
        calls.sort_unstable();
        calls
    }

    pub fn get_list_reviewers_calls(&self) -> Vec<u64> {
        let mut calls = self.list_reviewers_calls.lock().unwrap().clone();
        calls.sort_unstable();
        calls
    }

    /// Highest number of concurrent `get_pull_request`/`list_reviewers` calls seen
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn track<T>(&self, result: Result<T>) -> Result<T> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

impl Default for MockPlatformService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn current_user(&self) -> Result<String> {
        Ok(self.user.clone())
    }

    async fn list_authored_pr_numbers(
        &self,
        author: &str,
        include_closed: bool,
    ) -> Result<Vec<u64>> {
        self.list_calls
            .lock()
            .unwrap()
            .push((author.to_string(), include_closed));

        let pulls = self.pulls.lock().unwrap();
        // Search results come back newest first.
        let mut numbers: Vec<u64> = pulls
            .values()
            .filter(|pr| include_closed || pr.is_open())
            .map(|pr| pr.number)
            .collect();
        numbers.sort_unstable_by(|a, b| b.cmp(a));
        Ok(numbers)
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequestRef> {
        self.get_pr_calls.lock().unwrap().push(number);

        let result = if *self.error_on_get_pr.lock().unwrap() == Some(number) {
            Err(Error::GitHubApi(format!("PR #{number} unavailable")))
        } else {
            self.pulls
                .lock()
                .unwrap()
                .get(&number)
                .cloned()
                .ok_or_else(|| Error::GitHubApi(format!("PR #{number} not found")))
        };
        self.track(result).await
    }

    async fn list_reviewers(&self, number: u64) -> Result<Vec<ReviewerState>> {
        self.list_reviewers_calls.lock().unwrap().push(number);

        let error = self.error_on_reviewers.lock().unwrap().clone();
        let result = match error {
            Some(msg) => Err(Error::GitHubApi(msg)),
            None => Ok(self
                .reviews
                .lock()
                .unwrap()
                .get(&number)
                .cloned()
                .unwrap_or_default()),
        };
        self.track(result).await
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
