//! Shared test utilities

#![allow(dead_code)]

pub mod fake_repo;
pub mod mock_platform;

pub use fake_repo::FakeRepo;
pub use mock_platform::MockPlatformService;

use git_chain::types::{PrState, PullRequestRef};

/// PR snapshot whose commits are `<branch>-sha`
pub fn make_pr(number: u64, head: &str, base: &str, state: PrState) -> PullRequestRef {
    PullRequestRef {
        number,
        head_ref: head.to_string(),
        head_sha: format!("{head}-sha"),
        base_ref: base.to_string(),
        base_sha: format!("{base}-sha"),
        state,
    }
}

/// Open PR shorthand
pub fn open_pr(number: u64, head: &str, base: &str) -> PullRequestRef {
    make_pr(number, head, base, PrState::Open)
}
