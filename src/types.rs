//! Core types for git-chain

use serde::{Deserialize, Serialize};

/// PR state as far as the stack is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    /// PR is open
    Open,
    /// PR was closed or merged
    Closed,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Snapshot of one pull request as last observed on the remote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// PR number
    pub number: u64,
    /// Head branch name
    pub head_ref: String,
    /// Head commit id (hex)
    pub head_sha: String,
    /// Base branch name
    pub base_ref: String,
    /// Base commit id (hex)
    pub base_sha: String,
    /// Open or closed
    pub state: PrState,
}

impl PullRequestRef {
    /// Whether the PR is still open
    pub fn is_open(&self) -> bool {
        self.state == PrState::Open
    }
}

/// Review status of a single reviewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    /// Approved the changes
    Approved,
    /// Requested changes
    ChangesRequested,
    /// Left comments only
    Commented,
    /// Review requested but not yet given
    Pending,
    /// Any status this tool does not know about, kept verbatim
    Other(String),
}

impl ReviewStatus {
    /// Glyph used when rendering the tree
    pub fn glyph(&self) -> &str {
        match self {
            Self::Approved => "✅",
            Self::ChangesRequested => "❌",
            Self::Commented => "💬",
            Self::Pending => "⏳",
            Self::Other(raw) => raw,
        }
    }
}

/// A reviewer and their latest status on a PR
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerState {
    /// Reviewer login
    pub login: String,
    /// Latest status
    pub status: ReviewStatus,
}

impl ReviewerState {
    /// Create a reviewer state
    pub fn new(login: impl Into<String>, status: ReviewStatus) -> Self {
        Self {
            login: login.into(),
            status,
        }
    }
}

/// A commit with its message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Commit id (hex)
    pub id: String,
    /// Full commit message
    pub message: String,
}

/// Detected platform type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    /// GitHub or GitHub Enterprise
    GitHub,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GitHub => write!(f, "GitHub"),
        }
    }
}

/// Platform configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Platform type
    pub platform: Platform,
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

impl PlatformConfig {
    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}
