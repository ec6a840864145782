//! Error types for git-chain

use thiserror::Error;

/// Errors produced by git-chain
#[derive(Debug, Error)]
pub enum Error {
    /// No usable authentication token
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Configuration file could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// No remote points at a supported hosting service
    #[error("no supported remotes found (expected a GitHub remote)")]
    NoSupportedRemotes,

    /// The requested remote does not exist locally
    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    /// A remote URL could not be mapped to owner/repo
    #[error("cannot parse remote URL: {0}")]
    InvalidRemoteUrl(String),

    /// Two open pull requests share one head branch
    #[error("branch '{branch}' is the head of both PR #{first} and PR #{second}")]
    DuplicateHead {
        /// Head branch name
        branch: String,
        /// First PR number
        first: u64,
        /// Second PR number
        second: u64,
    },

    /// The head -> base relation contains a cycle
    #[error("pull requests form a cycle through: {}", .0.join(", "))]
    CyclicStack(Vec<String>),

    /// A branch is not part of the forest
    #[error("branch not found in any stack: {0}")]
    BranchNotFound(String),

    /// The local branch disagrees with the last known remote head
    #[error(
        "branch '{branch}' has diverged: local {local} but PR head is {remote}; fetch or push before updating"
    )]
    Diverged {
        /// Branch name
        branch: String,
        /// Local commit id
        local: String,
        /// Commit id recorded on the pull request
        remote: String,
    },

    /// A git command failed
    #[error("git error: {0}")]
    Git(String),

    /// The user aborted a conflicted rebase
    #[error("rebase of '{branch}' aborted")]
    RebaseAborted {
        /// Branch whose rebase was aborted
        branch: String,
    },

    /// Force-pushing a rebased branch failed
    #[error("failed to push '{branch}': {message}")]
    PushFailed {
        /// Branch name
        branch: String,
        /// Failure detail
        message: String,
    },

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Broken internal invariant
    #[error("internal error: {0}")]
    Internal(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        Self::GitHubApi(e.to_string())
    }
}

impl From<git2::Error> for Error {
    fn from(e: git2::Error) -> Self {
        Self::Git(e.message().to_string())
    }
}

/// Result alias used throughout git-chain
pub type Result<T> = std::result::Result<T, Error>;
