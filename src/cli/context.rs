//! Shared command context for CLI commands
//!
//! Extracts the setup shared by `print` and `update-dependencies`.

use git_chain::auth::get_github_auth;
use git_chain::config::{Config, load_config};
use git_chain::error::Result;
use git_chain::platform::{GitHubService, PlatformService, parse_repo_info};
use git_chain::repo::{GitRepo, VersionControl};
use std::path::Path;
use tracing::debug;

/// Shared context for CLI commands that interact with the platform
///
/// - Loading the user configuration
/// - Opening the git repository
/// - Resolving the remote and the hosted repository behind it
/// - Authenticating and creating the platform service
///
/// All of this happens before any command touches a branch.
pub struct CommandContext {
    /// The local repository
    pub repo: GitRepo,
    /// User configuration, CLI overrides applied
    pub config: Config,
    /// Platform service (GitHub)
    pub platform: Box<dyn PlatformService>,
}

impl CommandContext {
    /// Create a new command context
    pub fn new(path: &Path, remote: Option<&str>) -> Result<Self> {
        let mut config = load_config()?;
        if let Some(remote) = remote {
            config.remote = remote.to_string();
        }

        let repo = GitRepo::open(path)?;
        let url = repo.remote_url(&config.remote)?;
        let platform_config = parse_repo_info(&url)?;
        debug!(
            remote = %config.remote,
            repository = %platform_config.full_name(),
            "resolved hosted repository"
        );

        let auth = get_github_auth(platform_config.host.as_deref())?;
        let platform = GitHubService::from_config(&auth.token, &platform_config)?;

        Ok(Self {
            repo,
            config,
            platform: Box::new(platform),
        })
    }
}
