//! Authentication for GitHub
//!
//! Supports environment variables and the `gh` CLI.

use crate::error::{Error, Result};
use std::process::Command;
use tracing::debug;

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from CLI tool (gh)
    Cli,
    /// Token from environment variable
    EnvVar,
}

/// A resolved GitHub token
#[derive(Clone)]
pub struct GitHubAuthConfig {
    /// The token itself
    pub token: String,
    /// Where it came from
    pub source: AuthSource,
}

impl std::fmt::Debug for GitHubAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAuthConfig")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Resolve a GitHub token: `GITHUB_TOKEN`, then `GH_TOKEN`, then `gh auth token`
pub fn get_github_auth(host: Option<&str>) -> Result<GitHubAuthConfig> {
    resolve_token(|name| std::env::var(name).ok(), || gh_cli_token(host))
}

fn resolve_token(
    env: impl Fn(&str) -> Option<String>,
    cli: impl FnOnce() -> Option<String>,
) -> Result<GitHubAuthConfig> {
    for name in TOKEN_VARS {
        if let Some(token) = env(name).filter(|t| !t.trim().is_empty()) {
            debug!(var = name, "using token from environment");
            return Ok(GitHubAuthConfig {
                token: token.trim().to_string(),
                source: AuthSource::EnvVar,
            });
        }
    }

    if let Some(token) = cli() {
        debug!("using token from gh CLI");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    Err(Error::Auth(
        "no GitHub token found; set GITHUB_TOKEN or run `gh auth login`".to_string(),
    ))
}

fn gh_cli_token(host: Option<&str>) -> Option<String> {
    let mut cmd = Command::new("gh");
    cmd.args(["auth", "token"]);
    if let Some(host) = host {
        cmd.args(["--hostname", host]);
    }

    let output = cmd.output().ok()?;
    if !output.status.success() {
        debug!("gh auth token failed");
        return None;
    }
    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}
