//! Repository detection from git remote URLs

use crate::error::{Error, Result};
use crate::types::{Platform, PlatformConfig};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// `user@host:owner/repo(.git)`
static SCP_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[^@/]+@)?(?P<host>[^:/]+):(?P<path>[^/].*)$").expect("valid pattern")
});

/// Host and path of a remote URL, without trailing slashes or `.git`
fn split_remote(url: &str) -> Option<(String, String)> {
    let url = url.trim().trim_end_matches('/');

    let (host, path) = if url.contains("://") {
        let parsed = Url::parse(url).ok()?;
        (parsed.host_str()?.to_string(), parsed.path().to_string())
    } else {
        let caps = SCP_LIKE.captures(url)?;
        (caps["host"].to_string(), caps["path"].to_string())
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    Some((host.to_lowercase(), path.to_string()))
}

fn is_github_host(host: &str, configured: Option<&str>) -> bool {
    host == "github.com"
        || host.ends_with(".github.com")
        || configured.is_some_and(|h| h.eq_ignore_ascii_case(host))
        || host.split('.').next() == Some("github")
}

fn platform_for_host(host: &str, configured: Option<&str>) -> Option<Platform> {
    is_github_host(host, configured).then_some(Platform::GitHub)
}

/// Detect the hosting platform of a remote URL.
///
/// `GH_HOST` names an additional GitHub Enterprise host.
pub fn detect_platform(url: &str) -> Option<Platform> {
    let configured = std::env::var("GH_HOST").ok();
    let (host, _) = split_remote(url)?;
    platform_for_host(&host, configured.as_deref())
}

/// Parse owner, repository and host from a remote URL
///
/// # Errors
/// - [`Error::NoSupportedRemotes`] if the URL cannot be parsed at all
/// - [`Error::InvalidRemoteUrl`] if the host is not a supported platform or
///   the path is not `owner/repo`
pub fn parse_repo_info(url: &str) -> Result<PlatformConfig> {
    let configured = std::env::var("GH_HOST").ok();
    parse_with_host(url, configured.as_deref())
}

fn parse_with_host(url: &str, configured: Option<&str>) -> Result<PlatformConfig> {
    let (host, path) = split_remote(url).ok_or(Error::NoSupportedRemotes)?;
    let platform = platform_for_host(&host, configured)
        .ok_or_else(|| Error::InvalidRemoteUrl(url.to_string()))?;

    let mut parts = path.split('/');
    let (Some(owner), Some(repo), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::InvalidRemoteUrl(url.to_string()));
    };
    if owner.is_empty() || repo.is_empty() {
        return Err(Error::InvalidRemoteUrl(url.to_string()));
    }

    let host = (host != "github.com").then_some(host);
    Ok(PlatformConfig {
        platform,
        owner: owner.to_string(),
        repo: repo.to_string(),
        host,
    })
}
