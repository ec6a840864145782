//! User configuration in `<config dir>/git-chain/config.toml`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the platform config dir.
const CONFIG_DIR: &str = "git-chain";

/// Filename for the configuration.
const CONFIG_FILE: &str = "config.toml";

/// Settings that CLI flags can override
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Remote whose URL identifies the hosted repository
    pub remote: String,
    /// Maximum requests in flight while fetching PRs and reviews
    pub concurrency: usize,
    /// Trim shared history when planning rebases
    pub trim_shared_history: bool,
    /// Run rebases interactively
    pub interactive_rebase: bool,
    /// Also fetch closed PRs for `print`
    pub include_closed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            concurrency: 3,
            trim_shared_history: false,
            interactive_rebase: true,
            include_closed: false,
        }
    }
}

/// Default location of the configuration file, if the platform has one.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load the configuration from its default location.
///
/// Returns defaults if there is no config directory or no file.
pub fn load_config() -> Result<Config> {
    config_path().map_or_else(|| Ok(Config::default()), |path| load_config_from(&path))
}

/// Load the configuration from `path`.
///
/// Returns defaults if the file doesn't exist.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

    if config.concurrency == 0 {
        return Err(Error::Config(format!(
            "{}: concurrency must be at least 1",
            path.display()
        )));
    }

    Ok(config)
}
