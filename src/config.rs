//! Configuration loading
//!
//! Settings come from `~/.config/mergeexp/config.toml` (or an explicit path),
//! then environment variables, then CLI flags. The resulting [`Config`] is
//! handed to each component explicitly.
//!
//! ```toml
//! [bitbucket]
//! username = "builder"
//! app_password = "..."
//! deployment_key = "/home/builder/.ssh/deploy"
//!
//! [gitlab]
//! clone_base = "git@gitlab.example.com"
//!
//! [merge]
//! conflict_retries = 4
//! final_message_suffix = "NOTESTS"
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config directory name under the platform config dir
const CONFIG_DIR_NAME: &str = "mergeexp";

/// Config file name
const CONFIG_FILE: &str = "config.toml";

/// Conflict resolution rounds allowed when none is configured
pub const DEFAULT_CONFLICT_RETRIES: u32 = 4;

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bitbucket REST and clone settings
    pub bitbucket: BitbucketConfig,
    /// GitLab clone settings
    pub gitlab: GitLabConfig,
    /// Merge orchestration settings
    pub merge: MergeConfig,
}

/// Bitbucket settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BitbucketConfig {
    /// Account used for REST basic authentication
    pub username: Option<String>,
    /// App password for that account
    pub app_password: Option<String>,
    /// REST API root, defaults to Bitbucket Cloud
    pub api_root: Option<String>,
    /// SSH clone base (`git@bitbucket.org` by default)
    pub clone_base: Option<String>,
    /// SSH key used when fetching Bitbucket remotes
    pub deployment_key: Option<PathBuf>,
}

/// GitLab settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitLabConfig {
    /// SSH clone base, e.g. `git@gitlab.example.com`
    pub clone_base: Option<String>,
}

/// Merge orchestration settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Conflict resolution rounds before giving up (0 means the default)
    pub conflict_retries: u32,
    /// Appended to the title of the final summary commit
    pub final_message_suffix: Option<String>,
}

impl MergeConfig {
    /// Effective retry limit
    pub const fn retry_limit(&self) -> u32 {
        if self.conflict_retries == 0 {
            DEFAULT_CONFLICT_RETRIES
        } else {
            self.conflict_retries
        }
    }
}

impl Config {
    /// Parse TOML config text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("invalid config: {e}")))
    }

    /// Apply environment overrides from the process environment
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides using `lookup` to read variables
    #[must_use]
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup("BITBUCKET_DEPLOYMENT_KEY").filter(|v| !v.is_empty()) {
            self.bitbucket.deployment_key = Some(PathBuf::from(key));
        }
        if let Some(base) = lookup("GITLAB_CLONE_BASE").filter(|v| !v.is_empty()) {
            self.gitlab.clone_base = Some(base);
        }
        self
    }
}

/// Default config file location
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE))
}

/// Load configuration.
///
/// An explicit `path` must exist; the default location is optional and yields
/// defaults when absent.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match config_path() {
            Some(p) => (p, false),
            None => return Ok(Config::default()),
        },
    };

    if !path.exists() {
        if required {
            return Err(Error::Config(format!(
                "config file {} not found",
                path.display()
            )));
        }
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
    Config::from_toml(&content)
}
