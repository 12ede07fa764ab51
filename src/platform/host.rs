//! Clone URLs and remote naming for source repositories

use crate::config::{BitbucketConfig, GitLabConfig};
use crate::error::{Error, Result};
use crate::types::Platform;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Default SSH clone base for Bitbucket Cloud
pub const BITBUCKET_CLONE_BASE: &str = "git@bitbucket.org";

static NON_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^-\w]+").expect("valid remote name regex"));

/// Where source repositories of one platform are cloned from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceHost {
    platform: Platform,
    clone_base: String,
    deployment_key: Option<PathBuf>,
}

impl SourceHost {
    /// Bitbucket host, falling back to [`BITBUCKET_CLONE_BASE`]
    pub fn bitbucket(config: &BitbucketConfig) -> Self {
        Self {
            platform: Platform::Bitbucket,
            clone_base: config
                .clone_base
                .clone()
                .unwrap_or_else(|| BITBUCKET_CLONE_BASE.to_string()),
            deployment_key: config.deployment_key.clone(),
        }
    }

    /// GitLab host; there is no public default, so the clone base is required
    pub fn gitlab(config: &GitLabConfig) -> Result<Self> {
        let clone_base = config
            .clone_base
            .clone()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| {
                Error::Config(
                    "missing gitlab clone base (set gitlab.clone_base or GITLAB_CLONE_BASE)"
                        .to_string(),
                )
            })?;
        Ok(Self {
            platform: Platform::GitLab,
            clone_base,
            deployment_key: None,
        })
    }

    /// Platform of this host
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// SSH key used for fetches, if any
    pub fn deployment_key(&self) -> Option<&Path> {
        self.deployment_key.as_deref()
    }

    /// Clone URL of repository `fullname`
    pub fn clone_url(&self, fullname: &str) -> String {
        format!("{}:{}.git", self.clone_base, fullname)
    }

    /// Progress label for an explicitly requested branch
    pub fn branch_label(&self, fullname: &str, branch: &str) -> String {
        format!("{} {fullname} branch {branch}", self.platform)
    }
}

/// Remote alias suggestion for repository `fullname`
pub fn remote_suggestion(fullname: &str) -> String {
    NON_NAME_CHARS.replace_all(fullname, "-").into_owned()
}
