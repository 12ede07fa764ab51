//! Core types for mergeexp

use serde::{Deserialize, Serialize};

/// A unit the merge orchestrator can merge into the experimental branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRef {
    /// Reference git can merge (`<remote>/<branch>` or a commit id)
    pub name: String,
    /// Human-readable description used in progress output and commit messages
    pub label: String,
    /// Remote alias the ref was fetched from
    pub remote: Option<String>,
    /// Branch name on that remote
    pub localname: Option<String>,
}

impl MergeRef {
    /// Ref that was not fetched from a named remote branch (e.g. a commit id)
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            remote: None,
            localname: None,
        }
    }

    /// Ref for `branch` fetched through remote alias `remote`
    pub fn remote_branch(remote: &str, branch: &str, label: impl Into<String>) -> Self {
        Self {
            name: format!("{remote}/{branch}"),
            label: label.into(),
            remote: Some(remote.to_string()),
            localname: Some(branch.to_string()),
        }
    }
}

impl std::fmt::Display for MergeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label, self.name)
    }
}

/// An open pull request that qualified for the experimental branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR id, unique within the source system
    pub id: u64,
    /// Branch the PR is proposed from
    pub source_branch: String,
    /// Full name of the repository owning the source branch
    pub source_fullname: String,
}

/// A comment on a pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrComment {
    /// Raw comment text
    pub raw: String,
}

/// A git remote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRemote {
    /// Remote name (e.g., "origin")
    pub name: String,
    /// Remote URL
    pub url: String,
}

/// Hosting platform of a source repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    /// Bitbucket Cloud
    Bitbucket,
    /// GitLab or self-hosted GitLab
    GitLab,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bitbucket => write!(f, "Bitbucket"),
            Self::GitLab => write!(f, "Gitlab"),
        }
    }
}

/// Explicitly requested branch, parsed from `FULLNAME:BRANCH`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSpec {
    /// Repository full name (e.g. `workspace/repo`)
    pub fullname: String,
    /// Branch within that repository
    pub branch: String,
}

impl std::str::FromStr for BranchSpec {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((fullname, branch)) if !fullname.is_empty() && !branch.is_empty() => Ok(Self {
                fullname: fullname.to_string(),
                branch: branch.to_string(),
            }),
            _ => Err(crate::error::Error::InvalidBranchSpec(s.to_string())),
        }
    }
}
