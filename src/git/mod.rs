//! Git working tree access
//!
//! All version-control work is delegated to the `git` binary. The exit status
//! and stdout of each subprocess are the only contract; stderr is captured for
//! error context.

mod remotes;
mod shell;
mod version_tag;

pub use remotes::{DEFAULT_REMOTE_PREFIX, RemoteRegistry};
pub use shell::{BashSession, InteractiveSession};
pub use version_tag::{VersionTag, highest_version_tag, parse_version_tag, select_highest};

use crate::error::{Error, Result};
use crate::types::GitRemote;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Operations the merge orchestrator and remote registry need from git
///
/// Implemented by [`GitDir`] for real repositories; tests substitute a
/// scripted implementation.
pub trait Vcs: Send + Sync {
    /// List configured remotes with their URLs
    fn remotes(&self) -> Result<Vec<GitRemote>>;

    /// Register a new remote
    fn add_remote(&self, name: &str, url: &str) -> Result<()>;

    /// Fetch (with prune) from a remote, optionally through a specific SSH key
    fn fetch(&self, remote: &str, ssh_key: Option<&Path>) -> Result<()>;

    /// Run a no-fast-forward merge of `reference` with `message`.
    ///
    /// Returns `Ok(false)` when git reports the merge did not complete
    /// (conflicts), which is a signal rather than a failure.
    fn merge_no_ff(&self, reference: &str, message: &str) -> Result<bool>;

    /// Paths with unresolved conflicts (empty when none)
    fn unmerged_files(&self) -> Result<Vec<String>>;

    /// Whether a merge is still in progress (`MERGE_HEAD` present)
    fn merge_in_progress(&self) -> Result<bool>;

    /// Commit the index with `message`
    fn commit(&self, message: &str) -> Result<()>;
}

/// A git working tree
#[derive(Debug, Clone)]
pub struct GitDir {
    dir: PathBuf,
}

impl GitDir {
    /// Open a working directory, which must exist and be a directory
    pub fn open(path: &Path) -> Result<Self> {
        let dir = std::fs::canonicalize(path).map_err(|e| {
            Error::Config(format!("invalid directory '{}': {e}", path.display()))
        })?;
        if !dir.is_dir() {
            return Err(Error::Config(format!(
                "file '{}' not a directory",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    /// Path of the working directory
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// A `git` command rooted in this working directory
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.dir);
        cmd
    }

    fn exec(&self, mut cmd: Command, args: &[&str]) -> Result<Output> {
        debug!(args = ?args, "running git");
        Ok(cmd.output()?)
    }

    fn check(output: Output, args: &[&str]) -> Result<Output> {
        if output.status.success() {
            return Ok(output);
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            format!("exited with {}", output.status)
        } else {
            stderr
        };
        Err(Error::Git {
            command: args.join(" "),
            message,
        })
    }

    /// Run git, failing on non-zero exit
    fn run(&self, args: &[&str]) -> Result<()> {
        let output = self.exec(self.command(args), args)?;
        Self::check(output, args).map(|_| ())
    }

    /// Run git and return its stdout, failing on non-zero exit
    pub fn output(&self, args: &[&str]) -> Result<String> {
        let output = self.exec(self.command(args), args)?;
        let output = Self::check(output, args)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run git where the exit status is the answer, not an error
    fn succeeds(&self, args: &[&str]) -> Result<bool> {
        let output = self.exec(self.command(args), args)?;
        Ok(output.status.success())
    }

    /// Make sure the directory is a repository, initialising one if needed
    pub fn git_init(&self) -> Result<()> {
        if self.succeeds(&["status"])? {
            return Ok(());
        }
        self.run(&["init"])
    }

    /// Current branch name, `None` when HEAD is detached
    pub fn current_branch(&self) -> Result<Option<String>> {
        let args = ["symbolic-ref", "--short", "HEAD"];
        let output = self.exec(self.command(&args), &args)?;
        if output.status.success() {
            return Ok(Some(
                String::from_utf8_lossy(&output.stdout).trim().to_string(),
            ));
        }
        if String::from_utf8_lossy(&output.stderr).contains("not a symbolic ref") {
            return Ok(None);
        }
        Self::check(output, &args).map(|_| None)
    }

    /// Whether `status --porcelain` reports nothing
    pub fn is_clean(&self) -> Result<bool> {
        Ok(self.output(&["status", "--porcelain"])?.is_empty())
    }

    /// Create or recreate `branch` at `target` and check it out.
    ///
    /// When already on `branch` the tree is hard reset to `target`, discarding
    /// local changes. On any other branch the working tree must be clean.
    pub fn start_experimental_branch(&self, branch: &str, target: &str) -> Result<()> {
        let current = self.current_branch()?;

        if current.as_deref() == Some(branch) {
            debug!(branch, target, "already on experimental branch, resetting");
            return self.run(&["reset", "--hard", target]);
        }

        if !self.is_clean()? {
            return Err(Error::DirtyWorkingTree {
                dir: self.dir.clone(),
                current: current.unwrap_or_default(),
                branch: branch.to_string(),
            });
        }

        self.run(&["branch", "-f", branch, target])?;
        self.run(&["checkout", branch])
    }

    /// Whether `sha` names an object in the local repository
    pub fn sha_exists(&self, sha: &str) -> bool {
        self.succeeds(&["cat-file", "-t", sha]).unwrap_or(false)
    }

    /// Whether `name` resolves to a branch (local or remote-tracking)
    pub fn branch_exists(&self, name: &str) -> bool {
        self.succeeds(&["show-branch", name]).unwrap_or(false)
    }

    /// Commit id `reference` points to on `url`, `None` when not advertised
    pub fn ls_remote(&self, url: &str, reference: &str) -> Result<Option<String>> {
        let out = self.output(&["ls-remote", url, reference])?;
        Ok(out.split_whitespace().next().map(ToString::to_string))
    }

    /// Fetch a single refspec straight from a URL
    pub fn fetch_url(&self, url: &str, refspec: &str) -> Result<()> {
        self.run(&["fetch", url, refspec])
    }

    /// Commit even when nothing is staged
    pub fn commit_allow_empty(&self, message: &str) -> Result<()> {
        self.run(&["commit", "--allow-empty", "--message", message])
    }
}

impl Vcs for GitDir {
    fn remotes(&self) -> Result<Vec<GitRemote>> {
        let args = ["config", "--get-regexp", r"^remote\..*\.url$"];
        let output = self.exec(self.command(&args), &args)?;
        // exit code 1 means no remote is configured
        if output.status.code() == Some(1) {
            return Ok(Vec::new());
        }
        let output = Self::check(output, &args)?;
        Ok(parse_remote_config(&String::from_utf8_lossy(&output.stdout)))
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.run(&["remote", "add", name, url])
    }

    fn fetch(&self, remote: &str, ssh_key: Option<&Path>) -> Result<()> {
        let args = ["fetch", "--prune", remote];
        let mut cmd = self.command(&args);
        if let Some(key) = ssh_key {
            cmd.env("GIT_SSH_COMMAND", format!("ssh -i {}", key.display()));
        }
        let output = self.exec(cmd, &args)?;
        Self::check(output, &args).map(|_| ())
    }

    fn merge_no_ff(&self, reference: &str, message: &str) -> Result<bool> {
        self.succeeds(&["merge", "--no-ff", "--log", "-m", message, reference])
    }

    fn unmerged_files(&self) -> Result<Vec<String>> {
        let out = self.output(&["diff", "--name-only", "--diff-filter=U"])?;
        Ok(split_lines(&out))
    }

    fn merge_in_progress(&self) -> Result<bool> {
        self.succeeds(&["rev-parse", "-q", "--verify", "MERGE_HEAD"])
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message])
    }
}

/// Non-empty lines of subprocess output
pub fn split_lines(out: &str) -> Vec<String> {
    out.lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Parse `git config --get-regexp '^remote\..*\.url$'` output
fn parse_remote_config(out: &str) -> Vec<GitRemote> {
    out.lines()
        .filter_map(|line| {
            let (key, url) = line.split_once(' ')?;
            let name = key.strip_prefix("remote.")?.strip_suffix(".url")?;
            Some(GitRemote {
                name: name.to_string(),
                url: url.trim().to_string(),
            })
        })
        .collect()
}
