//! Scripted git working tree for merge and remote tests
//!
//! `MockVcs` keeps just enough state to drive the merge loop: the remotes, the
//! unmerged files and whether a merge is pending. `ScriptedSession` stands in
//! for the operator and changes that state the way a person in the shell would.

use mergeexp::error::{Error, Result};
use mergeexp::git::{InteractiveSession, Vcs};
use mergeexp::progress::ProgressCallback;
use mergeexp::types::{GitRemote, MergeRef};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Call record for `merge_no_ff`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCall {
    pub reference: String,
    pub message: String,
}

/// Call record for `fetch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub remote: String,
    pub ssh_key: Option<PathBuf>,
}

/// In-memory `Vcs`
///
/// Features:
/// - Configurable conflicts per ref (with or without unmerged files)
/// - Call tracking for verification
/// - Error injection on fetch and commit
#[derive(Default)]
pub struct MockVcs {
    remotes: Mutex<Vec<GitRemote>>,
    conflicts: Mutex<HashMap<String, Vec<String>>>,
    unmerged: Mutex<Vec<String>>,
    merge_head: Mutex<bool>,
    // Call tracking
    merge_calls: Mutex<Vec<MergeCall>>,
    commit_calls: Mutex<Vec<String>>,
    fetch_calls: Mutex<Vec<FetchCall>>,
    add_remote_calls: Mutex<Vec<GitRemote>>,
    // Error injection
    failing_fetches: Mutex<HashSet<String>>,
    error_on_commit: Mutex<Option<String>>,
}

impl MockVcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `remotes` already configured
    pub fn with_remotes(remotes: &[(&str, &str)]) -> Self {
        let vcs = Self::new();
        *vcs.remotes.lock().unwrap() = remotes
            .iter()
            .map(|(name, url)| GitRemote {
                name: (*name).to_string(),
                url: (*url).to_string(),
            })
            .collect();
        vcs
    }

    /// Merging `reference` stops with `files` unmerged
    pub fn set_conflict(&self, reference: &str, files: &[&str]) {
        self.conflicts.lock().unwrap().insert(
            reference.to_string(),
            files.iter().map(ToString::to_string).collect(),
        );
    }

    /// Merging `reference` stops, but rerere leaves nothing unmerged
    pub fn set_auto_resolved(&self, reference: &str) {
        self.conflicts
            .lock()
            .unwrap()
            .insert(reference.to_string(), Vec::new());
    }

    pub fn fail_fetch(&self, remote: &str) {
        self.failing_fetches
            .lock()
            .unwrap()
            .insert(remote.to_string());
    }

    pub fn fail_commit(&self, message: &str) {
        *self.error_on_commit.lock().unwrap() = Some(message.to_string());
    }

    /// Operator resolved every file (`git add`)
    pub fn resolve_all(&self) {
        self.unmerged.lock().unwrap().clear();
    }

    /// Operator committed the merge themselves
    pub fn commit_merge(&self) {
        self.unmerged.lock().unwrap().clear();
        *self.merge_head.lock().unwrap() = false;
    }

    /// Operator ran `git merge --abort`
    pub fn abort_merge(&self) {
        self.commit_merge();
    }

    pub fn remote_list(&self) -> Vec<GitRemote> {
        self.remotes.lock().unwrap().clone()
    }

    pub fn get_merge_calls(&self) -> Vec<MergeCall> {
        self.merge_calls.lock().unwrap().clone()
    }

    pub fn get_commit_calls(&self) -> Vec<String> {
        self.commit_calls.lock().unwrap().clone()
    }

    pub fn get_fetch_calls(&self) -> Vec<FetchCall> {
        self.fetch_calls.lock().unwrap().clone()
    }

    pub fn get_add_remote_calls(&self) -> Vec<GitRemote> {
        self.add_remote_calls.lock().unwrap().clone()
    }

    pub fn merged_refs(&self) -> Vec<String> {
        self.get_merge_calls()
            .into_iter()
            .map(|c| c.reference)
            .collect()
    }
}

impl Vcs for MockVcs {
    fn remotes(&self) -> Result<Vec<GitRemote>> {
        Ok(self.remote_list())
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        let remote = GitRemote {
            name: name.to_string(),
            url: url.to_string(),
        };
        let mut remotes = self.remotes.lock().unwrap();
        if remotes.iter().any(|r| r.name == name) {
            return Err(Error::Git {
                command: format!("remote add {name} {url}"),
                message: format!("error: remote {name} already exists."),
            });
        }
        remotes.push(remote.clone());
        self.add_remote_calls.lock().unwrap().push(remote);
        Ok(())
    }

    fn fetch(&self, remote: &str, ssh_key: Option<&Path>) -> Result<()> {
        self.fetch_calls.lock().unwrap().push(FetchCall {
            remote: remote.to_string(),
            ssh_key: ssh_key.map(Path::to_path_buf),
        });
        if self.failing_fetches.lock().unwrap().contains(remote) {
            return Err(Error::Git {
                command: format!("fetch --prune {remote}"),
                message: "fatal: Could not read from remote repository.".to_string(),
            });
        }
        Ok(())
    }

    fn merge_no_ff(&self, reference: &str, message: &str) -> Result<bool> {
        self.merge_calls.lock().unwrap().push(MergeCall {
            reference: reference.to_string(),
            message: message.to_string(),
        });
        let conflict = self.conflicts.lock().unwrap().get(reference).cloned();
        match conflict {
            Some(files) => {
                *self.unmerged.lock().unwrap() = files;
                *self.merge_head.lock().unwrap() = true;
                Ok(false)
            }
            None => Ok(true),
        }
    }

    fn unmerged_files(&self) -> Result<Vec<String>> {
        Ok(self.unmerged.lock().unwrap().clone())
    }

    fn merge_in_progress(&self) -> Result<bool> {
        Ok(*self.merge_head.lock().unwrap())
    }

    fn commit(&self, message: &str) -> Result<()> {
        if let Some(err) = self.error_on_commit.lock().unwrap().as_ref() {
            return Err(Error::Git {
                command: "commit".to_string(),
                message: err.clone(),
            });
        }
        self.commit_calls.lock().unwrap().push(message.to_string());
        *self.merge_head.lock().unwrap() = false;
        Ok(())
    }
}

/// What the operator does in one shell session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Exit without touching anything
    Nothing,
    /// Resolve and stage every file, leaving the commit to the tool
    Resolve,
    /// Resolve and commit the merge
    ResolveAndCommit,
    /// Abort the merge
    Abort,
    /// The shell cannot be started
    Fail,
}

/// Operator stand-in replaying scripted actions against a `MockVcs`
///
/// Once the script runs out every further session does nothing.
pub struct ScriptedSession<'a> {
    vcs: &'a MockVcs,
    actions: Mutex<VecDeque<SessionAction>>,
    prompts: Mutex<Vec<String>>,
}

impl<'a> ScriptedSession<'a> {
    pub fn new(vcs: &'a MockVcs, actions: &[SessionAction]) -> Self {
        Self {
            vcs,
            actions: Mutex::new(actions.iter().copied().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Session that must never be started
    pub fn idle(vcs: &'a MockVcs) -> Self {
        Self::new(vcs, &[])
    }

    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl InteractiveSession for ScriptedSession<'_> {
    fn run(&self, prompt: &str) -> Result<()> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let action = self
            .actions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(SessionAction::Nothing);
        match action {
            SessionAction::Nothing => {}
            SessionAction::Resolve => self.vcs.resolve_all(),
            SessionAction::ResolveAndCommit => self.vcs.commit_merge(),
            SessionAction::Abort => self.vcs.abort_merge(),
            SessionAction::Fail => {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "bash: command not found",
                )));
            }
        }
        Ok(())
    }
}

/// Progress callback recording everything it is told
#[derive(Default)]
pub struct RecordingProgress {
    messages: Mutex<Vec<String>>,
    conflicts: Mutex<Vec<(String, Vec<String>)>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn get_conflicts(&self) -> Vec<(String, Vec<String>)> {
        self.conflicts.lock().unwrap().clone()
    }
}

impl ProgressCallback for RecordingProgress {
    fn on_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn on_conflict(&self, reference: &MergeRef, files: &[String]) {
        self.conflicts
            .lock()
            .unwrap()
            .push((reference.name.clone(), files.to_vec()));
    }
}
