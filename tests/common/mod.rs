//! Shared test utilities

#![allow(dead_code, unused_imports)]

mod mock_search;
mod mock_vcs;
mod temp_repo;

pub use mock_search::{MockPullRequestSearch, SearchCall};
pub use mock_vcs::{
    FetchCall, MergeCall, MockVcs, RecordingProgress, ScriptedSession, SessionAction,
};
pub use temp_repo::TempGitRepo;

use mergeexp::types::{MergeRef, PullRequest};

/// Merge ref whose name and label are both derived from `name`
pub fn make_ref(name: &str) -> MergeRef {
    MergeRef::new(name, format!("L-{name}"))
}

/// Pull request from `fullname` proposing `branch`
pub fn make_pr(id: u64, fullname: &str, branch: &str) -> PullRequest {
    PullRequest {
        id,
        source_branch: branch.to_string(),
        source_fullname: fullname.to_string(),
    }
}
