//! Merge engine for experimental branches
//!
//! Split like the rest of the crate:
//! 1. Message - commit messages, prompts and reports (pure, testable)
//! 2. Execute - sequential merging with interactive conflict resolution
//! 3. Finalize - optional summary commit against the previous build

mod execute;
mod finalize;
mod message;

pub use execute::{MergeExecutionResult, MergeOutcome, MergedRef, Merger};
pub use finalize::final_commit;
pub use message::{
    conflict_prompt, conflict_report, final_message, merge_message, progress_message,
    rerere_message,
};
