//! Merge execution - effectful operations
//!
//! Refs are merged one at a time, in the order given, into the current
//! checkout. A failed merge enters conflict resolution: while unmerged files
//! remain, the operator gets an interactive shell; once they are gone the
//! pending merge (if any) is committed. The first fatal error stops the run
//! and later refs are never attempted.

use crate::error::{Error, Result};
use crate::git::{InteractiveSession, Vcs};
use crate::merge::message::{conflict_prompt, merge_message, progress_message, rerere_message};
use crate::progress::ProgressCallback;
use crate::types::MergeRef;
use tracing::{debug, info, warn};

/// How a single ref ended up merged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The merge command succeeded on its own
    Clean,
    /// The merge stopped but rerere left no unmerged files
    AutoResolved,
    /// The operator resolved the conflicts and the merge was committed
    Resolved {
        /// Interactive sessions it took
        rounds: u32,
    },
    /// No merge was pending after resolution (aborted or already committed)
    NoCommit {
        /// Interactive sessions it took
        rounds: u32,
    },
}

/// A ref together with how it was merged
#[derive(Debug, Clone)]
pub struct MergedRef {
    /// The merged ref
    pub reference: MergeRef,
    /// How it was merged
    pub outcome: MergeOutcome,
}

/// Result of merge execution
#[derive(Debug, Clone, Default)]
pub struct MergeExecutionResult {
    /// Refs merged, in order
    pub merged: Vec<MergedRef>,
}

impl MergeExecutionResult {
    /// Number of refs that needed any conflict handling
    #[must_use]
    pub fn conflict_count(&self) -> usize {
        self.merged
            .iter()
            .filter(|m| m.outcome != MergeOutcome::Clean)
            .count()
    }
}

/// Sequential merge orchestrator
pub struct Merger<'a> {
    vcs: &'a dyn Vcs,
    session: &'a dyn InteractiveSession,
    progress: &'a dyn ProgressCallback,
    retry_limit: u32,
}

impl<'a> Merger<'a> {
    /// Create an orchestrator allowing `retry_limit` resolution retries per ref
    pub fn new(
        vcs: &'a dyn Vcs,
        session: &'a dyn InteractiveSession,
        progress: &'a dyn ProgressCallback,
        retry_limit: u32,
    ) -> Self {
        Self {
            vcs,
            session,
            progress,
            retry_limit,
        }
    }

    /// Merge `refs` in order, stopping at the first fatal error
    pub fn merge_branches(&self, refs: &[MergeRef]) -> Result<MergeExecutionResult> {
        let mut result = MergeExecutionResult::default();
        let total = refs.len();

        for (index, reference) in refs.iter().enumerate() {
            self.progress
                .on_message(&progress_message(index, total, &reference.label));
            info!(index = index + 1, total, name = %reference.name, "merging");

            let outcome = self.merge_branch(reference, index, total)?;
            debug!(name = %reference.name, ?outcome, "merged");

            result.merged.push(MergedRef {
                reference: reference.clone(),
                outcome,
            });
        }

        Ok(result)
    }

    fn merge_branch(&self, reference: &MergeRef, index: usize, total: usize) -> Result<MergeOutcome> {
        let message = merge_message(&reference.label);
        if self.vcs.merge_no_ff(&reference.name, &message)? {
            return Ok(MergeOutcome::Clean);
        }
        self.resolve_conflict(reference, &message, index, total)
    }

    fn resolve_conflict(
        &self,
        reference: &MergeRef,
        message: &str,
        index: usize,
        total: usize,
    ) -> Result<MergeOutcome> {
        let mut retry = 0;

        loop {
            let unmerged = self.vcs.unmerged_files()?;
            if unmerged.is_empty() {
                break;
            }

            if retry > self.retry_limit {
                warn!(name = %reference.name, retry, "giving up on conflict resolution");
                return Err(Error::ConflictRetriesExhausted {
                    reference: reference.name.clone(),
                    attempts: retry,
                });
            }

            info!(name = %reference.name, files = unmerged.len(), retry, "conflict, handing over to operator");
            self.progress.on_conflict(reference, &unmerged);

            let prompt = conflict_prompt(&reference.name, index, total, retry, self.retry_limit);
            self.session.run(&prompt)?;
            retry += 1;
        }

        if !self.vcs.merge_in_progress()? {
            debug!(name = %reference.name, "no merge in progress, nothing to commit");
            return Ok(MergeOutcome::NoCommit { rounds: retry });
        }

        if retry == 0 {
            self.vcs.commit(&rerere_message(message))?;
            Ok(MergeOutcome::AutoResolved)
        } else {
            self.vcs.commit(message)?;
            Ok(MergeOutcome::Resolved { rounds: retry })
        }
    }
}
