//! Operator-facing progress reporting

use crate::types::MergeRef;

/// Receives progress messages from long-running operations
///
/// The library never prints; the CLI renders these messages.
pub trait ProgressCallback {
    /// A plain progress message
    fn on_message(&self, message: &str);

    /// A merge stopped with unresolved files
    fn on_conflict(&self, reference: &MergeRef, files: &[String]) {
        self.on_message(&crate::merge::conflict_report(&reference.name, files));
    }
}

/// Discards all progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_message(&self, _message: &str) {}
}
