//! CLI commands

pub mod build;
pub mod context;
pub mod search;
pub mod style;
pub mod tag;

use anstream::println;
use mergeexp::progress::ProgressCallback;
use mergeexp::types::MergeRef;
use style::Stylize;

/// Progress output on the terminal
pub struct CliProgress;

impl ProgressCallback for CliProgress {
    fn on_message(&self, message: &str) {
        println!("{}", message.emphasis());
    }

    fn on_conflict(&self, reference: &MergeRef, files: &[String]) {
        println!(
            "{} {}, you have unmerged files:",
            "Conflict in".warn(),
            reference.name.accent()
        );
        for file in files {
            println!("  {}", file.warn());
        }
        println!(
            "{}",
            "Resolve conflict, commit (or just add the files) and exit the shell (CTRL+D)".muted()
        );
    }
}

/// Print collected refs, one per line
pub fn print_refs(refs: &[MergeRef]) {
    for (i, r) in refs.iter().enumerate() {
        println!(
            "  {} {} {}",
            format!("{}.", i + 1).muted(),
            r.label,
            format!("({})", r.name).muted()
        );
    }
}
