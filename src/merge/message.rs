//! Commit messages, prompts and reports
//!
//! Pure string construction, kept apart from the effectful merge loop.

use std::fmt::Write;

/// Longest ref name shown in the shell prompt
const PROMPT_NAME_MAX: usize = 40;

/// Commit message for merging a ref with `label`
pub fn merge_message(label: &str) -> String {
    format!("Experimental merge of {label}")
}

/// Commit message when git's rerere resolved the conflicts on its own
pub fn rerere_message(message: &str) -> String {
    format!("{message} with resolved conflict(s) using rerere")
}

/// Progress line for merge `index` (zero-based) of `total`
pub fn progress_message(index: usize, total: usize, label: &str) -> String {
    format!("Merging {} of {total} ({label})", index + 1)
}

/// Report shown to the operator before handing over the shell
pub fn conflict_report(name: &str, files: &[String]) -> String {
    format!(
        "Conflict in {name}, you have unmerged files:\n{}\nResolve conflict, commit (or just add the files) and exit the shell (CTRL+D)",
        files.join("\n")
    )
}

/// Shell prompt naming the ref, its position and the retry round
pub fn conflict_prompt(name: &str, index: usize, total: usize, retry: u32, limit: u32) -> String {
    let name = if name.chars().count() > PROMPT_NAME_MAX {
        let head: String = name.chars().take(PROMPT_NAME_MAX - 3).collect();
        format!("{head}...")
    } else {
        name.to_string()
    };

    let mut prompt = format!("Merging {} of {total} ({name})", index + 1);
    if retry > 0 {
        let _ = write!(prompt, " (retry {retry} of {limit})");
    }
    prompt.push_str("$ ");
    prompt
}

/// Message of the summary commit closing an experimental build.
///
/// `merges` is the first-parent one-line log since `previous`, `not_included`
/// the non-merge commits missing from it.
pub fn final_message(
    previous: &str,
    suffix: Option<&str>,
    merges: &str,
    not_included: &str,
) -> String {
    let mut title = "Experimental merge".to_string();
    if let Some(suffix) = suffix.filter(|s| !s.is_empty()) {
        title.push(' ');
        title.push_str(suffix);
    }

    format!(
        "{title}\n{merges}\n\nCommit(s) included in this merge not present in last {previous} branch:\n\n{not_included}"
    )
}
