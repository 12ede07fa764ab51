//! Deployment directives in pull request comments
//!
//! Operators opt a pull request in or out of a deployment tag by writing
//! `deployment: <tag>` or `deployment: no-<tag>` in a comment. The last
//! directive for a requested tag wins, both within one comment and across the
//! whole comment thread.

use regex::Regex;
use std::sync::LazyLock;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bdeployment:\s*(?:(no)-)?(\S+)").expect("valid directive regex")
});

/// A single `deployment:` marker found in comment text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentDirective {
    /// Tag named by the directive
    pub tag: String,
    /// `false` when the tag was negated with `no-`
    pub included: bool,
}

/// All directives in `text`, in order of appearance
pub fn parse_directives(text: &str) -> Vec<DeploymentDirective> {
    DIRECTIVE
        .captures_iter(text)
        .filter_map(|caps| {
            Some(DeploymentDirective {
                tag: caps.get(2)?.as_str().to_string(),
                included: caps.get(1).is_none(),
            })
        })
        .collect()
}

/// Decision a comment makes for any of the requested `tags`.
///
/// `None` means the comment does not mention a requested tag (undecided);
/// `Some(included)` is the last matching directive.
pub fn test_comment<S: AsRef<str>>(text: &str, tags: &[S]) -> Option<bool> {
    parse_directives(text)
        .into_iter()
        .rev()
        .find(|d| tags.iter().any(|t| t.as_ref() == d.tag))
        .map(|d| d.included)
}

/// Fold comments in the order returned; later decisions override earlier ones.
///
/// Starts from `current` so a thread split across pages can be folded page by
/// page.
pub fn fold_comments<'c, S, I>(current: Option<bool>, comments: I, tags: &[S]) -> Option<bool>
where
    S: AsRef<str>,
    I: IntoIterator<Item = &'c str>,
{
    comments
        .into_iter()
        .fold(current, |acc, text| test_comment(text, tags).or(acc))
}
