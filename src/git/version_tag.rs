//! Semantic version tags advertised by a remote

use super::GitDir;
use crate::error::Result;
use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;
use tracing::debug;

static VERSION_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:.*/)?(\d+)\.(\d+)\.(\d+)(\^\{\})?$").expect("valid version regex")
});

/// A `MAJOR.MINOR.PATCH` tag and the commit it points to
///
/// Ordering compares the version numbers, then ranks a peeled entry (the
/// commit an annotated tag points to) above the tag object itself.
#[derive(Debug, Clone)]
pub struct VersionTag {
    /// Major version
    pub major: u64,
    /// Minor version
    pub minor: u64,
    /// Patch version
    pub patch: u64,
    /// Object id from the listing
    pub sha: String,
    /// Tag ref without the peel marker (e.g. `refs/tags/1.2.0`)
    pub reference: String,
    peeled: bool,
}

impl VersionTag {
    /// Whether this entry is the dereferenced commit of an annotated tag
    pub const fn is_peeled(&self) -> bool {
        self.peeled
    }

    const fn key(&self) -> (u64, u64, u64, bool) {
        (self.major, self.minor, self.patch, self.peeled)
    }
}

impl std::fmt::Display for VersionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl PartialEq for VersionTag {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for VersionTag {}

impl PartialOrd for VersionTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionTag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Parse a ref name such as `refs/tags/2.5.0` or `refs/tags/2.5.0^{}`.
///
/// The returned tag has an empty `sha`. Refs that are not plain versions give
/// `None`.
pub fn parse_version_tag(reference: &str) -> Option<VersionTag> {
    let caps = VERSION_REF.captures(reference)?;
    let number = |i: usize| caps.get(i)?.as_str().parse::<u64>().ok();
    let peeled = caps.get(4).is_some();
    Some(VersionTag {
        major: number(1)?,
        minor: number(2)?,
        patch: number(3)?,
        sha: String::new(),
        reference: reference.trim_end_matches("^{}").to_string(),
        peeled,
    })
}

/// Highest version tag in `git ls-remote --tags` output
pub fn select_highest(listing: &str) -> Option<VersionTag> {
    listing
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let sha = fields.next()?;
            let reference = fields.next()?;
            let mut tag = parse_version_tag(reference)?;
            tag.sha = sha.to_string();
            Some(tag)
        })
        .max()
}

/// Highest version tag advertised by `url`, `None` when it has none
pub fn highest_version_tag(git: &GitDir, url: &str) -> Result<Option<VersionTag>> {
    let listing = git.output(&["ls-remote", "--tags", "--sort=v:refname", url])?;
    let tag = select_highest(&listing);
    debug!(url, tag = ?tag.as_ref().map(ToString::to_string), "highest version tag");
    Ok(tag)
}
