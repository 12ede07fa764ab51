//! Turning pull requests, named branches and version tags into merge refs
//!
//! Every ref is fetched right before it is returned, so its name resolves in
//! the local repository when the merge orchestrator reaches it.

use crate::error::Result;
use crate::git::{GitDir, RemoteRegistry, Vcs, highest_version_tag};
use crate::platform::{PullRequestSearch, SourceHost, remote_suggestion};
use crate::types::{MergeRef, PullRequest};
use std::collections::HashMap;
use tracing::debug;

/// Label of a pull request ref, e.g. `team/repo/feature (pull request #12)`
pub fn pr_label(pr: &PullRequest) -> String {
    format!(
        "{}/{} (pull request #{})",
        pr.source_fullname, pr.source_branch, pr.id
    )
}

/// Fetches branches of one hosting platform as git remotes
pub struct RefProvider<'a> {
    vcs: &'a dyn Vcs,
    host: SourceHost,
}

impl<'a> RefProvider<'a> {
    /// Provider for repositories on `host`
    pub const fn new(vcs: &'a dyn Vcs, host: SourceHost) -> Self {
        Self { vcs, host }
    }

    /// Remote alias for repository `fullname`, registering it when needed
    pub fn get_remote(&self, fullname: &str) -> Result<String> {
        RemoteRegistry::new(self.vcs)
            .create_remote(&self.host.clone_url(fullname), &remote_suggestion(fullname))
    }

    /// Fetch `remote` with this host's credentials
    pub fn fetch(&self, remote: &str) -> Result<()> {
        debug!(remote, "fetching remote");
        self.vcs.fetch(remote, self.host.deployment_key())
    }

    /// Fetch `branch` of repository `fullname`
    pub fn fetch_branch(&self, fullname: &str, branch: &str) -> Result<MergeRef> {
        let remote = self.get_remote(fullname)?;
        self.fetch(&remote)?;
        Ok(MergeRef::remote_branch(
            &remote,
            branch,
            self.host.branch_label(fullname, branch),
        ))
    }

    /// Fetch the source branches of `prs`.
    ///
    /// Each source repository is registered and fetched once, however many
    /// pull requests it backs.
    pub fn pull_request_refs(&self, prs: &[PullRequest]) -> Result<Vec<MergeRef>> {
        let mut remote_for: HashMap<&str, String> = HashMap::new();
        let mut refs = Vec::with_capacity(prs.len());

        for pr in prs {
            let fullname = pr.source_fullname.as_str();
            let remote = if let Some(remote) = remote_for.get(fullname) {
                remote.clone()
            } else {
                let remote = self.get_remote(fullname)?;
                self.fetch(&remote)?;
                remote_for.insert(fullname, remote.clone());
                remote
            };

            refs.push(MergeRef::remote_branch(
                &remote,
                &pr.source_branch,
                pr_label(pr),
            ));
        }

        Ok(refs)
    }
}

/// Search qualifying pull requests and fetch their source branches
#[allow(clippy::future_not_send)]
pub async fn fetch_pr_branches(
    search: &dyn PullRequestSearch,
    provider: &RefProvider<'_>,
    repository: &str,
    destination_branches: &[String],
    tags: &[String],
) -> Result<Vec<MergeRef>> {
    let prs = search
        .search_pull_requests(repository, destination_branches, tags)
        .await?;
    debug!(repository, count = prs.len(), "qualifying pull requests");
    provider.pull_request_refs(&prs)
}

/// Ref for the highest version tag of `url`, `None` when it has no version tag
pub fn highest_tag_ref(git: &GitDir, url: &str) -> Result<Option<MergeRef>> {
    let Some(tag) = highest_version_tag(git, url)? else {
        return Ok(None);
    };

    if !git.sha_exists(&tag.sha) {
        debug!(url, reference = %tag.reference, "fetching tag");
        git.fetch_url(url, &tag.reference)?;
    }

    Ok(Some(MergeRef::new(
        tag.sha.clone(),
        format!("{url} version {tag}"),
    )))
}
