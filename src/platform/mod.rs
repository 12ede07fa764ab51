//! Source hosting platforms
//!
//! Pull request discovery talks to the Bitbucket REST API; Bitbucket and
//! GitLab repositories can both be fetched as git remotes.

mod bitbucket;
mod directive;
mod host;

pub use bitbucket::{BITBUCKET_API_ROOT, BitbucketService};
pub use directive::{DeploymentDirective, fold_comments, parse_directives, test_comment};
pub use host::{BITBUCKET_CLONE_BASE, SourceHost, remote_suggestion};

use crate::error::Result;
use crate::types::PullRequest;
use async_trait::async_trait;

/// Pull request search across a paginated REST listing
#[async_trait]
pub trait PullRequestSearch: Send + Sync {
    /// Open pull requests of `repository` that target one of
    /// `destination_branches` and whose comment thread includes one of `tags`.
    ///
    /// Any page failure aborts the whole search.
    async fn search_pull_requests(
        &self,
        repository: &str,
        destination_branches: &[String],
        tags: &[String],
    ) -> Result<Vec<PullRequest>>;
}
