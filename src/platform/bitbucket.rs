//! Bitbucket pull request discovery

use crate::auth::BitbucketAuth;
use crate::error::{Error, Result};
use crate::platform::PullRequestSearch;
use crate::platform::directive::fold_comments;
use crate::types::{PrComment, PullRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Bitbucket Cloud REST API root
pub const BITBUCKET_API_ROOT: &str = "https://api.bitbucket.org/2.0/";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// One page of a paginated listing
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Page<T> {
    #[serde(default)]
    values: Vec<T>,
    next: Option<String>,
}

#[derive(Deserialize)]
struct Href {
    href: String,
}

#[derive(Deserialize)]
struct BranchName {
    name: String,
}

#[derive(Deserialize)]
struct PrLinks {
    comments: Href,
}

#[derive(Deserialize)]
struct Destination {
    branch: BranchName,
}

#[derive(Deserialize)]
struct SourceRepository {
    full_name: String,
}

#[derive(Deserialize)]
struct Source {
    repository: SourceRepository,
    branch: BranchName,
}

#[derive(Deserialize)]
struct RestPullRequest {
    id: u64,
    links: PrLinks,
    destination: Destination,
    source: Source,
}

#[derive(Deserialize)]
struct CommentContent {
    #[serde(default)]
    raw: Option<String>,
}

#[derive(Deserialize)]
struct RestComment {
    content: CommentContent,
}

impl From<RestPullRequest> for PullRequest {
    fn from(pr: RestPullRequest) -> Self {
        Self {
            id: pr.id,
            source_branch: pr.source.branch.name,
            source_fullname: pr.source.repository.full_name,
        }
    }
}

impl From<RestComment> for PrComment {
    fn from(c: RestComment) -> Self {
        Self {
            raw: c.content.raw.unwrap_or_default(),
        }
    }
}

/// Bitbucket REST client using reqwest with basic authentication
pub struct BitbucketService {
    client: Client,
    auth: BitbucketAuth,
    api_root: Url,
}

impl BitbucketService {
    /// Create a new service; `api_root` defaults to [`BITBUCKET_API_ROOT`]
    pub fn new(auth: BitbucketAuth, api_root: Option<&str>) -> Result<Self> {
        let root = api_root.unwrap_or(BITBUCKET_API_ROOT);
        let root = if root.ends_with('/') {
            root.to_string()
        } else {
            format!("{root}/")
        };
        let api_root = Url::parse(&root)
            .map_err(|e| Error::Config(format!("invalid Bitbucket API root '{root}': {e}")))?;

        let client = Client::builder()
            .user_agent("mergeexp")
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            auth,
            api_root,
        })
    }

    /// First page URL of the open pull requests of `fullname`
    pub fn pull_requests_url(&self, fullname: &str) -> String {
        let encoded: Vec<_> = fullname.split('/').map(urlencoding::encode).collect();
        format!(
            "{}repositories/{}/pullrequests?state=OPEN",
            self.api_root,
            encoded.join("/")
        )
    }

    /// GET `url` and decode the JSON body
    async fn fetch<T: DeserializeOwned>(&self, url: &str, context: &str) -> Result<T> {
        debug!(url, "fetching");

        let response = self
            .client
            .get(url)
            .basic_auth(&self.auth.username, Some(&self.auth.app_password))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::BitbucketApi {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| Error::Parse {
            context: context.to_string(),
            source,
        })
    }

    /// All comments of a pull request, following `next` until exhausted
    pub async fn list_comments(&self, comments_url: &str) -> Result<Vec<PrComment>> {
        let mut comments = Vec::new();
        let mut next = Some(comments_url.to_string());

        while let Some(url) = next {
            let page: Page<RestComment> = self.fetch(&url, "comments").await?;
            comments.extend(page.values.into_iter().map(PrComment::from));
            next = page.next.filter(|n| !n.is_empty());
        }

        Ok(comments)
    }

    /// Whether the comment thread at `comments_url` opts into one of `tags`
    async fn test_deployment_tags(&self, comments_url: &str, tags: &[String]) -> Result<bool> {
        let comments = self.list_comments(comments_url).await?;
        let decision = fold_comments(None, comments.iter().map(|c| c.raw.as_str()), tags);
        Ok(decision.unwrap_or(false))
    }
}

#[async_trait]
impl PullRequestSearch for BitbucketService {
    async fn search_pull_requests(
        &self,
        repository: &str,
        destination_branches: &[String],
        tags: &[String],
    ) -> Result<Vec<PullRequest>> {
        debug!(repository, ?destination_branches, ?tags, "searching pull requests");

        let mut found = Vec::new();
        let mut next = Some(self.pull_requests_url(repository));

        while let Some(url) = next {
            let page: Page<RestPullRequest> = self.fetch(&url, "pull requests").await?;

            for pr in page.values {
                if !destination_branches.contains(&pr.destination.branch.name) {
                    debug!(pr_id = pr.id, destination = %pr.destination.branch.name, "skipping, other destination");
                    continue;
                }
                if self.test_deployment_tags(&pr.links.comments.href, tags).await? {
                    debug!(pr_id = pr.id, "pull request qualifies");
                    found.push(pr.into());
                } else {
                    debug!(pr_id = pr.id, "skipping, not tagged for deployment");
                }
            }

            next = page.next.filter(|n| !n.is_empty());
        }

        debug!(repository, count = found.len(), "searched pull requests");
        Ok(found)
    }
}
