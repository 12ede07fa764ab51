//! Mock pull request search

use async_trait::async_trait;
use mergeexp::error::{Error, Result};
use mergeexp::platform::PullRequestSearch;
use mergeexp::types::PullRequest;
use std::sync::Mutex;

/// Call record for `search_pull_requests`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCall {
    pub repository: String,
    pub destination_branches: Vec<String>,
    pub tags: Vec<String>,
}

/// Returns a fixed list of pull requests, or a fixed error
pub struct MockPullRequestSearch {
    prs: Vec<PullRequest>,
    error: Option<(u16, String)>,
    calls: Mutex<Vec<SearchCall>>,
}

impl MockPullRequestSearch {
    pub fn new(prs: Vec<PullRequest>) -> Self {
        Self {
            prs,
            error: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every search fails like a rejected REST page
    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            prs: Vec::new(),
            error: Some((status, body.to_string())),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn get_calls(&self) -> Vec<SearchCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PullRequestSearch for MockPullRequestSearch {
    async fn search_pull_requests(
        &self,
        repository: &str,
        destination_branches: &[String],
        tags: &[String],
    ) -> Result<Vec<PullRequest>> {
        self.calls.lock().unwrap().push(SearchCall {
            repository: repository.to_string(),
            destination_branches: destination_branches.to_vec(),
            tags: tags.to_vec(),
        });
        if let Some((status, body)) = &self.error {
            return Err(Error::BitbucketApi {
                status: *status,
                body: body.clone(),
            });
        }
        Ok(self.prs.clone())
    }
}
