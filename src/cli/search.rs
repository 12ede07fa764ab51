//! Search command - list pull requests tagged for deployment

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, arrow};
use anstream::println;
use mergeexp::auth::get_bitbucket_auth;
use mergeexp::discovery::pr_label;
use mergeexp::error::Result;
use mergeexp::platform::{BitbucketService, PullRequestSearch};

/// Run the search command
#[allow(clippy::future_not_send)]
pub async fn run_search(
    ctx: &CommandContext,
    repository: &str,
    destinations: &[String],
    tags: &[String],
) -> Result<()> {
    let auth = get_bitbucket_auth(&ctx.config.bitbucket)?;
    let service = BitbucketService::new(auth, ctx.config.bitbucket.api_root.as_deref())?;

    let prs = service
        .search_pull_requests(repository, destinations, tags)
        .await?;

    if prs.is_empty() {
        println!("{}", "No pull requests tagged for deployment.".muted());
        return Ok(());
    }

    println!(
        "{} {}",
        "Pull requests tagged for deployment:".emphasis(),
        prs.len().accent()
    );
    for pr in &prs {
        println!("  {} {}", arrow(), pr_label(pr));
    }
    Ok(())
}
