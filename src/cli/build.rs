//! Build command - create the experimental branch and merge everything into it

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, spinner_style};
use crate::cli::{CliProgress, print_refs};
use anstream::println;
use dialoguer::Confirm;
use indicatif::ProgressBar;
use mergeexp::auth::get_bitbucket_auth;
use mergeexp::discovery::{RefProvider, fetch_pr_branches, highest_tag_ref};
use mergeexp::error::{Error, Result};
use mergeexp::git::BashSession;
use mergeexp::merge::{MergeOutcome, Merger, final_commit};
use mergeexp::platform::{BitbucketService, SourceHost};
use mergeexp::types::{BranchSpec, MergeRef};
use std::time::Duration;
use tracing::warn;

/// Options for the build command
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Experimental branch to (re)create
    pub branch: String,
    /// Ref the experimental branch starts from
    pub base: String,
    /// Bitbucket repository whose pull requests are searched
    pub repository: Option<String>,
    /// Destination branches pull requests must target
    pub destinations: Vec<String>,
    /// Deployment tags that opt a pull request in
    pub tags: Vec<String>,
    /// Explicit Bitbucket branches
    pub bitbucket_branches: Vec<BranchSpec>,
    /// Explicit GitLab branches
    pub gitlab_branches: Vec<BranchSpec>,
    /// Remote URLs whose highest version tag is merged
    pub highest_tags: Vec<String>,
    /// Previous experimental branch for the summary commit
    pub previous: Option<String>,
    /// Override of the configured conflict retry limit
    pub conflict_retries: Option<u32>,
    /// List refs without touching the working tree
    pub dry_run: bool,
    /// Ask before resetting the experimental branch
    pub confirm: bool,
}

/// Run the build command
#[allow(clippy::future_not_send)]
pub async fn run_build(ctx: &CommandContext, options: BuildOptions) -> Result<()> {
    ctx.git.git_init()?;

    let refs = collect_refs(ctx, &options).await?;

    println!("{} {}", "Refs to merge:".emphasis(), refs.len().accent());
    print_refs(&refs);
    println!();

    if options.dry_run {
        println!("{}", "Dry run complete".muted());
        return Ok(());
    }

    if refs.is_empty() {
        println!("{}", "Nothing to merge.".muted());
        return Ok(());
    }

    if options.confirm
        && !Confirm::new()
            .with_prompt(format!(
                "Reset {} to {} and merge?",
                options.branch, options.base
            ))
            .default(true)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
    {
        println!("{}", "Aborted".muted());
        return Ok(());
    }

    ctx.git
        .start_experimental_branch(&options.branch, &options.base)?;
    println!(
        "{} Started {} from {}",
        check(),
        options.branch.emphasis(),
        options.base.accent()
    );

    let retry_limit = options
        .conflict_retries
        .filter(|r| *r > 0)
        .unwrap_or_else(|| ctx.config.merge.retry_limit());
    let session = BashSession::new(ctx.git.path());
    let merger = Merger::new(&ctx.git, &session, &CliProgress, retry_limit);
    let result = merger.merge_branches(&refs)?;

    if let Some(previous) = &options.previous {
        let suffix = ctx.config.merge.final_message_suffix.as_deref();
        if final_commit(&ctx.git, previous, suffix)? {
            println!("{} Summary commit against {}", check(), previous.accent());
        } else {
            println!(
                "{}",
                format!("{previous} does not exist yet, no summary commit").muted()
            );
        }
    }

    println!();
    println!(
        "{} {} merged, {} with conflicts",
        "Build complete:".success(),
        result.merged.len().accent(),
        result.conflict_count().accent()
    );
    for merged in &result.merged {
        match merged.outcome {
            MergeOutcome::Clean => {}
            MergeOutcome::AutoResolved => {
                println!("   {} {}", merged.reference.label, "(rerere)".muted());
            }
            MergeOutcome::Resolved { rounds } => {
                println!(
                    "   {} {}",
                    merged.reference.label,
                    format!("(resolved in {rounds} session(s))").muted()
                );
            }
            MergeOutcome::NoCommit { .. } => {
                println!(
                    "   {} {}",
                    merged.reference.label,
                    "(nothing committed)".warn()
                );
            }
        }
    }

    Ok(())
}

/// Gather refs in merge order: version tags, named branches, pull requests
#[allow(clippy::future_not_send)]
async fn collect_refs(ctx: &CommandContext, options: &BuildOptions) -> Result<Vec<MergeRef>> {
    let mut refs = Vec::new();

    for url in &options.highest_tags {
        match highest_tag_ref(&ctx.git, url)? {
            Some(r) => refs.push(r),
            None => {
                warn!(url, "no version tag found");
                println!("{}", format!("No version tag found on {url}").warn());
            }
        }
    }

    let bitbucket = RefProvider::new(&ctx.git, SourceHost::bitbucket(&ctx.config.bitbucket));
    for spec in &options.bitbucket_branches {
        refs.push(bitbucket.fetch_branch(&spec.fullname, &spec.branch)?);
    }

    if !options.gitlab_branches.is_empty() {
        let gitlab = RefProvider::new(&ctx.git, SourceHost::gitlab(&ctx.config.gitlab)?);
        for spec in &options.gitlab_branches {
            refs.push(gitlab.fetch_branch(&spec.fullname, &spec.branch)?);
        }
    }

    if let Some(repository) = &options.repository {
        let auth = get_bitbucket_auth(&ctx.config.bitbucket)?;
        let service = BitbucketService::new(auth, ctx.config.bitbucket.api_root.as_deref())?;

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(format!(
            "Searching pull requests of {}...",
            repository.emphasis()
        ));
        spinner.enable_steady_tick(Duration::from_millis(80));

        let pr_refs = fetch_pr_branches(
            &service,
            &bitbucket,
            repository,
            &options.destinations,
            &options.tags,
        )
        .await;

        match pr_refs {
            Ok(pr_refs) => {
                spinner.finish_with_message(format!(
                    "{} {} pull request(s) from {}",
                    check(),
                    pr_refs.len().accent(),
                    repository.emphasis()
                ));
                refs.extend(pr_refs);
            }
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e);
            }
        }
    }

    Ok(refs)
}
