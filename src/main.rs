//! mergeexp CLI

mod cli;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cli::build::{BuildOptions, run_build};
use cli::context::CommandContext;
use cli::search::run_search;
use cli::tag::run_highest_tag;
use mergeexp::types::BranchSpec;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mergeexp")]
#[command(version)]
#[command(about = "Build disposable experimental branches from tagged pull requests")]
struct Cli {
    /// Path to the repository working directory
    #[arg(short, long, global = true, default_value = ".")]
    path: PathBuf,

    /// Config file (defaults to ~/.config/mergeexp/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recreate the experimental branch and merge all collected refs into it
    Build {
        /// Experimental branch to (re)create
        #[arg(short, long, default_value = "experimental")]
        branch: String,

        /// Ref the experimental branch starts from
        #[arg(long)]
        base: String,

        /// Bitbucket repository (workspace/repo) whose pull requests are searched
        #[arg(long)]
        repository: Option<String>,

        /// Destination branch pull requests must target (repeatable)
        #[arg(short, long = "destination", requires = "repository")]
        destinations: Vec<String>,

        /// Deployment tag that opts a pull request in (repeatable)
        #[arg(short, long = "tag", requires = "repository")]
        tags: Vec<String>,

        /// Bitbucket branch as FULLNAME:BRANCH (repeatable)
        #[arg(long = "bitbucket-branch")]
        bitbucket_branches: Vec<BranchSpec>,

        /// GitLab branch as FULLNAME:BRANCH (repeatable)
        #[arg(long = "gitlab-branch")]
        gitlab_branches: Vec<BranchSpec>,

        /// Merge the highest version tag of this remote URL (repeatable)
        #[arg(long = "highest-tag")]
        highest_tags: Vec<String>,

        /// Previous experimental branch to summarise changes against
        #[arg(long)]
        previous: Option<String>,

        /// Conflict resolution retries before giving up
        #[arg(long)]
        conflict_retries: Option<u32>,

        /// List refs without touching the working tree
        #[arg(long)]
        dry_run: bool,

        /// Ask before resetting the experimental branch
        #[arg(long)]
        confirm: bool,
    },

    /// List open pull requests tagged for deployment
    Search {
        /// Bitbucket repository (workspace/repo)
        repository: String,

        /// Destination branch pull requests must target (repeatable)
        #[arg(short, long = "destination", required = true)]
        destinations: Vec<String>,

        /// Deployment tag (repeatable)
        #[arg(short, long = "tag", required = true)]
        tags: Vec<String>,
    },

    /// Print the highest version tag of a remote
    HighestTag {
        /// Remote repository URL
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = CommandContext::new(&cli.path, cli.config.as_deref())
        .with_context(|| format!("cannot use {}", cli.path.display()))?;

    match cli.command {
        Commands::Build {
            branch,
            base,
            repository,
            destinations,
            tags,
            bitbucket_branches,
            gitlab_branches,
            highest_tags,
            previous,
            conflict_retries,
            dry_run,
            confirm,
        } => {
            let options = BuildOptions {
                branch,
                base,
                repository,
                destinations,
                tags,
                bitbucket_branches,
                gitlab_branches,
                highest_tags,
                previous,
                conflict_retries,
                dry_run,
                confirm,
            };
            run_build(&ctx, options).await.context("build failed")?;
        }
        Commands::Search {
            repository,
            destinations,
            tags,
        } => {
            run_search(&ctx, &repository, &destinations, &tags)
                .await
                .context("search failed")?;
        }
        Commands::HighestTag { url } => {
            run_highest_tag(&ctx, &url).context("listing tags failed")?;
        }
    }

    Ok(())
}
