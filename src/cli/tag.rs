//! Highest-tag command

use crate::cli::context::CommandContext;
use crate::cli::style::Stylize;
use anstream::println;
use mergeexp::error::Result;
use mergeexp::git::highest_version_tag;

/// Print the highest version tag of `url` and its commit
pub fn run_highest_tag(ctx: &CommandContext, url: &str) -> Result<()> {
    match highest_version_tag(&ctx.git, url)? {
        Some(tag) => println!("{} {}", tag.to_string().accent(), tag.sha),
        None => println!("{}", format!("No version tag found on {url}").muted()),
    }
    Ok(())
}
