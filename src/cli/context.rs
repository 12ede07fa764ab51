//! Shared command context for CLI commands

use mergeexp::config::{Config, load_config};
use mergeexp::error::Result;
use mergeexp::git::GitDir;
use std::path::Path;

/// Setup shared by all commands: the working tree and the loaded config
pub struct CommandContext {
    /// Repository working directory
    pub git: GitDir,
    /// Effective configuration (file, then environment)
    pub config: Config,
}

impl CommandContext {
    /// Open the working directory and load configuration
    pub fn new(path: &Path, config_path: Option<&Path>) -> Result<Self> {
        let git = GitDir::open(path)?;
        let config = load_config(config_path)?.with_env();
        Ok(Self { git, config })
    }
}
