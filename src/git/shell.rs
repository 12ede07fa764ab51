//! Interactive shell handoff for manual conflict resolution

use crate::error::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Blocking handoff to a human operator
///
/// Returns once the operator ends the session.
pub trait InteractiveSession {
    /// Run a session showing `prompt`
    fn run(&self, prompt: &str) -> Result<()>;
}

/// Runs `bash` in the working directory with a custom `PS1`
#[derive(Debug, Clone)]
pub struct BashSession {
    dir: PathBuf,
}

impl BashSession {
    /// Session rooted in `dir`
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }
}

/// Single-quote `prompt` for a POSIX shell assignment
fn quote_prompt(prompt: &str) -> String {
    format!("'{}'", prompt.replace('\'', r"'\''"))
}

impl InteractiveSession for BashSession {
    fn run(&self, prompt: &str) -> Result<()> {
        let mut init = tempfile::Builder::new()
            .prefix("mergeexp")
            .suffix(".sh")
            .tempfile()?;
        writeln!(init, "PS1={}", quote_prompt(prompt))?;
        init.flush()?;

        debug!(init_file = %init.path().display(), "starting interactive shell");
        let status = Command::new("bash")
            .arg("--init-file")
            .arg(init.path())
            .current_dir(&self.dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;

        if !status.success() {
            warn!(%status, "interactive shell exited unsuccessfully");
        }
        Ok(())
    }
}
