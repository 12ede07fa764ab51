//! Throwaway git repositories for integration tests

use mergeexp::git::GitDir;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// A real git repository in a temp directory, with one commit on `main`
pub struct TempGitRepo {
    dir: TempDir,
}

impl TempGitRepo {
    pub fn new() -> Self {
        let repo = Self::empty();
        repo.commit_file("README", "experimental\n", "Initial commit");
        repo
    }

    /// Repository with no commits yet
    pub fn empty() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let repo = Self { dir };
        repo.git(&["init", "-q"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.git(&["config", "tag.gpgsign", "false"]);
        repo.git(&["config", "rerere.enabled", "false"]);
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path as a string, usable as a remote URL
    pub fn url(&self) -> String {
        self.path().display().to_string()
    }

    pub fn git_dir(&self) -> GitDir {
        GitDir::open(self.path()).expect("open temp repo")
    }

    /// Run git, panicking on failure, and return trimmed stdout
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("run git");
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    pub fn write_file(&self, name: &str, content: &str) {
        std::fs::write(self.path().join(name), content).expect("write file");
    }

    /// Write `name`, stage it and commit; returns the new commit id
    pub fn commit_file(&self, name: &str, content: &str, message: &str) -> String {
        self.write_file(name, content);
        self.git(&["add", name]);
        self.git(&["commit", "-q", "-m", message]);
        self.head()
    }

    /// Branch `name` off `from` carrying one commit that writes `file`
    pub fn branch_with_file(&self, name: &str, from: &str, file: &str, content: &str) {
        self.git(&["checkout", "-q", "-b", name, from]);
        self.commit_file(file, content, &format!("Change {file} on {name}"));
        self.git(&["checkout", "-q", from]);
    }

    pub fn head(&self) -> String {
        self.git(&["rev-parse", "HEAD"])
    }

    pub fn current_branch(&self) -> String {
        self.git(&["symbolic-ref", "--short", "HEAD"])
    }

    /// Subjects of the first-parent history, newest first
    pub fn subjects(&self) -> Vec<String> {
        self.git(&["log", "--first-parent", "--format=%s"])
            .lines()
            .map(ToString::to_string)
            .collect()
    }
}
