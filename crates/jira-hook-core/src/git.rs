use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::debug;

/// Errors raised while talking to the `git` executable.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Spawn(#[source] io::Error),
    #[error("`git {args}` exited with {status}: {stderr}")]
    Failed {
        args: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("git produced non UTF-8 output")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Read access to the repository the hook runs in.
pub trait GitBackend {
    /// Value of a single git configuration key (`git config --get`).
    fn config_value(&self, key: &str) -> Result<String, GitError>;
    /// Short name of the checked out branch.
    fn current_branch(&self) -> Result<String, GitError>;
}

/// [`GitBackend`] backed by the `git` command line tool.
#[derive(Debug, Clone, Default)]
pub struct GitCommand {
    dir: Option<PathBuf>,
}

impl GitCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run git inside `dir` instead of the current working directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let mut command = Command::new("git");
        command.args(args);
        if let Some(dir) = &self.dir {
            command.current_dir(dir);
        }

        debug!(args = ?args, "running git");
        let output = command.output().map_err(GitError::Spawn)?;
        if !output.status.success() {
            return Err(GitError::Failed {
                args: args.join(" "),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout)?;
        Ok(stdout.trim().to_string())
    }
}

impl GitBackend for GitCommand {
    fn config_value(&self, key: &str) -> Result<String, GitError> {
        self.run(&["config", "--get", key])
    }

    fn current_branch(&self) -> Result<String, GitError> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }
}
