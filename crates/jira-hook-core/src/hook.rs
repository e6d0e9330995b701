use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, HookConfig};
use crate::git::{GitBackend, GitError};
use crate::rest::{JiraClient, JiraResult};
use crate::services::issues::IssueService;

/// Arguments git passes to a `prepare-commit-msg` hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookInvocation {
    pub message_file: PathBuf,
    /// `message`, `template`, `merge`, `squash` or `commit`.
    pub source: Option<String>,
    /// Commit object name, given with `-c`, `-C` or `--amend`.
    pub commit: Option<String>,
}

impl HookInvocation {
    pub fn new(message_file: impl Into<PathBuf>) -> Self {
        Self {
            message_file: message_file.into(),
            source: None,
            commit: None,
        }
    }

    /// Plain `git commit` with no message supplied up front.
    pub fn is_normal_commit(&self) -> bool {
        self.source.is_none() && self.commit.is_none()
    }
}

/// Why the default commit message was left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    ExistingMessage,
    NoMatchingBranch { branch: String },
    FetchFailed { key: String, reason: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ExistingMessage => f.write_str("commit already has a message"),
            SkipReason::NoMatchingBranch { branch } => {
                write!(f, "no matching branch found in '{branch}'")
            }
            SkipReason::FetchFailed { key, reason } => {
                write!(f, "could not fetch {key}: {reason}")
            }
        }
    }
}

/// Result of preparing a commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preparation {
    Message { key: String, message: Vec<u8> },
    Skipped(SkipReason),
}

/// Failures that abort the hook.
#[derive(Debug, Error)]
pub enum HookError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not get branch name: {0}")]
    Branch(#[source] GitError),
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Seeds the commit message file from the Jira issue named by the branch.
pub struct PrepareCommitMsg<G> {
    git: G,
}

impl<G: GitBackend> PrepareCommitMsg<G> {
    pub fn new(git: G) -> Self {
        Self { git }
    }

    /// Work out the message without touching the message file.
    ///
    /// Configuration and branch lookup problems are fatal. A branch without an
    /// issue key or a failed fetch only skips, so committing still works.
    pub async fn prepare(&self, invocation: &HookInvocation) -> Result<Preparation, HookError> {
        if !invocation.is_normal_commit() {
            debug!(source = ?invocation.source, "leaving existing message alone");
            return Ok(Preparation::Skipped(SkipReason::ExistingMessage));
        }

        let config = HookConfig::load(&self.git)?;
        let branch = self.git.current_branch().map_err(HookError::Branch)?;

        let Some(key) = config.key_pattern.extract(&branch) else {
            return Ok(skipped(SkipReason::NoMatchingBranch { branch }));
        };
        debug!(%branch, key, "found issue key");

        match fetch_message(&config, key).await {
            Ok(message) => Ok(Preparation::Message {
                key: key.to_owned(),
                message,
            }),
            Err(err) => Ok(skipped(SkipReason::FetchFailed {
                key: key.to_owned(),
                reason: err.to_string(),
            })),
        }
    }

    /// Prepare the message and write it into the hook's message file.
    pub async fn run(&self, invocation: &HookInvocation) -> Result<Preparation, HookError> {
        let preparation = self.prepare(invocation).await?;
        if let Preparation::Message { key, message } = &preparation {
            write_message(&invocation.message_file, message)?;
            info!(key = key.as_str(), path = %invocation.message_file.display(), "prepared commit message");
        }
        Ok(preparation)
    }
}

async fn fetch_message(config: &HookConfig, key: &str) -> JiraResult<Vec<u8>> {
    let client = JiraClient::new(&config.base_url, &config.session)?;
    IssueService::new(client).commit_message(key).await
}

fn skipped(reason: SkipReason) -> Preparation {
    warn!("{reason}; keeping the default commit message");
    Preparation::Skipped(reason)
}

pub fn write_message(path: &Path, message: &[u8]) -> Result<(), HookError> {
    fs::write(path, message).map_err(|source| HookError::Write {
        path: path.to_path_buf(),
        source,
    })
}
