use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use jira_hook_core::git::GitCommand;
use jira_hook_core::{HookInvocation, Preparation, PrepareCommitMsg};
use tracing_subscriber::{fmt, EnvFilter};

/// Prepares a git commit message from the Jira issue named by the current branch.
///
/// Install as `.git/hooks/prepare-commit-msg`. Reads `jira.url`,
/// `jira.regexp` and `jira.jsessionid` from git config.
#[derive(Parser, Debug)]
#[command(name = "prepare-commit-msg", author, version, about)]
struct Cli {
    /// File holding the commit message
    message_file: PathBuf,
    /// Source of the existing message (message, template, merge, squash, commit)
    source: Option<String>,
    /// Commit object name when amending or reusing a commit
    commit: Option<String>,
    /// Print the prepared message instead of writing the message file
    #[arg(long)]
    dry_run: bool,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn invocation(&self) -> HookInvocation {
        HookInvocation {
            message_file: self.message_file.clone(),
            source: self.source.clone(),
            commit: self.commit.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{err:?}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose)?;

    let hook = PrepareCommitMsg::new(GitCommand::new());
    let invocation = cli.invocation();

    if cli.dry_run {
        let preparation = hook
            .prepare(&invocation)
            .await
            .context("failed to prepare commit message")?;
        if let Preparation::Message { message, .. } = preparation {
            io::stdout()
                .write_all(&message)
                .context("failed to write to stdout")?;
        }
        return Ok(());
    }

    hook.run(&invocation)
        .await
        .context("failed to prepare commit message")?;
    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .compact()
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to initialize logging: {error}"))
}
