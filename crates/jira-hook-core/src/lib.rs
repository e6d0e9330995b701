//! Core library for the Jira `prepare-commit-msg` git hook.

pub mod branch;
pub mod config;
pub mod format;
pub mod git;
pub mod hook;
pub mod rest;
pub mod services;
pub mod session;

pub use format::format_for_git;
pub use hook::{HookError, HookInvocation, Preparation, PrepareCommitMsg, SkipReason};
