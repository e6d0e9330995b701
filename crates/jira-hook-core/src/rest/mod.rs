mod client;

pub use client::{Issue, IssueFields, JiraClient, JiraError, JiraResult};
