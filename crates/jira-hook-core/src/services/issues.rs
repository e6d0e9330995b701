use crate::format::format_for_git;
use crate::rest::{Issue, JiraClient, JiraResult};

/// Provides higher-level helpers around Jira issues.
#[derive(Clone)]
pub struct IssueService {
    client: JiraClient,
}

impl IssueService {
    pub fn new(client: JiraClient) -> Self {
        Self { client }
    }

    pub async fn get_by_key(&self, key: &str) -> JiraResult<Issue> {
        self.client.issue(key).await
    }

    /// Fetch `key` and render it as a commit message.
    pub async fn commit_message(&self, key: &str) -> JiraResult<Vec<u8>> {
        let issue = self.get_by_key(key).await?;
        Ok(render_issue(&issue))
    }
}

pub fn render_issue(issue: &Issue) -> Vec<u8> {
    format_for_git(&issue.key, &issue.fields.summary, issue.description())
}
