use std::time::Duration;

use reqwest::header::{ACCEPT, COOKIE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::session::SessionCookie;

const ISSUE_PATH: &str = "rest/api/2/issue/";
const ISSUE_FIELDS: &str = "summary,description";
const USER_AGENT: &str = concat!("jira-hook/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(10);

/// Errors returned by the Jira REST client.
#[derive(Debug, Error)]
pub enum JiraError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid Jira URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("issue {key} not found")]
    NotFound { key: String },
    #[error("Jira rejected the session cookie ({status}); refresh jira.jsessionid")]
    Unauthorized { status: StatusCode },
    #[error("Jira returned {status}: {}", .messages.join("; "))]
    Api {
        status: StatusCode,
        messages: Vec<String>,
    },
    #[error("HTTP status {status} body: {body}")]
    HttpStatus { status: StatusCode, body: String },
}

pub type JiraResult<T> = Result<T, JiraError>;

/// Minimal client for the Jira REST API, authenticated by a session cookie.
#[derive(Debug, Clone)]
pub struct JiraClient {
    http: Client,
    base_url: Url,
    cookie: String,
}

impl JiraClient {
    pub fn new(base_url: &Url, session: &SessionCookie) -> JiraResult<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.clone(),
            cookie: session.header_value(),
        })
    }

    /// Fetch the summary and description of a single issue (e.g. "ENG-123").
    pub async fn issue(&self, key: &str) -> JiraResult<Issue> {
        let mut url = self.base_url.join(ISSUE_PATH)?.join(key)?;
        url.query_pairs_mut().append_pair("fields", ISSUE_FIELDS);

        debug!(%url, "fetching issue");
        let response = self
            .http
            .get(url)
            .header(COOKIE, &self.cookie)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, key, body));
        }

        let issue = response.json::<Issue>().await?;
        Ok(issue)
    }
}

fn status_error(status: StatusCode, key: &str, body: String) -> JiraError {
    match status {
        StatusCode::NOT_FOUND => JiraError::NotFound { key: key.to_owned() },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => JiraError::Unauthorized { status },
        _ => match serde_json::from_str::<ErrorCollection>(&body) {
            Ok(errors) if !errors.is_empty() => JiraError::Api {
                status,
                messages: errors.into_messages(),
            },
            _ => JiraError::HttpStatus { status, body },
        },
    }
}

/// Issue payload restricted to the fields the hook needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    pub fields: IssueFields,
}

impl Issue {
    /// Description text, empty when the issue has none.
    pub fn description(&self) -> &str {
        self.fields.description.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueFields {
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Jira's standard error body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorCollection {
    #[serde(default)]
    error_messages: Vec<String>,
    #[serde(default)]
    errors: serde_json::Map<String, serde_json::Value>,
}

impl ErrorCollection {
    fn is_empty(&self) -> bool {
        self.error_messages.is_empty() && self.errors.is_empty()
    }

    fn into_messages(self) -> Vec<String> {
        let mut messages = self.error_messages;
        messages.extend(self.errors.into_iter().map(|(field, value)| match value {
            serde_json::Value::String(text) => format!("{field}: {text}"),
            other => format!("{field}: {other}"),
        }));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> JiraClient {
        let base = Url::parse(&format!("{}/", server.base_url())).unwrap();
        JiraClient::new(&base, &SessionCookie::jsessionid("abc123")).unwrap()
    }

    #[tokio::test]
    async fn issue_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/api/2/issue/ENG-1")
                .query_param("fields", "summary,description")
                .header("cookie", "JSESSIONID=abc123");
            then.status(200).json_body_obj(&serde_json::json!({
                "id": "10001",
                "key": "ENG-1",
                "fields": {
                    "summary": "Fix login bug",
                    "description": "Users cannot log in.\r\nSee logs."
                }
            }));
        });

        let issue = client_for(&server).issue("ENG-1").await.unwrap();
        mock.assert();
        assert_eq!(issue.key, "ENG-1");
        assert_eq!(issue.fields.summary, "Fix login bug");
        assert_eq!(issue.description(), "Users cannot log in.\r\nSee logs.");
    }

    #[tokio::test]
    async fn null_description_reads_as_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/api/2/issue/ENG-2");
            then.status(200).json_body_obj(&serde_json::json!({
                "key": "ENG-2",
                "fields": { "summary": "No details", "description": null }
            }));
        });

        let issue = client_for(&server).issue("ENG-2").await.unwrap();
        assert_eq!(issue.fields.description, None);
        assert_eq!(issue.description(), "");
    }

    #[tokio::test]
    async fn issue_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/api/2/issue/ENG-404");
            then.status(404).json_body_obj(&serde_json::json!({
                "errorMessages": ["Issue Does Not Exist"],
                "errors": {}
            }));
        });

        let err = client_for(&server).issue("ENG-404").await.unwrap_err();
        assert!(matches!(err, JiraError::NotFound { key } if key == "ENG-404"));
    }

    #[tokio::test]
    async fn expired_session_is_unauthorized() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/api/2/issue/ENG-1");
            then.status(401).body("login required");
        });

        let err = client_for(&server).issue("ENG-1").await.unwrap_err();
        assert!(matches!(
            err,
            JiraError::Unauthorized {
                status: StatusCode::UNAUTHORIZED
            }
        ));
    }

    #[tokio::test]
    async fn error_collection_is_surfaced() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/api/2/issue/ENG-1");
            then.status(400).json_body_obj(&serde_json::json!({
                "errorMessages": ["Field 'summary' is hidden"],
                "errors": { "fields": "bad request" }
            }));
        });

        let err = client_for(&server).issue("ENG-1").await.unwrap_err();
        match err {
            JiraError::Api { status, messages } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(
                    messages,
                    vec![
                        "Field 'summary' is hidden".to_string(),
                        "fields: bad request".to_string()
                    ]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unexpected_status_keeps_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/api/2/issue/ENG-1");
            then.status(503).body("maintenance");
        });

        let err = client_for(&server).issue("ENG-1").await.unwrap_err();
        assert!(matches!(err, JiraError::HttpStatus { ref body, .. } if body == "maintenance"));
        assert!(err.to_string().contains("maintenance"));
    }

    #[tokio::test]
    async fn honours_context_path() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/jira/rest/api/2/issue/OPS-9");
            then.status(200).json_body_obj(&serde_json::json!({
                "key": "OPS-9",
                "fields": { "summary": "Rotate keys" }
            }));
        });

        let base = Url::parse(&format!("{}/jira/", server.base_url())).unwrap();
        let client = JiraClient::new(&base, &SessionCookie::jsessionid("abc123")).unwrap();
        let issue = client.issue("OPS-9").await.unwrap();
        mock.assert();
        assert_eq!(issue.fields.summary, "Rotate keys");
    }
}
