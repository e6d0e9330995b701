use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::branch::IssueKeyPattern;
use crate::git::GitBackend;
use crate::session::SessionCookie;

/// Base URL of the Jira instance, e.g. `https://jira.example.com/`.
pub const URL_KEY: &str = "jira.url";
/// Regular expression extracting the issue key from the branch name.
pub const REGEXP_KEY: &str = "jira.regexp";
/// Value of the `JSESSIONID` cookie from a logged-in browser session.
pub const JSESSIONID_KEY: &str = "jira.jsessionid";

/// Settings the hook reads from the git configuration store.
#[derive(Debug, Clone)]
pub struct HookConfig {
    pub base_url: Url,
    pub key_pattern: IssueKeyPattern,
    pub session: SessionCookie,
}

impl HookConfig {
    pub fn load(git: &impl GitBackend) -> Result<Self, ConfigError> {
        let jsessionid = required(git, JSESSIONID_KEY)?;
        let url = required(git, URL_KEY)?;
        let pattern = required(git, REGEXP_KEY)?;

        let base_url = parse_base_url(&url).map_err(|source| ConfigError::InvalidUrl {
            value: url.clone(),
            source,
        })?;
        let key_pattern =
            IssueKeyPattern::new(&pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;

        Ok(Self {
            base_url,
            key_pattern,
            session: SessionCookie::jsessionid(jsessionid),
        })
    }
}

fn required(git: &impl GitBackend, key: &'static str) -> Result<String, ConfigError> {
    match git.config_value(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        Ok(_) => Err(ConfigError::Missing { key }),
        Err(err) => {
            debug!(key, error = %err, "git config lookup failed");
            Err(ConfigError::Missing { key })
        }
    }
}

/// Parse the configured base URL, making sure REST paths join beneath it.
pub fn parse_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Errors raised while assembling [`HookConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("please set {key} in your git config")]
    Missing { key: &'static str },
    #[error("invalid jira.url '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid jira.regexp '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
