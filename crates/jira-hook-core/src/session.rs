use std::fmt;

const JSESSIONID: &str = "JSESSIONID";

/// Browser session cookie used to authenticate against Jira.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The `JSESSIONID` cookie Jira sets after an interactive login.
    pub fn jsessionid(value: impl Into<String>) -> Self {
        Self::new(JSESSIONID, value)
    }

    /// Value for a `Cookie` request header.
    pub fn header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

impl fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCookie")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .finish()
    }
}
