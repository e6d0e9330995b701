use regex::Regex;

/// Pattern that pulls an issue key (e.g. `ENG-123`) out of a branch name.
#[derive(Debug, Clone)]
pub struct IssueKeyPattern {
    regex: Regex,
}

impl IssueKeyPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// Leftmost match of the pattern in `branch`. Empty matches are ignored.
    pub fn extract<'a>(&self, branch: &'a str) -> Option<&'a str> {
        self.regex
            .find(branch)
            .map(|m| m.as_str())
            .filter(|key| !key.is_empty())
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
