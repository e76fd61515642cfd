//! Header normalization.
//!
//! Turns raw `Key: Value` lines into a deduplicated [`HeaderSet`] and pulls out the
//! identity fields (User-Agent, Content-Type) that backends take as separate
//! arguments. Malformed input never fails; it just yields fewer headers.

use serde::Serialize;

use crate::config::{
    header_in, DEFAULT_CONTENT_TYPE, HEADER_CONTENT_TYPE, HEADER_USER_AGENT,
    TRANSPORT_CONTROLLED_HEADERS,
};

/// Ordered header list with case-insensitively unique names.
///
/// Inserting an existing name keeps its position and first spelling and
/// replaces the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "Vec<String>")]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a header, last value wins.
    pub fn insert(&mut self, name: &str, value: &str) {
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Headers as `Key: Value` lines.
    pub fn to_lines(&self) -> Vec<String> {
        self.iter().map(|(k, v)| format!("{k}: {v}")).collect()
    }
}

impl From<HeaderSet> for Vec<String> {
    fn from(set: HeaderSet) -> Self {
        set.to_lines()
    }
}

/// Output of [`normalize_headers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedHeaders {
    pub headers: HeaderSet,
    pub user_agent: String,
    pub content_type: String,
}

/// Splits one raw line into a trimmed `(key, value)` pair.
///
/// Blank lines, lines without a colon, lines with an empty key and pseudo-headers
/// (leading colon) are rejected.
pub fn parse_header_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(':') {
        return None;
    }
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Normalizes raw header lines.
///
/// Each element may itself hold several newline-separated lines. User-Agent and
/// Content-Type are extracted rather than kept in the set; they default to
/// `default_user_agent` and `application/json`.
pub fn normalize_headers<S: AsRef<str>>(lines: &[S], default_user_agent: &str) -> NormalizedHeaders {
    let mut headers = HeaderSet::new();
    let mut user_agent = default_user_agent.to_string();
    let mut content_type = DEFAULT_CONTENT_TYPE.to_string();

    for line in lines.iter().flat_map(|l| l.as_ref().split('\n')) {
        let Some((key, value)) = parse_header_line(line) else {
            continue;
        };

        if header_in(TRANSPORT_CONTROLLED_HEADERS, key) {
            continue;
        }
        if key.eq_ignore_ascii_case(HEADER_USER_AGENT) {
            user_agent = value.to_string();
            continue;
        }
        if key.eq_ignore_ascii_case(HEADER_CONTENT_TYPE) {
            content_type = value.to_string();
            continue;
        }

        headers.insert(key, value);
    }

    NormalizedHeaders {
        headers,
        user_agent,
        content_type,
    }
}
