//! Username extraction from profile URLs and the query shape sent to the
//! profile endpoint.

use std::sync::LazyLock;

use regex::Regex;

static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_.]+)").expect("valid handle regex"));

/// Extracts the first `@handle` token from `line`, without the `@`.
///
/// Returns `None` when the line carries no handle-shaped token.
#[must_use]
pub fn extract_username(line: &str) -> Option<String> {
    HANDLE_RE
        .captures(line.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extracts one username per input line, in order.
///
/// Blank lines and `#` comments are ignored; lines without a handle are
/// dropped.
pub fn parse_input_lines<'a, I>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(extract_username)
        .collect()
}

/// Normalises a bare username from a plain list: trims whitespace and a
/// leading `@`. Returns `None` for blank input.
#[must_use]
pub fn normalize_username(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let name = trimmed.strip_prefix('@').unwrap_or(trimmed).trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Which identifier the profile endpoint resolves a query by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    SecUserId,
    UserId,
    Username,
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentifierKind::SecUserId => write!(f, "sec_user_id"),
            IdentifierKind::UserId => write!(f, "user_id"),
            IdentifierKind::Username => write!(f, "unique_id"),
        }
    }
}

/// Identifiers for a single profile lookup. At least one must be set for the
/// query to be sendable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileQuery {
    pub unique_id: Option<String>,
    pub sec_user_id: Option<String>,
    pub user_id: Option<String>,
}

impl ProfileQuery {
    /// Query by username. A leading `@` is stripped.
    #[must_use]
    pub fn by_username(username: &str) -> Self {
        Self {
            unique_id: normalize_username(username),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_sec_user_id(mut self, sec_user_id: &str) -> Self {
        self.sec_user_id = Some(sec_user_id.to_string()).filter(|s| !s.is_empty());
        self
    }

    #[must_use]
    pub fn with_user_id(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string()).filter(|s| !s.is_empty());
        self
    }

    /// The identifier the server resolves first: sec id, then numeric id,
    /// then username. `None` when the query is empty.
    #[must_use]
    pub fn primary(&self) -> Option<IdentifierKind> {
        if self.sec_user_id.is_some() {
            Some(IdentifierKind::SecUserId)
        } else if self.user_id.is_some() {
            Some(IdentifierKind::UserId)
        } else if self.unique_id.is_some() {
            Some(IdentifierKind::Username)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary().is_none()
    }

    /// Short human-readable label for logs, e.g. `@alice` or `user_id=42`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.primary() {
            Some(IdentifierKind::SecUserId) => {
                let sec = self.sec_user_id.as_deref().unwrap_or_default();
                let short: String = sec.chars().take(20).collect();
                format!("sec_user_id={short}")
            }
            Some(IdentifierKind::UserId) => {
                format!("user_id={}", self.user_id.as_deref().unwrap_or_default())
            }
            Some(IdentifierKind::Username) => {
                format!("@{}", self.unique_id.as_deref().unwrap_or_default())
            }
            None => "<empty>".to_string(),
        }
    }
}
