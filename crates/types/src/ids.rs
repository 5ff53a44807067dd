//! Newtype wrappers for the string identifiers that flow through an export.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The stable identifier a link marker is tagged with in the captured view (e.g. `link1`).
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(Arc<str>);

impl LinkId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LinkId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for LinkId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for LinkId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resolved, non-empty hyperlink target.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(transparent)]
pub struct LinkUrl(Arc<str>);

impl LinkUrl {
    /// Returns `None` for empty or whitespace-only input; such links are never emitted.
    pub fn parse(url: &str) -> Option<Self> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.into()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LinkUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LinkUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
