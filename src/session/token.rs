use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity shared by every request of one practice session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Fresh random token (UUID v4 from the OS random source)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accept a token received from outside (path segment, store, CLI).
    /// Empty values, dot segments and values containing a path separator
    /// are rejected. Anything else is carried verbatim and percent-encoded
    /// only on the wire.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw == "." || raw == ".." || raw.contains('/') {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    /// Extract the token from a `/final/{session_id}` navigation target
    pub fn from_final_path(path: &str) -> Option<Self> {
        path.strip_prefix("/final/").and_then(Self::parse)
    }

    /// Navigation target of the final report for this session
    pub fn final_report_path(&self) -> String {
        format!("/final/{}", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
