//! Data produced by one export.
//!
//! Everything here is created fresh per export and handed to the record
//! builder; nothing is cached between exports.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Author of a conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parse an exact `"user"` / `"assistant"` value.
    #[must_use]
    pub fn from_value(value: &str) -> Option<Role> {
        match value {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn as read from the page, before Markdown conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    pub role: Role,

    /// Raw inner markup of the content container; may be empty.
    pub content_html: String,

    /// None of the supported platforms expose one; the record builder
    /// substitutes the build time.
    pub timestamp: Option<DateTime<Utc>>,
}

impl ParsedMessage {
    #[must_use]
    pub fn new(role: Role, content_html: impl Into<String>) -> Self {
        Self {
            role,
            content_html: content_html.into(),
            timestamp: None,
        }
    }
}

/// Facts about the export as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportMetadata {
    pub platform: Platform,
    pub url: String,
    pub exported_at: DateTime<Utc>,
    pub title: Option<String>,
}

/// Generated document shown in a side panel next to the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
    pub title: String,
    pub version: String,
    pub content_html: String,
}

/// Finished export: the JSONL payload plus what went into it.
#[derive(Debug, Clone)]
pub struct Export {
    pub metadata: ExportMetadata,

    /// Number of message records written.
    pub message_count: usize,

    /// Whether an artifact record was appended.
    pub has_artifact: bool,

    /// Line-delimited JSON, one record per line, newline separated.
    pub jsonl: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_values_are_exact() {
        assert_eq!(Role::from_value("user"), Some(Role::User));
        assert_eq!(Role::from_value("assistant"), Some(Role::Assistant));
        assert_eq!(Role::from_value("User"), None);
        assert_eq!(Role::from_value(" user"), None);
    }

    #[test]
    fn test_new_message_has_no_timestamp() {
        let message = ParsedMessage::new(Role::User, "<p>hi</p>");
        assert!(message.timestamp.is_none());
        assert_eq!(message.role.to_string(), "user");
    }
}
