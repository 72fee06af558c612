//! Error types for rs-chat-export.
//!
//! This module defines the error types returned by registry loading and
//! transcript extraction. Every variant renders as a short human-readable
//! message suitable for handing straight back to whoever triggered the export.

use std::fmt;

/// Snapshot of a boundary node that could not be classified.
///
/// Captured at the moment role resolution fails so the failure can be
/// debugged after the live page has moved on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeDiagnostic {
    /// Lower-cased tag name.
    pub tag: String,

    /// Element `id`, if any.
    pub id: Option<String>,

    /// Raw `class` attribute, if any.
    pub classes: Option<String>,

    /// Every attribute on the node, in source order.
    pub attributes: Vec<(String, String)>,

    /// First 100 characters of the node's inner markup.
    pub content_preview: String,
}

impl fmt::Display for NodeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attributes = if self.attributes.is_empty() {
            "none".to_string()
        } else {
            self.attributes
                .iter()
                .map(|(name, value)| format!("{name}=\"{value}\""))
                .collect::<Vec<_>>()
                .join(", ")
        };

        write!(
            f,
            "tag='{}', id='{}', classes='{}', attributes: {}. Content preview: {}...",
            self.tag,
            self.id.as_deref().unwrap_or("none"),
            self.classes.as_deref().unwrap_or("none"),
            attributes,
            self.content_preview
        )
    }
}

/// Error type for registry and export operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The strategy document is malformed or an entry is incomplete.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A registry lookup used a key that has no entry.
    #[error("Configuration error: unknown platform '{0}'")]
    UnknownPlatform(String),

    /// The page URL does not belong to any configured platform.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// A boundary node's authorship could not be determined.
    #[error("{platform}: Cannot determine message role. Found: {diagnostic}")]
    RoleResolution {
        /// Display name of the platform being exported.
        platform: String,
        /// Snapshot of the offending node.
        diagnostic: Box<NodeDiagnostic>,
    },

    /// A response is still being generated.
    #[error(
        "{platform}: Cannot export while response is generating. \
         Please wait until generation completes or click \"Stop generating\"."
    )]
    GenerationInProgress {
        /// Display name of the platform being exported.
        platform: String,
    },

    /// No message boundaries were found on the page.
    #[error(
        "{platform}: No messages found in this conversation. \
         Please ensure the conversation has at least one message before exporting."
    )]
    EmptyConversation {
        /// Display name of the platform being exported.
        platform: String,
    },

    /// HTML to Markdown conversion failed for one fragment.
    #[error("Markdown conversion failed: {0}")]
    Conversion(String),

    /// A record could not be serialized.
    #[error("Record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading a snapshot or writing an export failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for registry and export operations.
pub type Result<T> = std::result::Result<T, Error>;
