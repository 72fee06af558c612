//! Line-delimited JSON records for a finished export.
//!
//! Line order is fixed: one metadata line, one line per message in document
//! order, then at most one artifact line. Every line is a complete JSON
//! object on its own.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::markdown::html_to_markdown;
use crate::options::ConvertOptions;
use crate::result::{ArtifactRecord, ExportMetadata, ParsedMessage, Role};

#[derive(Serialize)]
struct MetaLine<'a> {
    #[serde(rename = "_meta")]
    meta: bool,
    platform: &'a str,
    url: &'a str,
    exported_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

#[derive(Serialize)]
struct MessageLine {
    role: Role,
    content: String,
    timestamp: String,
}

#[derive(Serialize)]
struct ArtifactLine<'a> {
    #[serde(rename = "_artifact")]
    artifact: bool,
    title: &'a str,
    version: &'a str,
    content: String,
}

fn iso8601(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serializes parsed messages, converting each body to Markdown.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    convert: ConvertOptions,
    now: DateTime<Utc>,
}

impl RecordBuilder {
    /// Builder stamping untimed messages with `now`.
    #[must_use]
    pub fn new(convert: ConvertOptions, now: DateTime<Utc>) -> Self {
        Self { convert, now }
    }

    /// Render all records, newline separated, without a trailing newline.
    ///
    /// An empty `messages` slice produces the metadata line alone.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Serialization`] if a record cannot be encoded.
    pub fn build(
        &self,
        messages: &[ParsedMessage],
        metadata: &ExportMetadata,
        artifact: Option<&ArtifactRecord>,
    ) -> Result<String> {
        let mut lines = Vec::with_capacity(messages.len() + 2);

        lines.push(serde_json::to_string(&MetaLine {
            meta: true,
            platform: metadata.platform.key(),
            url: &metadata.url,
            exported_at: iso8601(&metadata.exported_at),
            title: metadata.title.as_deref(),
        })?);

        for message in messages {
            lines.push(serde_json::to_string(&MessageLine {
                role: message.role,
                content: html_to_markdown(&message.content_html, &self.convert),
                timestamp: iso8601(message.timestamp.as_ref().unwrap_or(&self.now)),
            })?);
        }

        if let Some(artifact) = artifact {
            lines.push(serde_json::to_string(&ArtifactLine {
                artifact: true,
                title: &artifact.title,
                version: &artifact.version,
                content: html_to_markdown(&artifact.content_html, &self.convert),
            })?);
        }

        Ok(lines.join("\n"))
    }
}
