//! Configuration options for exporting a conversation.
//!
//! `ExportOptions` controls the pipeline as a whole; `ConvertOptions` and
//! `SanitizeOptions` control how each message body becomes Markdown.

use crate::settle::SettlePolicy;

/// Toggles for the pre-conversion cleanup passes.
///
/// All passes are on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct SanitizeOptions {
    /// Remove rendered diagram output: `.mpr-rendered` containers, their
    /// `.mpr-toggle` controls, bare `<svg>` elements and `<style>` blocks.
    ///
    /// Default: `true`
    pub strip_diagrams: bool,

    /// Collapse `<pre>` wrappers that carry a language label and copy button
    /// next to the `<code>` element into plain `<pre><code>`.
    ///
    /// Default: `true`
    pub normalize_wrapped_code: bool,

    /// Rebuild `[data-testid="code-block"]` highlighter output line by line
    /// into plain `<pre><code>`.
    ///
    /// Default: `true`
    pub normalize_highlighted_code: bool,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            strip_diagrams: true,
            normalize_wrapped_code: true,
            normalize_highlighted_code: true,
        }
    }
}

/// Options for turning one HTML fragment into Markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Cleanup passes run before conversion.
    pub sanitize: SanitizeOptions,

    /// Element nesting depth at which conversion gives up and the fragment
    /// falls back to plain text.
    ///
    /// Default: `512`
    pub max_depth: usize,

    /// Render links as `[text](href)`; otherwise keep only their text.
    ///
    /// Default: `true`
    pub include_links: bool,

    /// Render images as `![alt](src)`; otherwise drop them.
    ///
    /// Default: `true`
    pub include_images: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            sanitize: SanitizeOptions::default(),
            max_depth: 512,
            include_links: true,
            include_images: true,
        }
    }
}

/// Configuration options for a full export.
///
/// # Example
///
/// ```rust
/// use rs_chat_export::{ExportOptions, SettlePolicy};
///
/// // Offline snapshot: nothing renders asynchronously, so never wait.
/// let options = ExportOptions {
///     settle: SettlePolicy::none(),
///     ..ExportOptions::default()
/// };
/// assert!(options.include_artifact);
/// ```
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Wait applied after actuating a control that renders asynchronously.
    ///
    /// Default: [`SettlePolicy::default`]
    pub settle: SettlePolicy,

    /// Open and export the side-panel artifact on platforms that have one.
    ///
    /// Default: `true`
    pub include_artifact: bool,

    /// Fail with [`crate::Error::EmptyConversation`] when no message
    /// boundaries are found. When `false` the export is metadata only.
    ///
    /// Default: `true`
    pub reject_empty: bool,

    /// Per-message conversion options.
    pub convert: ConvertOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            settle: SettlePolicy::default(),
            include_artifact: true,
            reject_empty: true,
            convert: ConvertOptions::default(),
        }
    }
}
