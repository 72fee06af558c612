//! # rs-chat-export
//!
//! Extract conversation transcripts from rendered AI-chat pages into
//! line-delimited JSON records with Markdown message bodies.
//!
//! Five platforms are supported: ChatGPT, Claude, Gemini, Grok and
//! Perplexity. How each one marks up its turns lives in a versioned strategy
//! document (`config/strategies.json`, embedded at build time), so most markup
//! changes on a platform are a configuration edit rather than a code change.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_chat_export::{export_html, ExportOptions, SettlePolicy};
//!
//! let html = r#"<html><head><title>Greeting - ChatGPT</title></head><body>
//!   <div data-message-author-role="user"><div class="whitespace-pre-wrap">Hi</div></div>
//!   <div data-message-author-role="assistant"><div class="markdown"><p>Hello <b>there</b></p></div></div>
//! </body></html>"#;
//!
//! let options = ExportOptions { settle: SettlePolicy::none(), ..ExportOptions::default() };
//! let export = export_html(html, "https://chatgpt.com/c/abc", &options)?;
//! assert_eq!(export.message_count, 2);
//! assert_eq!(export.jsonl.lines().count(), 3);
//! # Ok::<(), rs_chat_export::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! - **Registry**: validated per-platform strategy entries
//! - **Resolver**: boundaries, roles, content, title and generation state
//! - **Extraction units**: per-platform overrides over the resolver
//! - **Sanitizer** and **converter**: message HTML to Markdown
//! - **Record builder**: metadata, message and artifact lines

mod error;
mod export;
mod options;
mod patterns;
mod record;
mod result;
mod sanitize;
mod settle;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Character encoding detection for saved snapshots.
pub mod encoding;

/// Per-platform extraction units.
pub mod extractor;

/// Download filenames.
pub mod filename;

/// HTML to Markdown conversion.
pub mod markdown;

/// The page capability and its snapshot implementation.
pub mod page;

/// Supported platforms and hostname detection.
pub mod platform;

/// Strategy document loading, validation and the process-wide registry.
pub mod registry;

/// Strategy-driven lookups shared by every extraction unit.
pub mod resolver;

// Public API - re-exports
pub use error::{Error, NodeDiagnostic, Result};
pub use export::{export_conversation, export_with_registry, handle_export_request, ExportResponse};
pub use filename::{export_filename, sanitize_filename};
pub use markdown::{html_to_markdown, plain_text};
pub use options::{ConvertOptions, ExportOptions, SanitizeOptions};
pub use page::{Page, Reaction, ReactionMode, SnapshotPage};
pub use platform::{is_supported_url, Platform};
pub use record::RecordBuilder;
pub use registry::{Registry, StrategyEntry};
pub use result::{ArtifactRecord, Export, ExportMetadata, ParsedMessage, Role};
pub use sanitize::{sanitize, Sanitized};
pub use settle::{SettlePolicy, Settled};

/// Export a saved page given as a UTF-8 string.
///
/// # Example
///
/// ```rust
/// use rs_chat_export::{export_html, Error, ExportOptions};
///
/// let err = export_html("<html></html>", "https://example.com/", &ExportOptions::default());
/// assert!(matches!(err, Err(Error::UnsupportedPlatform(_))));
/// ```
///
/// # Errors
///
/// Same as [`export_conversation`]: [`Error::UnsupportedPlatform`] for a URL
/// no strategy entry matches, [`Error::EmptyConversation`] when the page has
/// no turns, and so on.
pub fn export_html(html: &str, url: &str, options: &ExportOptions) -> Result<Export> {
    let page = SnapshotPage::new(url, html);
    export_conversation(&page, options)
}

/// Export a saved page given as raw bytes, detecting its character encoding.
///
/// The encoding is taken from a byte-order mark or a `<meta charset>`
/// declaration, defaulting to UTF-8.
///
/// # Errors
///
/// Same as [`export_html`] once the bytes are decoded.
pub fn export_bytes(html: &[u8], url: &str, options: &ExportOptions) -> Result<Export> {
    let page = SnapshotPage::from_bytes(url, html);
    export_conversation(&page, options)
}
