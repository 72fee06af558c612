//! HTML to Markdown conversion for message bodies.
//!
//! A fragment is parsed and cleaned by [`crate::sanitize`]. Then the domain
//! rules in [`rules`] pre-render the parts whose Markdown has a fixed shape:
//!
//! - `<pre><code class="language-X">` becomes a fence tagged `X`
//! - tables become pipe tables built from cell text
//! - `.katex-display` becomes `$$latex$$` from its TeX annotation
//! - `.katex` outside a display block becomes `$latex$`
//!
//! `quick_html2md` converts everything else, and the pre-rendered Markdown is
//! slotted back in afterwards.
//!
//! Conversion never fails from the caller's point of view: a fragment the
//! converter refuses degrades to its plain text.
//!
//! # Example
//!
//! ```rust
//! use rs_chat_export::{html_to_markdown, ConvertOptions};
//!
//! let md = html_to_markdown(
//!     r#"<pre><code class="language-python">print("hi")</code></pre>"#,
//!     &ConvertOptions::default(),
//! );
//! assert_eq!(md, "```python\nprint(\"hi\")\n```");
//! ```

pub mod rules;

use quick_html2md::{html_to_markdown_with_options, MarkdownOptions};

use crate::dom::{self, Selection};
use crate::error::{Error, Result};
use crate::options::ConvertOptions;
use crate::patterns::EXCESS_NEWLINES;
use crate::sanitize::sanitize;

/// Convert an HTML fragment to Markdown, falling back to plain text.
///
/// Empty or whitespace-only input yields an empty string.
#[must_use]
pub fn html_to_markdown(html: &str, options: &ConvertOptions) -> String {
    match try_html_to_markdown(html, options) {
        Ok(markdown) => markdown,
        Err(err) => {
            tracing::warn!(error = %err, "markdown conversion failed, using plain text");
            plain_text(html)
        }
    }
}

/// Convert an HTML fragment to Markdown without the plain-text fallback.
///
/// # Errors
///
/// Returns [`crate::Error::Conversion`] when the fragment nests deeper than
/// [`ConvertOptions::max_depth`].
pub fn try_html_to_markdown(html: &str, options: &ConvertOptions) -> Result<String> {
    if html.trim().is_empty() {
        return Ok(String::new());
    }
    let doc = dom::parse(html);
    let body: Selection = doc.select("body");

    let depth = nesting_depth(&body);
    if depth > options.max_depth {
        return Err(Error::Conversion(format!(
            "element nesting of {depth} exceeds {} levels",
            options.max_depth
        )));
    }

    sanitize(&body, &options.sanitize);
    let slots = rules::prerender(&body);

    let md_options = MarkdownOptions::new()
        .include_links(options.include_links)
        .include_images(options.include_images)
        .preserve_tables(true);
    let fragment = dom::inner_html(&body).to_string();
    let raw_markdown = html_to_markdown_with_options(&fragment, &md_options);

    // squeeze blank lines before the slots go back so code keeps its own
    let tidy = EXCESS_NEWLINES.replace_all(raw_markdown.trim(), "\n\n");
    Ok(slots.restore(&tidy).trim().to_string())
}

/// Text of a fragment with every tag stripped, trimmed.
#[must_use]
pub fn plain_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let doc = dom::parse(html);
    dom::text_content(&doc.select("body")).trim().to_string()
}

/// Deepest element nesting below `root`, counted without recursion.
fn nesting_depth(root: &Selection) -> usize {
    let mut deepest = 0;
    let mut stack: Vec<_> = root.nodes().iter().map(|node| (node.clone(), 0_usize)).collect();
    while let Some((node, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        for child in node.children() {
            if child.is_element() {
                stack.push((child, depth + 1));
            }
        }
    }
    deepest
}
