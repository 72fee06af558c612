//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate. Every selector that originates from
//! the strategy document goes through the `try_*` helpers here, so a malformed
//! selector degrades to "no match" instead of aborting the export.

// Re-export core types for external use
pub use dom_query::{Document, NodeId, Selection};

// Re-export StrTendril for external use
pub use tendril::StrTendril;

use crate::error::NodeDiagnostic;

/// Number of characters of inner markup kept in a [`NodeDiagnostic`].
const DIAGNOSTIC_PREVIEW_CHARS: usize = 100;

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Text of the document's `<title>` element, untrimmed.
#[must_use]
pub fn document_title(doc: &Document) -> String {
    doc.select("head > title, title")
        .iter()
        .next()
        .map(|title| title.text().to_string())
        .unwrap_or_default()
}

// === Querying ===

/// All elements in the document matching `selector`, in document order.
///
/// Returns an empty vector when nothing matches or the selector does not parse.
#[must_use]
pub fn select_all<'a>(doc: &'a Document, selector: &str) -> Vec<Selection<'a>> {
    doc.try_select(selector)
        .map(|found| found.iter().collect())
        .unwrap_or_default()
}

/// First element in the document matching `selector`.
#[must_use]
pub fn select_first<'a>(doc: &'a Document, selector: &str) -> Option<Selection<'a>> {
    doc.try_select(selector).and_then(|found| found.iter().next())
}

/// All descendants of `root` matching `selector`, in document order.
#[must_use]
pub fn query_all<'a>(root: &Selection<'a>, selector: &str) -> Vec<Selection<'a>> {
    root.try_select(selector)
        .map(|found| found.iter().collect())
        .unwrap_or_default()
}

/// First descendant of `root` matching `selector`.
#[must_use]
pub fn query_first<'a>(root: &Selection<'a>, selector: &str) -> Option<Selection<'a>> {
    root.try_select(selector).and_then(|found| found.iter().next())
}

/// Whether the element itself matches `selector`.
#[inline]
#[must_use]
pub fn matches(sel: &Selection, selector: &str) -> bool {
    sel.is(selector)
}

// === Attribute Operations ===

/// Get element ID attribute
#[inline]
#[must_use]
pub fn id(sel: &Selection) -> Option<String> {
    sel.attr("id").map(|s| s.to_string())
}

/// Get element class attribute
#[inline]
#[must_use]
pub fn class_name(sel: &Selection) -> Option<String> {
    sel.attr("class").map(|s| s.to_string())
}

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Check if attribute exists (any value, including empty)
#[inline]
#[must_use]
pub fn has_attribute(sel: &Selection, name: &str) -> bool {
    sel.has_attr(name)
}

/// Whether the `class` attribute contains `class` as a whole token.
#[must_use]
pub fn has_class_token(sel: &Selection, class: &str) -> bool {
    sel.attr("class")
        .is_some_and(|classes| classes.split_whitespace().any(|token| token == class))
}

/// Get all attributes as key-value pairs
///
/// Returns empty vector if node has no attributes or if selection is empty.
#[must_use]
pub fn get_all_attributes(sel: &Selection) -> Vec<(String, String)> {
    sel.nodes()
        .first()
        .map(|node| {
            node.attrs()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_ascii_lowercase())
}

/// Identity of the first node in the selection.
#[must_use]
pub fn node_id(sel: &Selection) -> Option<NodeId> {
    sel.nodes().first().map(|node| node.id)
}

// === Text Content ===

/// Get all text content of node and descendants
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Get inner HTML content
#[inline]
#[must_use]
pub fn inner_html(sel: &Selection) -> StrTendril {
    sel.inner_html()
}

/// Get outer HTML content
#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> StrTendril {
    sel.html()
}

// === Tree Navigation ===

/// Get parent element
#[inline]
#[must_use]
pub fn parent<'a>(sel: &Selection<'a>) -> Selection<'a> {
    sel.parent()
}

/// Element ancestors of a node, nearest first.
#[must_use]
pub fn ancestors<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    sel.nodes()
        .first()
        .map(|node| {
            node.ancestors(None)
                .into_iter()
                .filter(dom_query::NodeRef::is_element)
                .map(Selection::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Nearest ancestor (not the node itself) matching `selector`.
#[must_use]
pub fn closest_ancestor<'a>(sel: &Selection<'a>, selector: &str) -> Option<Selection<'a>> {
    ancestors(sel).into_iter().find(|ancestor| matches(ancestor, selector))
}

// === Mutation ===

/// Remove every element matching `selector` below `root`.
///
/// Returns how many elements were removed.
pub fn remove_all(root: &Selection, selector: &str) -> usize {
    let found = query_all(root, selector);
    let count = found.len();
    for sel in found {
        sel.remove();
    }
    count
}

/// Set inner HTML
#[inline]
pub fn set_inner_html(sel: &Selection, html: &str) {
    sel.set_html(html);
}

/// Append HTML after the element's last child
#[inline]
pub fn append_html(sel: &Selection, html: &str) {
    sel.append_html(html);
}

/// Replace element with HTML
#[inline]
pub fn replace_with_html(sel: &Selection, html: &str) {
    sel.replace_with_html(html);
}

// === Diagnostics ===

/// Capture a [`NodeDiagnostic`] for an element.
#[must_use]
pub fn diagnose(sel: &Selection) -> NodeDiagnostic {
    let content_preview: String = inner_html(sel)
        .chars()
        .take(DIAGNOSTIC_PREVIEW_CHARS)
        .collect();

    NodeDiagnostic {
        tag: tag_name(sel).unwrap_or_default(),
        id: id(sel).filter(|v| !v.is_empty()),
        classes: class_name(sel).filter(|v| !v.is_empty()),
        attributes: get_all_attributes(sel),
        content_preview,
    }
}

/// Compact CSS-like description of an element, e.g. `button#save[aria-label="Edit"]`.
#[must_use]
pub fn describe(sel: &Selection) -> String {
    let mut out = tag_name(sel).unwrap_or_else(|| "?".to_string());
    if let Some(id) = id(sel).filter(|v| !v.is_empty()) {
        out.push('#');
        out.push_str(&id);
    }
    if let Some(label) = get_attribute(sel, "aria-label") {
        out.push_str(&format!("[aria-label=\"{label}\"]"));
    }
    out
}

/// Escape text for safe inclusion in element content.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
