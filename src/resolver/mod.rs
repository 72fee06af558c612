//! Boundary, role, content, title and generation lookups driven by one
//! platform's [`StrategyEntry`].
//!
//! The resolver holds no document; every call takes the document or node it
//! works on, so the same resolver serves live pages and snapshots alike.

mod role;
mod title;

pub(crate) use role::labelled_button;

use crate::dom::{self, Document, Selection};
use crate::error::Result;
use crate::platform::Platform;
use crate::registry::{MessageLocator, StrategyEntry};
use crate::result::Role;

/// Declarative extraction for one platform.
#[derive(Debug, Clone)]
pub struct Resolver {
    entry: StrategyEntry,
}

impl Resolver {
    #[must_use]
    pub fn new(entry: StrategyEntry) -> Self {
        Self { entry }
    }

    #[must_use]
    pub fn entry(&self) -> &StrategyEntry {
        &self.entry
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.entry.platform
    }

    /// Message boundary nodes in document order.
    ///
    /// A combined locator returns all of its matches. A chained locator tries
    /// the primary selector, then each fallback, and stops at the first that
    /// matches anything. No match at all is an empty conversation, not an error.
    #[must_use]
    pub fn locate_boundaries<'a>(&self, doc: &'a Document) -> Vec<Selection<'a>> {
        match &self.entry.messages {
            MessageLocator::Combined(selector) => dom::select_all(doc, selector),
            MessageLocator::Chain { .. } => {
                for selector in self.entry.messages.candidates() {
                    let found = dom::select_all(doc, selector);
                    if !found.is_empty() {
                        return found;
                    }
                    tracing::debug!(platform = self.platform().key(), selector, "message selector matched nothing");
                }
                Vec::new()
            }
        }
    }

    /// Decide who authored a boundary node.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RoleResolution`] when the role strategy cannot
    /// decide.
    pub fn classify_role(&self, node: &Selection) -> Result<Role> {
        role::classify(&self.entry.role, node, self.entry.platform)
    }

    /// Inner markup of the first role-specific content container, or `""`.
    #[must_use]
    pub fn extract_content(&self, node: &Selection, role: Role) -> String {
        dom::query_first(node, self.entry.content.for_role(role))
            .map(|content| dom::inner_html(&content).to_string())
            .unwrap_or_default()
    }

    /// Cleaned conversation title, if one can be found.
    ///
    /// Failures are logged and reported as no title.
    #[must_use]
    pub fn extract_title(&self, doc: &Document) -> Option<String> {
        let locator = self.entry.title.as_ref()?;
        match title::read_title(doc, locator) {
            Ok(title) => title,
            Err(err) => {
                tracing::warn!(
                    platform = self.platform().key(),
                    error = %err,
                    "failed to extract conversation title"
                );
                None
            }
        }
    }

    /// Whether a response is still being generated.
    ///
    /// Always `false` for platforms configured without a generation signal.
    #[must_use]
    pub fn is_generating(&self, doc: &Document) -> bool {
        self.entry
            .generation
            .as_deref()
            .is_some_and(|selector| dom::select_first(doc, selector).is_some())
    }
}
