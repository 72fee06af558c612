//! Per-platform extraction units.
//!
//! Every unit wraps a [`Resolver`] and overrides only the steps its platform
//! cannot express declaratively:
//!
//! - `chatgpt`, `gemini`: pure delegation
//! - `claude`: collapsed-block filtering and the artifact side panel
//! - `grok`: diagram source reveal, node-as-content, no generation lock
//! - `perplexity`: plain-text user turns, no generation lock
//!
//! # Usage
//!
//! ```rust,ignore
//! let unit = extractor::for_entry(registry.entry(Platform::Claude)?.clone());
//! unit.prepare(&page, &options);
//! for node in unit.locate_boundaries(page.document()) {
//!     let message = unit.parse_node(&node)?;
//! }
//! ```

pub mod chatgpt;
pub mod claude;
pub mod gemini;
pub mod grok;
pub mod perplexity;

pub use chatgpt::ChatGptUnit;
pub use claude::ClaudeUnit;
pub use gemini::GeminiUnit;
pub use grok::GrokUnit;
pub use perplexity::PerplexityUnit;

use crate::dom::{Document, Selection};
use crate::error::Result;
use crate::options::ExportOptions;
use crate::page::Page;
use crate::platform::Platform;
use crate::registry::StrategyEntry;
use crate::resolver::Resolver;
use crate::result::{ArtifactRecord, ParsedMessage, Role};

/// Extraction steps for one platform.
///
/// Default methods delegate to the unit's [`Resolver`].
pub trait ExtractionUnit {
    fn resolver(&self) -> &Resolver;

    fn platform(&self) -> Platform {
        self.resolver().platform()
    }

    fn is_generating(&self, doc: &Document) -> bool {
        self.resolver().is_generating(doc)
    }

    /// Actuate whatever controls reveal hidden content, then let the page settle.
    ///
    /// Runs once per export, after the generation check and before any
    /// boundary is located.
    fn prepare(&self, _page: &dyn Page, _options: &ExportOptions) {}

    fn locate_boundaries<'a>(&self, doc: &'a Document) -> Vec<Selection<'a>> {
        self.resolver().locate_boundaries(doc)
    }

    /// # Errors
    ///
    /// Returns [`crate::Error::RoleResolution`] when authorship is undecidable.
    fn classify_role(&self, node: &Selection) -> Result<Role> {
        self.resolver().classify_role(node)
    }

    fn extract_content(&self, node: &Selection, role: Role) -> String {
        self.resolver().extract_content(node, role)
    }

    /// Classify and extract one boundary node.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RoleResolution`] when authorship is undecidable.
    fn parse_node(&self, node: &Selection) -> Result<ParsedMessage> {
        let role = self.classify_role(node)?;
        let content = self.extract_content(node, role);
        Ok(ParsedMessage::new(role, content))
    }

    fn title(&self, doc: &Document) -> Option<String> {
        self.resolver().extract_title(doc)
    }

    /// Supplementary side-panel document, on platforms that have one.
    fn artifact(&self, _doc: &Document) -> Option<ArtifactRecord> {
        None
    }
}

/// Build the unit for a validated entry.
#[must_use]
pub fn for_entry(entry: StrategyEntry) -> Box<dyn ExtractionUnit> {
    match entry.platform {
        Platform::ChatGpt => Box::new(ChatGptUnit::new(entry)),
        Platform::Claude => Box::new(ClaudeUnit::new(entry)),
        Platform::Gemini => Box::new(GeminiUnit::new(entry)),
        Platform::Grok => Box::new(GrokUnit::new(entry)),
        Platform::Perplexity => Box::new(PerplexityUnit::new(entry)),
    }
}

/// Settle probe helper shared by units that actuate controls.
pub(crate) fn settle(page: &dyn Page, options: &ExportOptions, region: &str) {
    let outcome = options
        .settle
        .wait_until_stable(|| crate::page::fingerprint(page.document(), region));
    tracing::debug!(region, ?outcome, "page settled");
}
