//! Perplexity: user turns are plain query text, wrapped in a paragraph so
//! they flow through the converter like every other turn.

use super::ExtractionUnit;
use crate::dom::{self, Document, Selection};
use crate::registry::StrategyEntry;
use crate::resolver::Resolver;
use crate::result::Role;

pub struct PerplexityUnit {
    resolver: Resolver,
}

impl PerplexityUnit {
    #[must_use]
    pub fn new(entry: StrategyEntry) -> Self {
        Self {
            resolver: Resolver::new(entry),
        }
    }
}

impl ExtractionUnit for PerplexityUnit {
    fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// No trustworthy in-progress signal; exports are never blocked.
    fn is_generating(&self, _doc: &Document) -> bool {
        false
    }

    fn extract_content(&self, node: &Selection, role: Role) -> String {
        match role {
            Role::User => {
                let selector = self.resolver.entry().content.for_role(Role::User);
                let text = dom::query_first(node, selector)
                    .map(|el| dom::text_content(&el).trim().to_string())
                    .unwrap_or_default();
                if text.is_empty() {
                    String::new()
                } else {
                    format!("<p>{}</p>", dom::escape_html(&text))
                }
            }
            Role::Assistant => self.resolver.extract_content(node, role),
        }
    }
}
