//! Grok: the message bubble is its own content container, roles come from
//! the Edit / Regenerate buttons beside it, and rendered diagrams must be
//! flipped back to their source before anything is read.

use super::{settle, ExtractionUnit};
use crate::dom::{self, Document, Selection};
use crate::options::ExportOptions;
use crate::page::Page;
use crate::registry::StrategyEntry;
use crate::resolver::Resolver;
use crate::result::Role;

/// Containers wrapping one rendered diagram each.
const DIAGRAM_CONTAINER: &str = r#"div[class*="group/mermaid"]"#;

/// Accessible names of the "view source" toggle, per UI language.
const VIEW_SOURCE_LABELS: [&str; 3] = ["원본 보기", "View source", "Show source"];

pub struct GrokUnit {
    resolver: Resolver,
}

impl GrokUnit {
    #[must_use]
    pub fn new(entry: StrategyEntry) -> Self {
        Self {
            resolver: Resolver::new(entry),
        }
    }
}

/// The view-source toggle inside one diagram container, if any.
fn view_source_control<'a>(container: &Selection<'a>) -> Option<Selection<'a>> {
    VIEW_SOURCE_LABELS
        .iter()
        .find_map(|label| dom::query_first(container, &crate::resolver::labelled_button(label)))
}

impl ExtractionUnit for GrokUnit {
    fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// No trustworthy in-progress signal; exports are never blocked.
    fn is_generating(&self, _doc: &Document) -> bool {
        false
    }

    /// Reveal the source of every rendered diagram, not just the first.
    fn prepare(&self, page: &dyn Page, options: &ExportOptions) {
        let containers = dom::select_all(page.document(), DIAGRAM_CONTAINER);
        let mut revealed = 0_usize;
        for container in &containers {
            match view_source_control(container) {
                Some(control) => {
                    page.activate(&control);
                    revealed += 1;
                }
                None => tracing::debug!(
                    container = %dom::describe(container),
                    "diagram without a view-source control"
                ),
            }
        }
        if revealed > 0 {
            tracing::debug!(revealed, "revealed diagram sources");
            settle(page, options, DIAGRAM_CONTAINER);
        }
    }

    fn extract_content(&self, node: &Selection, _role: Role) -> String {
        dom::inner_html(node).to_string()
    }
}
