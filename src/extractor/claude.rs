//! Claude: collapsed-block filtering and the artifact side panel.
//!
//! One assistant turn may hold several `.standard-markdown` blocks: a collapsed
//! reasoning block, collapsed tool results and the visible answer. They share
//! class names and differ only in the inline style of a wrapping
//! `.overflow-hidden` element, so every block is checked and hidden ones are
//! dropped.

use std::collections::HashSet;

use super::{settle, ExtractionUnit};
use crate::dom::{self, Document, NodeId, Selection};
use crate::options::ExportOptions;
use crate::page::Page;
use crate::patterns::ZERO_LENGTH;
use crate::registry::StrategyEntry;
use crate::resolver::Resolver;
use crate::result::{ArtifactRecord, Role};

/// Wrapper class whose inline style hides collapsed blocks.
const COLLAPSE_CLASS: &str = "overflow-hidden";

/// Controls that open the artifact side panel, one per artifact version.
const ARTIFACT_TRIGGER: &str = r#".artifact-block-cell button[aria-label="Preview contents"]"#;
const ARTIFACT_PANEL: &str = "#markdown-artifact";
const ARTIFACT_CONTENT: &str = ".standard-markdown";
const ARTIFACT_VERSION: &str = r#"[data-testid="artifact-version-trigger"]"#;

const DEFAULT_ARTIFACT_TITLE: &str = "Artifact";
const DEFAULT_ARTIFACT_VERSION: &str = "v1";

pub struct ClaudeUnit {
    resolver: Resolver,
}

impl ClaudeUnit {
    #[must_use]
    pub fn new(entry: StrategyEntry) -> Self {
        Self {
            resolver: Resolver::new(entry),
        }
    }

    /// Inner markup of every visible content block in `node`, joined by newlines.
    fn visible_content(&self, node: &Selection) -> String {
        let selector = self.resolver.entry().content.for_role(Role::Assistant);
        let candidates = dom::query_all(node, selector);
        let candidate_ids: HashSet<NodeId> = candidates.iter().filter_map(dom::node_id).collect();
        let boundary = dom::node_id(node);

        candidates
            .iter()
            .filter(|block| {
                let chain = ancestors_within(block, boundary);
                // nested blocks are already part of their outer block
                let nested = chain
                    .iter()
                    .filter_map(dom::node_id)
                    .any(|id| candidate_ids.contains(&id));
                !nested && !is_collapsed(block) && !chain.iter().any(is_collapsed)
            })
            .map(|block| dom::inner_html(block).to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Ancestors of `sel`, nearest first, stopping below `boundary`.
fn ancestors_within<'a>(sel: &Selection<'a>, boundary: Option<NodeId>) -> Vec<Selection<'a>> {
    dom::ancestors(sel)
        .into_iter()
        .take_while(|ancestor| dom::node_id(ancestor) != boundary)
        .collect()
}

/// A `.overflow-hidden` element whose inline style has zero height or opacity.
///
/// Declarations are parsed, so `height:0`, `height: 0px` and `max-height: 0rem`
/// are all recognised.
pub(crate) fn is_collapsed(sel: &Selection) -> bool {
    if !dom::has_class_token(sel, COLLAPSE_CLASS) {
        return false;
    }
    let Some(style) = dom::get_attribute(sel, "style") else {
        return false;
    };

    style.split(';').filter_map(|decl| decl.split_once(':')).any(|(property, value)| {
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim().trim_end_matches("!important").trim();
        match property.as_str() {
            "height" | "max-height" => ZERO_LENGTH.is_match(value),
            "opacity" => value.parse::<f32>().is_ok_and(|opacity| opacity.abs() < f32::EPSILON),
            _ => false,
        }
    })
}

fn trimmed_text(sel: &Selection) -> Option<String> {
    let text = dom::text_content(sel);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

impl ExtractionUnit for ClaudeUnit {
    fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Open the side panel through the last trigger only; the panel always
    /// shows the latest version once opened.
    fn prepare(&self, page: &dyn Page, options: &ExportOptions) {
        if !options.include_artifact {
            return;
        }
        let triggers = dom::select_all(page.document(), ARTIFACT_TRIGGER);
        let Some(last) = triggers.last() else {
            return;
        };
        page.activate(last);
        settle(page, options, ARTIFACT_PANEL);
    }

    fn extract_content(&self, node: &Selection, role: Role) -> String {
        match role {
            Role::User => self.resolver.extract_content(node, role),
            Role::Assistant => self.visible_content(node),
        }
    }

    fn artifact(&self, doc: &Document) -> Option<ArtifactRecord> {
        let Some(panel) = dom::select_first(doc, ARTIFACT_PANEL) else {
            tracing::debug!("no artifact panel on page");
            return None;
        };
        let Some(content) = dom::query_first(&panel, ARTIFACT_CONTENT) else {
            tracing::warn!(platform = "claude", "artifact panel rendered without content");
            return None;
        };

        let title = dom::select_all(doc, ARTIFACT_TRIGGER)
            .last()
            .and_then(trimmed_text)
            .unwrap_or_else(|| DEFAULT_ARTIFACT_TITLE.to_string());
        let version = dom::select_first(doc, ARTIFACT_VERSION)
            .and_then(|v| trimmed_text(&v))
            .unwrap_or_else(|| DEFAULT_ARTIFACT_VERSION.to_string());

        Some(ArtifactRecord {
            title,
            version,
            content_html: dom::inner_html(&content).to_string(),
        })
    }
}
