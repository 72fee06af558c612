//! The page being exported.
//!
//! Extraction never reaches for ambient global state: every operation gets a
//! [`Page`], which hands out the document, its URL and a way to actuate a
//! control. [`SnapshotPage`] implements it over a saved HTML snapshot.

use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::dom::{self, Document, Selection};
use crate::encoding::decode_snapshot;

/// A loaded chat page.
pub trait Page {
    /// Live document. Actuating controls may mutate it in place.
    fn document(&self) -> &Document;

    /// Address the page was loaded from.
    fn url(&self) -> &str;

    /// Actuate (click) a control.
    fn activate(&self, control: &Selection);
}

/// Hash of the markup under every element matching `selector`.
///
/// Used as the settle probe: equal fingerprints mean the region did not change.
#[must_use]
pub fn fingerprint(doc: &Document, selector: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    for sel in dom::select_all(doc, selector) {
        dom::outer_html(&sel).hash(&mut hasher);
    }
    hasher.finish()
}

/// How a scripted reaction changes its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionMode {
    /// Replace the target element itself.
    Replace,
    /// Replace the target's children.
    SetInner,
    /// Append after the target's last child.
    Append,
}

/// Scripted stand-in for what the real page renders after a click.
///
/// When an activated control matches `trigger`, the nearest element matching
/// `target` (searching outward from the control) is rewritten with `markup`.
#[derive(Debug, Clone)]
pub struct Reaction {
    pub trigger: String,
    pub target: String,
    pub markup: String,
    pub mode: ReactionMode,
}

impl Reaction {
    #[must_use]
    pub fn new(
        trigger: impl Into<String>,
        target: impl Into<String>,
        markup: impl Into<String>,
        mode: ReactionMode,
    ) -> Self {
        Self {
            trigger: trigger.into(),
            target: target.into(),
            markup: markup.into(),
            mode,
        }
    }
}

/// In-memory page over a saved HTML snapshot.
pub struct SnapshotPage {
    url: String,
    document: Document,
    reactions: Vec<Reaction>,
    activations: RefCell<Vec<String>>,
}

impl SnapshotPage {
    #[must_use]
    pub fn new(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: dom::parse(html),
            reactions: Vec::new(),
            activations: RefCell::new(Vec::new()),
        }
    }

    /// Build a page from raw snapshot bytes in any charset the snapshot declares.
    #[must_use]
    pub fn from_bytes(url: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(url, &decode_snapshot(bytes))
    }

    /// Add a scripted reaction.
    #[must_use]
    pub fn with_reaction(mut self, reaction: Reaction) -> Self {
        self.reactions.push(reaction);
        self
    }

    /// Descriptions of every activated control, in activation order.
    #[must_use]
    pub fn activations(&self) -> Vec<String> {
        self.activations.borrow().clone()
    }

    /// Current markup of the whole document.
    #[must_use]
    pub fn html(&self) -> String {
        self.document.html().to_string()
    }

    fn locate_target<'a>(&'a self, control: &Selection<'a>, target: &str) -> Option<Selection<'a>> {
        for ancestor in dom::ancestors(control) {
            if dom::matches(&ancestor, target) {
                return Some(ancestor);
            }
            if let Some(found) = dom::query_first(&ancestor, target) {
                return Some(found);
            }
        }
        dom::select_first(&self.document, target)
    }
}

impl Page for SnapshotPage {
    fn document(&self) -> &Document {
        &self.document
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn activate(&self, control: &Selection) {
        self.activations.borrow_mut().push(dom::describe(control));

        for reaction in &self.reactions {
            if !dom::matches(control, &reaction.trigger) {
                continue;
            }
            let Some(target) = self.locate_target(control, &reaction.target) else {
                tracing::debug!(target = %reaction.target, "reaction target not found");
                continue;
            };
            match reaction.mode {
                ReactionMode::Replace => dom::replace_with_html(&target, &reaction.markup),
                ReactionMode::SetInner => dom::set_inner_html(&target, &reaction.markup),
                ReactionMode::Append => dom::append_html(&target, &reaction.markup),
            }
        }
    }
}
