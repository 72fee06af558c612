//! ChatGPT: every step is declarative.
//!
//! Turns are `[data-message-author-role]` nodes (with `[data-turn]` and
//! conversation `article`s as fallbacks), and the role is the attribute value.

use super::ExtractionUnit;
use crate::registry::StrategyEntry;
use crate::resolver::Resolver;

pub struct ChatGptUnit {
    resolver: Resolver,
}

impl ChatGptUnit {
    #[must_use]
    pub fn new(entry: StrategyEntry) -> Self {
        Self {
            resolver: Resolver::new(entry),
        }
    }
}

impl ExtractionUnit for ChatGptUnit {
    fn resolver(&self) -> &Resolver {
        &self.resolver
    }
}
