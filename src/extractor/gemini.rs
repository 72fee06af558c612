//! Gemini: turns are `<user-query>` / `<model-response>` custom elements, so
//! the tag name alone decides the role.

use super::ExtractionUnit;
use crate::registry::StrategyEntry;
use crate::resolver::Resolver;

pub struct GeminiUnit {
    resolver: Resolver,
}

impl GeminiUnit {
    #[must_use]
    pub fn new(entry: StrategyEntry) -> Self {
        Self {
            resolver: Resolver::new(entry),
        }
    }
}

impl ExtractionUnit for GeminiUnit {
    fn resolver(&self) -> &Resolver {
        &self.resolver
    }
}
