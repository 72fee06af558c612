//! Typed strategy entries produced by validation.
//!
//! Once a [`StrategyEntry`] exists every field its role strategy needs is
//! present, so the resolver never has to re-check the document.

use crate::platform::Platform;
use crate::result::Role;

/// Where a platform's message boundary nodes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLocator {
    /// One selector matching every boundary, in document order.
    Combined(String),

    /// A primary selector and fallbacks tried in order until one matches.
    Chain {
        primary: String,
        fallbacks: Vec<String>,
    },
}

impl MessageLocator {
    /// Selectors in the order they should be tried.
    #[must_use]
    pub fn candidates(&self) -> Vec<&str> {
        match self {
            MessageLocator::Combined(selector) => vec![selector.as_str()],
            MessageLocator::Chain { primary, fallbacks } => std::iter::once(primary.as_str())
                .chain(fallbacks.iter().map(String::as_str))
                .collect(),
        }
    }
}

/// Role-specific selectors for the content container inside a boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLocator {
    pub user: String,
    pub assistant: String,
}

impl ContentLocator {
    #[must_use]
    pub fn for_role(&self, role: Role) -> &str {
        match role {
            Role::User => &self.user,
            Role::Assistant => &self.assistant,
        }
    }
}

/// How authorship is read off a boundary node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleStrategy {
    /// First listed attribute whose value is exactly `user` or `assistant`.
    Attribute { names: Vec<String> },

    /// Marker attribute value, then presence of a second attribute.
    Hybrid {
        marker_attribute: String,
        user_marker: String,
        assistant_marker_fallback: Option<String>,
        presence_marker: String,
    },

    /// Case-insensitive tag name comparison.
    TagName {
        user_tag: String,
        assistant_tag: String,
    },

    /// Labelled action buttons next to the boundary node.
    SiblingButton {
        user_label: String,
        assistant_label: String,
    },

    /// The boundary node itself matches one of two selectors.
    CombinedSelector {
        user_selector: String,
        assistant_selector: String,
    },
}

impl RoleStrategy {
    /// Name used in the strategy document.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            RoleStrategy::Attribute { .. } => "attribute",
            RoleStrategy::Hybrid { .. } => "hybrid",
            RoleStrategy::TagName { .. } => "tagname",
            RoleStrategy::SiblingButton { .. } => "sibling-button",
            RoleStrategy::CombinedSelector { .. } => "combined-selector",
        }
    }
}

/// Where the conversation title comes from.
///
/// Patterns are kept as source text and compiled when a title is read, so a
/// bad pattern only costs the title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleLocator {
    DocumentTitle {
        prefix_pattern: Option<String>,
        suffix_pattern: Option<String>,
        emoji_pattern: Option<String>,
    },
    Selector {
        css: String,
        emoji_pattern: Option<String>,
    },
}

impl TitleLocator {
    /// Every configured pattern, for validation.
    #[must_use]
    pub fn patterns(&self) -> Vec<(&'static str, &str)> {
        let mut out = Vec::new();
        match self {
            TitleLocator::DocumentTitle {
                prefix_pattern,
                suffix_pattern,
                emoji_pattern,
            } => {
                out.extend(prefix_pattern.as_deref().map(|p| ("prefixPattern", p)));
                out.extend(suffix_pattern.as_deref().map(|p| ("suffixPattern", p)));
                out.extend(emoji_pattern.as_deref().map(|p| ("emojiPattern", p)));
            }
            TitleLocator::Selector { emoji_pattern, .. } => {
                out.extend(emoji_pattern.as_deref().map(|p| ("emojiPattern", p)));
            }
        }
        out
    }
}

/// Validated extraction strategy for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyEntry {
    pub platform: Platform,

    /// Lower-cased hostname fragment used for detection.
    pub hostname: String,

    pub messages: MessageLocator,
    pub content: ContentLocator,

    /// Selector signalling an in-progress response; `None` when the platform
    /// has no reliable signal.
    pub generation: Option<String>,

    pub role: RoleStrategy,
    pub title: Option<TitleLocator>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_candidates_keep_order() {
        let locator = MessageLocator::Chain {
            primary: "a".to_string(),
            fallbacks: vec!["b".to_string(), "c".to_string()],
        };
        assert_eq!(locator.candidates(), vec!["a", "b", "c"]);
        assert_eq!(MessageLocator::Combined("x, y".to_string()).candidates(), vec!["x, y"]);
    }

    #[test]
    fn test_title_patterns() {
        let title = TitleLocator::DocumentTitle {
            prefix_pattern: Some("^A".to_string()),
            suffix_pattern: None,
            emoji_pattern: Some("^B".to_string()),
        };
        assert_eq!(title.patterns(), vec![("prefixPattern", "^A"), ("emojiPattern", "^B")]);
    }
}
