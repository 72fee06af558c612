//! Strategy document validation.
//!
//! Turns a [`RawDocument`] into typed [`StrategyEntry`] values, collecting every
//! problem instead of stopping at the first. The registry treats any violation
//! as fatal; the `validate_strategies` binary prints them all.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;

use super::schema::{RawDocument, RawMessages, RawPlatform, RawRole, RawTitle};
use super::types::{ContentLocator, MessageLocator, RoleStrategy, StrategyEntry, TitleLocator};
use crate::platform::Platform;

/// Marker attribute read by the hybrid strategy when none is configured.
pub const DEFAULT_HYBRID_MARKER: &str = "data-testid";

/// One problem found in the strategy document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Platform key the finding belongs to, or `*` for document-level findings.
    pub platform: String,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.platform, self.message)
    }
}

/// Outcome of validating a whole document.
#[derive(Debug, Default)]
pub struct Report {
    /// Entries that passed validation.
    pub entries: HashMap<Platform, StrategyEntry>,

    /// Problems that make the document unusable.
    pub violations: Vec<Finding>,

    /// Problems that only degrade optional behaviour (titles, generation lock).
    pub warnings: Vec<Finding>,
}

impl Report {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Validate every platform in `doc`.
#[must_use]
pub fn validate(doc: &RawDocument) -> Report {
    let mut report = Report::default();

    if doc.version.as_deref().is_none_or(str::is_empty) {
        report.warnings.push(document_finding("missing 'version'"));
    }
    if doc.last_updated.as_deref().is_none_or(str::is_empty) {
        report.warnings.push(document_finding("missing 'lastUpdated'"));
    }

    for platform in Platform::ALL {
        let mut checker = Checker::new(platform);
        match doc.platforms.get(platform.key()) {
            Some(Some(raw)) => {
                if let Some(entry) = checker.platform(raw) {
                    report.entries.insert(platform, entry);
                }
            }
            _ => checker.violation("missing configuration"),
        }
        report.violations.append(&mut checker.violations);
        report.warnings.append(&mut checker.warnings);
    }

    for key in doc.platforms.keys() {
        if Platform::from_key(key).is_none() {
            report.warnings.push(Finding {
                platform: key.clone(),
                message: "unknown platform key, entry ignored".to_string(),
            });
        }
    }

    report
}

fn document_finding(message: &str) -> Finding {
    Finding {
        platform: "*".to_string(),
        message: message.to_string(),
    }
}

/// Non-empty string field, treating `""` as missing.
fn present(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

struct Checker {
    platform: Platform,
    violations: Vec<Finding>,
    warnings: Vec<Finding>,
}

impl Checker {
    fn new(platform: Platform) -> Self {
        Self {
            platform,
            violations: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn violation(&mut self, message: impl Into<String>) {
        self.violations.push(Finding {
            platform: self.platform.key().to_string(),
            message: message.into(),
        });
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(Finding {
            platform: self.platform.key().to_string(),
            message: message.into(),
        });
    }

    /// Required string field; records a violation when absent.
    fn required(&mut self, value: Option<&String>, name: &str) -> Option<String> {
        let found = present(value);
        if found.is_none() {
            self.violation(format!("missing '{name}'"));
        }
        found
    }

    fn platform(&mut self, raw: &RawPlatform) -> Option<StrategyEntry> {
        let hostname = self
            .required(raw.hostname.as_ref(), "hostname")
            .map(|h| h.to_ascii_lowercase());

        let Some(selectors) = raw.selectors.as_ref() else {
            self.violation("missing 'selectors'");
            return None;
        };

        let messages = match selectors.messages.as_ref() {
            Some(messages) => self.messages(messages),
            None => {
                self.violation("missing 'selectors.messages'");
                None
            }
        };

        let content = match selectors.content.as_ref() {
            Some(content) => {
                let user = self.required(content.user.as_ref(), "content.user");
                let assistant = self.required(content.assistant.as_ref(), "content.assistant");
                user.zip(assistant)
                    .map(|(user, assistant)| ContentLocator { user, assistant })
            }
            None => {
                self.violation("missing 'selectors.content'");
                None
            }
        };

        let generation = match selectors.generation.as_deref() {
            None => {
                self.violation("missing 'selectors.generation' (use \"\" for no signal)");
                None
            }
            Some(selector) if selector.trim().is_empty() => {
                self.warning("no generation signal; exports are never blocked");
                Some(None)
            }
            Some(selector) => Some(Some(selector.to_string())),
        };

        let role = match selectors.role.as_ref() {
            Some(role) => self.role(role),
            None => {
                self.violation("missing 'selectors.role'");
                None
            }
        };

        let title = selectors.title.as_ref().and_then(|title| self.title(title));

        Some(StrategyEntry {
            platform: self.platform,
            hostname: hostname?,
            messages: messages?,
            content: content?,
            generation: generation?,
            role: role?,
            title,
        })
    }

    fn messages(&mut self, raw: &RawMessages) -> Option<MessageLocator> {
        if let Some(combined) = present(raw.combined.as_ref()) {
            return Some(MessageLocator::Combined(combined));
        }
        let Some(primary) = present(raw.primary.as_ref()) else {
            self.violation("missing 'primary' or 'combined' message selector");
            return None;
        };
        let fallbacks = raw
            .fallbacks
            .iter()
            .flatten()
            .filter(|f| !f.trim().is_empty())
            .cloned()
            .collect();
        Some(MessageLocator::Chain { primary, fallbacks })
    }

    fn role(&mut self, raw: &RawRole) -> Option<RoleStrategy> {
        let Some(strategy) = present(raw.strategy.as_ref()) else {
            self.violation("missing 'role.strategy'");
            return None;
        };

        match strategy.as_str() {
            "attribute" => {
                let names: Vec<String> = raw
                    .attributes
                    .iter()
                    .flatten()
                    .filter(|n| !n.trim().is_empty())
                    .cloned()
                    .collect();
                if names.is_empty() {
                    self.violation("missing 'role.attributes' for 'attribute' strategy");
                    return None;
                }
                Some(RoleStrategy::Attribute { names })
            }
            "hybrid" => {
                let user_marker = self.required(raw.user_test_id.as_ref(), "role.userTestId");
                let presence_marker =
                    self.required(raw.streaming_attribute.as_ref(), "role.streamingAttribute");
                Some(RoleStrategy::Hybrid {
                    marker_attribute: present(raw.marker_attribute.as_ref())
                        .unwrap_or_else(|| DEFAULT_HYBRID_MARKER.to_string()),
                    user_marker: user_marker?,
                    assistant_marker_fallback: present(raw.assistant_test_id.as_ref()),
                    presence_marker: presence_marker?,
                })
            }
            "tagname" => {
                let user_tag = self.required(raw.user_tag.as_ref(), "role.userTag");
                let assistant_tag = self.required(raw.assistant_tag.as_ref(), "role.assistantTag");
                Some(RoleStrategy::TagName {
                    user_tag: user_tag?,
                    assistant_tag: assistant_tag?,
                })
            }
            "sibling-button" => {
                let user_label = self.required(raw.user_marker.as_ref(), "role.userMarker");
                let assistant_label =
                    self.required(raw.assistant_marker.as_ref(), "role.assistantMarker");
                Some(RoleStrategy::SiblingButton {
                    user_label: user_label?,
                    assistant_label: assistant_label?,
                })
            }
            "combined-selector" => {
                let user_selector = self.required(raw.user_selector.as_ref(), "role.userSelector");
                let assistant_selector =
                    self.required(raw.assistant_selector.as_ref(), "role.assistantSelector");
                Some(RoleStrategy::CombinedSelector {
                    user_selector: user_selector?,
                    assistant_selector: assistant_selector?,
                })
            }
            other => {
                self.violation(format!("unknown role strategy '{other}'"));
                None
            }
        }
    }

    /// Titles are cosmetic: every problem here is a warning and drops the title.
    fn title(&mut self, raw: &RawTitle) -> Option<TitleLocator> {
        let locator = match raw.strategy.as_deref() {
            Some("document-title") => TitleLocator::DocumentTitle {
                prefix_pattern: present(raw.prefix_pattern.as_ref()),
                suffix_pattern: present(raw.suffix_pattern.as_ref()),
                emoji_pattern: present(raw.emoji_pattern.as_ref()),
            },
            Some("selector") => {
                let Some(css) = present(raw.selector.as_ref()) else {
                    self.warning("'selector' title strategy without 'title.selector'");
                    return None;
                };
                TitleLocator::Selector {
                    css,
                    emoji_pattern: present(raw.emoji_pattern.as_ref()),
                }
            }
            Some(other) => {
                self.warning(format!("unknown title strategy '{other}'"));
                return None;
            }
            None => {
                self.warning("missing 'title.strategy'");
                return None;
            }
        };

        for (name, pattern) in locator.patterns() {
            if let Err(err) = Regex::new(pattern) {
                self.warning(format!("title.{name} does not compile: {err}"));
            }
        }

        Some(locator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawDocument {
        RawDocument::parse(json).unwrap_or_default()
    }

    #[test]
    fn test_empty_document_reports_every_platform() {
        let report = validate(&raw("{}"));
        assert!(!report.is_valid());
        assert_eq!(report.violations.len(), Platform::ALL.len());
        assert!(report.entries.is_empty());
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_all_missing_fields_are_collected() {
        let report = validate(&raw(
            r#"{"platforms": {"chatgpt": {"selectors": {"messages": {}, "content": {}, "role": {"strategy": "attribute", "attributes": []}}}}}"#,
        ));
        let chatgpt: Vec<_> = report
            .violations
            .iter()
            .filter(|f| f.platform == "chatgpt")
            .map(|f| f.message.as_str())
            .collect();
        assert!(chatgpt.contains(&"missing 'hostname'"));
        assert!(chatgpt.contains(&"missing 'primary' or 'combined' message selector"));
        assert!(chatgpt.contains(&"missing 'content.user'"));
        assert!(chatgpt.contains(&"missing 'content.assistant'"));
        assert!(chatgpt.iter().any(|m| m.starts_with("missing 'selectors.generation'")));
        assert!(chatgpt.contains(&"missing 'role.attributes' for 'attribute' strategy"));
    }

    #[test]
    fn test_hybrid_needs_presence_marker() {
        let report = validate(&raw(
            r#"{"platforms": {"claude": {"hostname": "claude.ai", "selectors": {
                "messages": {"combined": "div"}, "content": {"user": "a", "assistant": "b"},
                "generation": "", "role": {"strategy": "hybrid", "userTestId": "user-message"}}}}}"#,
        ));
        assert!(report
            .violations
            .iter()
            .any(|f| f.platform == "claude" && f.message == "missing 'role.streamingAttribute'"));
        assert!(!report.entries.contains_key(&Platform::Claude));
    }

    #[test]
    fn test_unknown_role_strategy() {
        let report = validate(&raw(
            r#"{"platforms": {"gemini": {"hostname": "g", "selectors": {"role": {"strategy": "vibes"}}}}}"#,
        ));
        assert!(report
            .violations
            .iter()
            .any(|f| f.message == "unknown role strategy 'vibes'"));
    }

    #[test]
    fn test_bad_title_pattern_is_only_a_warning() {
        let report = validate(&raw(
            r#"{"platforms": {"grok": {"hostname": "grok.com", "selectors": {
                "messages": {"combined": ".message-bubble"},
                "content": {"user": "x", "assistant": "y"}, "generation": "",
                "role": {"strategy": "sibling-button", "userMarker": "Edit", "assistantMarker": "Regenerate"},
                "title": {"strategy": "document-title", "suffixPattern": "(unclosed"}}}}}"#,
        ));
        assert!(report.entries.contains_key(&Platform::Grok));
        assert!(report
            .warnings
            .iter()
            .any(|f| f.platform == "grok" && f.message.starts_with("title.suffixPattern")));
        assert!(report
            .warnings
            .iter()
            .any(|f| f.platform == "grok" && f.message.starts_with("no generation signal")));
    }

    #[test]
    fn test_hybrid_marker_attribute_defaults() {
        let report = validate(&raw(
            r#"{"platforms": {"claude": {"hostname": "Claude.AI", "selectors": {
                "messages": {"combined": "div"}, "content": {"user": "a", "assistant": "b"},
                "generation": "[data-is-streaming=\"true\"]",
                "role": {"strategy": "hybrid", "userTestId": "user-message", "streamingAttribute": "data-is-streaming"}}}}}"#,
        ));
        let Some(entry) = report.entries.get(&Platform::Claude) else {
            panic!("claude entry should validate: {:?}", report.violations);
        };
        assert_eq!(entry.hostname, "claude.ai");
        assert_eq!(
            entry.role,
            RoleStrategy::Hybrid {
                marker_attribute: DEFAULT_HYBRID_MARKER.to_string(),
                user_marker: "user-message".to_string(),
                assistant_marker_fallback: None,
                presence_marker: "data-is-streaming".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_platform_key_warns() {
        let report = validate(&raw(r#"{"platforms": {"bard": {}}}"#));
        assert!(report.warnings.iter().any(|f| f.platform == "bard"));
    }
}
