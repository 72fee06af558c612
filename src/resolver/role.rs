//! Role classification, one branch per [`RoleStrategy`].

use crate::dom::{self, Selection};
use crate::error::{Error, Result};
use crate::platform::Platform;
use crate::registry::RoleStrategy;
use crate::result::Role;

/// Classify a boundary node.
///
/// # Errors
///
/// Returns [`Error::RoleResolution`] with a snapshot of the node when the
/// strategy cannot decide. The sibling-button strategy never fails.
pub fn classify(strategy: &RoleStrategy, node: &Selection, platform: Platform) -> Result<Role> {
    let role = match strategy {
        RoleStrategy::Attribute { names } => by_attribute(node, names),
        RoleStrategy::Hybrid {
            marker_attribute,
            user_marker,
            assistant_marker_fallback,
            presence_marker,
        } => by_hybrid(
            node,
            marker_attribute,
            user_marker,
            assistant_marker_fallback.as_deref(),
            presence_marker,
        ),
        RoleStrategy::TagName {
            user_tag,
            assistant_tag,
        } => by_tag_name(node, user_tag, assistant_tag),
        RoleStrategy::SiblingButton {
            user_label,
            assistant_label,
        } => Some(by_sibling_button(node, user_label, assistant_label)),
        RoleStrategy::CombinedSelector {
            user_selector,
            assistant_selector,
        } => by_selector(node, user_selector, assistant_selector),
    };

    role.ok_or_else(|| Error::RoleResolution {
        platform: platform.display_name().to_string(),
        diagnostic: Box::new(dom::diagnose(node)),
    })
}

fn by_attribute(node: &Selection, names: &[String]) -> Option<Role> {
    names
        .iter()
        .filter_map(|name| dom::get_attribute(node, name))
        .find_map(|value| Role::from_value(&value))
}

/// Marker value for user, then marker value for assistant, then bare
/// presence of the streaming attribute (whatever its value) for assistant.
fn by_hybrid(
    node: &Selection,
    marker_attribute: &str,
    user_marker: &str,
    assistant_marker: Option<&str>,
    presence_marker: &str,
) -> Option<Role> {
    let marker = dom::get_attribute(node, marker_attribute);
    if marker.as_deref() == Some(user_marker) {
        return Some(Role::User);
    }
    if assistant_marker.is_some() && marker.as_deref() == assistant_marker {
        return Some(Role::Assistant);
    }
    if dom::has_attribute(node, presence_marker) {
        return Some(Role::Assistant);
    }
    None
}

fn by_tag_name(node: &Selection, user_tag: &str, assistant_tag: &str) -> Option<Role> {
    let tag = dom::tag_name(node)?;
    if tag.eq_ignore_ascii_case(user_tag) {
        Some(Role::User)
    } else if tag.eq_ignore_ascii_case(assistant_tag) {
        Some(Role::Assistant)
    } else {
        None
    }
}

/// Selector for a button carrying exactly `label` as its accessible name.
pub(crate) fn labelled_button(label: &str) -> String {
    let escaped = label.replace('\\', "\\\\").replace('"', "\\\"");
    format!("button[aria-label=\"{escaped}\"]")
}

fn by_sibling_button(node: &Selection, user_label: &str, assistant_label: &str) -> Role {
    let parent = dom::parent(node);
    if dom::query_first(&parent, &labelled_button(assistant_label)).is_some() {
        return Role::Assistant;
    }
    if dom::query_first(&parent, &labelled_button(user_label)).is_some() {
        return Role::User;
    }
    tracing::debug!(node = %dom::describe(node), "no role button next to message, assuming user");
    Role::User
}

fn by_selector(node: &Selection, user_selector: &str, assistant_selector: &str) -> Option<Role> {
    if dom::matches(node, assistant_selector) {
        Some(Role::Assistant)
    } else if dom::matches(node, user_selector) {
        Some(Role::User)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hybrid() -> RoleStrategy {
        RoleStrategy::Hybrid {
            marker_attribute: "data-testid".to_string(),
            user_marker: "user-message".to_string(),
            assistant_marker_fallback: Some("assistant-message".to_string()),
            presence_marker: "data-is-streaming".to_string(),
        }
    }

    fn classify_first(strategy: &RoleStrategy, html: &str) -> Result<Role> {
        let doc = dom::parse(html);
        let node = doc.select("body > *");
        let first = node.first();
        classify(strategy, &first, Platform::Claude)
    }

    #[test]
    fn test_attribute_scans_names_in_order() {
        let strategy = RoleStrategy::Attribute {
            names: vec!["data-message-author-role".to_string(), "data-turn".to_string()],
        };
        let role = classify_first(&strategy, r#"<div data-message-author-role="tool" data-turn="assistant"></div>"#);
        assert_eq!(role.ok(), Some(Role::Assistant));

        let role = classify_first(&strategy, r#"<div data-turn="system"></div>"#);
        assert!(matches!(role, Err(Error::RoleResolution { .. })));
    }

    #[test]
    fn test_hybrid_presence_with_falsy_value() {
        let role = classify_first(&hybrid(), r#"<div data-is-streaming="false"></div>"#);
        assert_eq!(role.ok(), Some(Role::Assistant));

        let role = classify_first(&hybrid(), r#"<div data-is-streaming=""></div>"#);
        assert_eq!(role.ok(), Some(Role::Assistant));
    }

    #[test]
    fn test_hybrid_user_marker_wins() {
        let role = classify_first(&hybrid(), r#"<div data-testid="user-message" data-is-streaming="false"></div>"#);
        assert_eq!(role.ok(), Some(Role::User));
    }

    #[test]
    fn test_hybrid_failure_carries_diagnostic() {
        let Err(Error::RoleResolution { platform, diagnostic }) =
            classify_first(&hybrid(), r#"<div id="m1" class="turn" data-testid="other">body</div>"#)
        else {
            panic!("expected role resolution failure");
        };
        assert_eq!(platform, "Claude");
        assert_eq!(diagnostic.id.as_deref(), Some("m1"));
        assert_eq!(diagnostic.classes.as_deref(), Some("turn"));
        assert_eq!(diagnostic.content_preview, "body");
    }

    #[test]
    fn test_tag_name_is_case_insensitive() {
        let strategy = RoleStrategy::TagName {
            user_tag: "USER-QUERY".to_string(),
            assistant_tag: "model-response".to_string(),
        };
        assert_eq!(classify_first(&strategy, "<user-query></user-query>").ok(), Some(Role::User));
        assert_eq!(
            classify_first(&strategy, "<model-response></model-response>").ok(),
            Some(Role::Assistant)
        );
        assert!(classify_first(&strategy, "<div></div>").is_err());
    }

    #[test]
    fn test_sibling_button_prefers_assistant_and_defaults_to_user() {
        let strategy = RoleStrategy::SiblingButton {
            user_label: "Edit".to_string(),
            assistant_label: "Regenerate".to_string(),
        };
        let doc = dom::parse(
            r#"<section id="a"><div class="message-bubble">x</div>
                 <button aria-label="Edit"></button><button aria-label="Regenerate"></button></section>
               <section id="b"><div class="message-bubble">y</div><button aria-label="Edit"></button></section>
               <section id="c"><div class="message-bubble">z</div></section>"#,
        );
        let roles: Vec<_> = doc
            .select(".message-bubble")
            .iter()
            .map(|node| classify(&strategy, &node, Platform::Grok).ok())
            .collect();
        assert_eq!(roles, vec![Some(Role::Assistant), Some(Role::User), Some(Role::User)]);
    }

    #[test]
    fn test_combined_selector() {
        let strategy = RoleStrategy::CombinedSelector {
            user_selector: r#"h1[class*="group/query"]"#.to_string(),
            assistant_selector: r#"div[id^="markdown-content-"]"#.to_string(),
        };
        assert_eq!(
            classify_first(&strategy, r#"<h1 class="group/query text-xl">q</h1>"#).ok(),
            Some(Role::User)
        );
        assert_eq!(
            classify_first(&strategy, r#"<div id="markdown-content-0">a</div>"#).ok(),
            Some(Role::Assistant)
        );
        assert!(classify_first(&strategy, "<p>?</p>").is_err());
    }

    #[test]
    fn test_labelled_button_escapes_quotes() {
        assert_eq!(labelled_button(r#"Say "hi""#), r#"button[aria-label="Say \"hi\""]"#);
    }
}
