//! Conversation title lookup.

use regex::Regex;

use crate::dom::{self, Document};
use crate::registry::TitleLocator;

/// Remove the first match of `pattern` from `text`.
fn strip(text: &str, pattern: Option<&str>) -> Result<String, regex::Error> {
    match pattern {
        Some(pattern) => Ok(Regex::new(pattern)?.replace(text, "").into_owned()),
        None => Ok(text.to_string()),
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Read the title described by `locator`.
///
/// # Errors
///
/// Returns an error only when a configured pattern fails to compile.
pub fn read_title(doc: &Document, locator: &TitleLocator) -> Result<Option<String>, regex::Error> {
    match locator {
        TitleLocator::DocumentTitle {
            prefix_pattern,
            suffix_pattern,
            emoji_pattern,
        } => {
            let Some(raw) = non_empty(&dom::document_title(doc)) else {
                return Ok(None);
            };
            let title = strip(&raw, prefix_pattern.as_deref())?;
            let title = strip(&title, suffix_pattern.as_deref())?;
            let title = strip(&title, emoji_pattern.as_deref())?;
            Ok(non_empty(&title))
        }
        TitleLocator::Selector { css, emoji_pattern } => {
            let Some(raw) = dom::select_first(doc, css).and_then(|el| non_empty(&el.text())) else {
                return Ok(None);
            };
            let title = strip(&raw, emoji_pattern.as_deref())?;
            Ok(non_empty(&title))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMOJI: &str = r"^[\p{Extended_Pictographic}\x{FE0F}\x{200D}\s]+";

    fn document_title(prefix: Option<&str>, suffix: Option<&str>) -> TitleLocator {
        TitleLocator::DocumentTitle {
            prefix_pattern: prefix.map(str::to_string),
            suffix_pattern: suffix.map(str::to_string),
            emoji_pattern: Some(EMOJI.to_string()),
        }
    }

    fn page(title: &str) -> Document {
        dom::parse(&format!("<html><head><title>{title}</title></head><body></body></html>"))
    }

    #[test]
    fn test_prefix_and_emoji_are_stripped() {
        let locator = document_title(Some(r"^ChatGPT\s*[-–—]\s*"), None);
        let title = read_title(&page("ChatGPT – 🚀 Rocket maths"), &locator);
        assert_eq!(title.ok().flatten().as_deref(), Some("Rocket maths"));
    }

    #[test]
    fn test_suffix_is_stripped() {
        let locator = document_title(None, Some(r"\s*[-–—]\s*Grok\s*$"));
        let title = read_title(&page("Tech Talk - Grok"), &locator);
        assert_eq!(title.ok().flatten().as_deref(), Some("Tech Talk"));
    }

    #[test]
    fn test_title_that_is_only_decoration_is_absent() {
        let locator = document_title(Some(r"^ChatGPT\s*[-–—]?\s*"), None);
        assert_eq!(read_title(&page("ChatGPT"), &locator).ok().flatten(), None);
        assert_eq!(read_title(&page("   "), &locator).ok().flatten(), None);
    }

    #[test]
    fn test_selector_uses_text_not_markup() {
        let locator = TitleLocator::Selector {
            css: ".conversation-title".to_string(),
            emoji_pattern: Some(EMOJI.to_string()),
        };
        let doc = dom::parse(r#"<div class="conversation-title"> ✨ <b>Trip</b> plan </div>"#);
        assert_eq!(read_title(&doc, &locator).ok().flatten().as_deref(), Some("Trip plan"));

        let doc = dom::parse("<div></div>");
        assert_eq!(read_title(&doc, &locator).ok().flatten(), None);
    }

    #[test]
    fn test_bad_pattern_is_an_error() {
        let locator = document_title(Some("(unclosed"), None);
        assert!(read_title(&page("Anything"), &locator).is_err());
    }
}
