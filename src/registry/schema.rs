//! Raw strategy document, exactly as it appears on disk.
//!
//! Every field is optional so that a malformed document still deserializes
//! and validation can report all problems at once instead of the first one
//! serde trips over.

use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    pub version: Option<String>,
    pub last_updated: Option<String>,
    #[serde(default)]
    pub platforms: BTreeMap<String, Option<RawPlatform>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlatform {
    pub hostname: Option<String>,
    pub selectors: Option<RawSelectors>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSelectors {
    pub messages: Option<RawMessages>,
    pub content: Option<RawContent>,
    /// Empty string is meaningful: "no generation signal".
    pub generation: Option<String>,
    pub role: Option<RawRole>,
    pub title: Option<RawTitle>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessages {
    pub primary: Option<String>,
    pub fallbacks: Option<Vec<String>>,
    pub combined: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContent {
    pub user: Option<String>,
    pub assistant: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRole {
    pub strategy: Option<String>,

    // attribute
    pub attributes: Option<Vec<String>>,

    // hybrid
    pub marker_attribute: Option<String>,
    pub user_test_id: Option<String>,
    pub assistant_test_id: Option<String>,
    pub streaming_attribute: Option<String>,

    // tagname
    pub user_tag: Option<String>,
    pub assistant_tag: Option<String>,

    // sibling-button
    pub user_marker: Option<String>,
    pub assistant_marker: Option<String>,

    // combined-selector
    pub user_selector: Option<String>,
    pub assistant_selector: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTitle {
    pub strategy: Option<String>,
    pub prefix_pattern: Option<String>,
    pub suffix_pattern: Option<String>,
    pub emoji_pattern: Option<String>,
    pub selector: Option<String>,
}

impl RawDocument {
    /// Parse a strategy document without validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not syntactically valid or a field has
    /// the wrong JSON type.
    pub fn parse(json: &str) -> serde_json::Result<RawDocument> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_deserializes() {
        let doc = RawDocument::parse(r#"{"platforms": {"grok": {"hostname": "grok.com"}}}"#)
            .unwrap_or_default();
        let grok = doc.platforms.get("grok").cloned().flatten().unwrap_or_default();
        assert_eq!(grok.hostname.as_deref(), Some("grok.com"));
        assert!(grok.selectors.is_none());
        assert!(doc.version.is_none());
    }

    #[test]
    fn test_camel_case_role_fields() {
        let doc = RawDocument::parse(
            r#"{"platforms": {"claude": {"selectors": {"role": {
                "strategy": "hybrid", "userTestId": "u", "streamingAttribute": "s"
            }}}}}"#,
        )
        .unwrap_or_default();
        let role = doc
            .platforms
            .get("claude")
            .cloned()
            .flatten()
            .and_then(|p| p.selectors)
            .and_then(|s| s.role)
            .unwrap_or_default();
        assert_eq!(role.user_test_id.as_deref(), Some("u"));
        assert_eq!(role.streaming_attribute.as_deref(), Some("s"));
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        assert!(RawDocument::parse(r#"{"platforms": []}"#).is_err());
    }
}
