//! Pre-conversion cleanup of message fragments.
//!
//! Passes run in a fixed order: diagram output is removed first so that a
//! rendered diagram can never be mistaken for code by the later passes, then
//! the two code-block wrappers are flattened into `<pre><code class="language-X">`.

use crate::dom::{self, Selection};
use crate::markdown::rules::language_of;
use crate::options::SanitizeOptions;

/// Rendered diagram output with no recoverable text.
const DIAGRAM_OUTPUT: &[&str] = &[".mpr-rendered", ".mpr-toggle", "svg", "style"];

/// Highlighter wrapper: header chrome plus `pre > code` of `.line` spans.
const HIGHLIGHTED_BLOCK: &str = r#"[data-testid="code-block"]"#;
const HIGHLIGHTED_LANGUAGE: &str = ".text-secondary";
const HIGHLIGHTED_LINE: &str = ".line";

/// What a [`sanitize`] call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sanitized {
    pub diagrams_removed: usize,
    pub wrapped_code: usize,
    pub highlighted_code: usize,
}

/// Clean `root` in place according to `options`.
pub fn sanitize(root: &Selection, options: &SanitizeOptions) -> Sanitized {
    let mut report = Sanitized::default();

    if options.strip_diagrams {
        report.diagrams_removed = DIAGRAM_OUTPUT
            .iter()
            .map(|selector| dom::remove_all(root, selector))
            .sum();
    }
    if options.normalize_wrapped_code {
        report.wrapped_code = normalize_wrapped_code(root);
    }
    if options.normalize_highlighted_code {
        report.highlighted_code = normalize_highlighted_code(root);
    }

    if report != Sanitized::default() {
        tracing::debug!(?report, "sanitized fragment");
    }
    report
}

/// `<pre>` holding label and copy-button chrome around its `<code>`.
fn normalize_wrapped_code(root: &Selection) -> usize {
    let mut count = 0;
    for pre in dom::query_all(root, "pre") {
        let Some(code) = dom::query_first(&pre, "code") else {
            continue;
        };
        if dom::query_first(&pre, "div").is_none() {
            continue;
        }
        let language = language_of(&code).unwrap_or_default();
        let text = dom::text_content(&code);
        dom::set_inner_html(&pre, &code_element(&language, &text));
        count += 1;
    }
    count
}

/// Highlighter blocks whose lines are sibling spans, possibly with no newline
/// characters between them.
fn normalize_highlighted_code(root: &Selection) -> usize {
    let mut count = 0;
    for block in dom::query_all(root, HIGHLIGHTED_BLOCK) {
        let Some(code) = dom::query_first(&block, "pre code") else {
            continue;
        };
        let language = dom::query_first(&block, HIGHLIGHTED_LANGUAGE)
            .map(|label| dom::text_content(&label).trim().to_string())
            .unwrap_or_default();

        let lines = dom::query_all(&code, HIGHLIGHTED_LINE);
        let text = if lines.is_empty() {
            dom::text_content(&code).to_string()
        } else {
            lines
                .iter()
                .map(|line| dom::text_content(line).to_string())
                .collect::<Vec<_>>()
                .join("\n")
        };

        dom::replace_with_html(&block, &format!("<pre>{}</pre>", code_element(&language, &text)));
        count += 1;
    }
    count
}

fn code_element(language: &str, text: &str) -> String {
    if language.is_empty() {
        format!("<code>{}</code>", dom::escape_html(text))
    } else {
        format!(
            "<code class=\"language-{}\">{}</code>",
            dom::escape_html(language),
            dom::escape_html(text)
        )
    }
}
