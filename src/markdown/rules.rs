//! Domain rules layered over the generic conversion: fenced code, tables and
//! KaTeX math.
//!
//! [`prerender`] renders each of these to Markdown up front and leaves a slot
//! token in its place, so the generic converter only ever sees plain text
//! where they were. [`Slots::restore`] puts the rendered Markdown back.

use dom_query::NodeRef;
use regex::Captures;

use crate::dom::{self, Selection};
use crate::patterns::{BACKTICK_RUN, LANGUAGE_CLASS, SLOT_TOKEN, WHITESPACE_RUN};

/// Class of the display-math wrapper.
pub const BLOCK_MATH_CLASS: &str = "katex-display";

/// Class of every rendered formula, display or inline.
pub const MATH_CLASS: &str = "katex";

const TEX_ENCODING: &str = "application/x-tex";

/// Elements whose content is phrasing: a block placed inside one has to stay
/// on the same line.
const PHRASING_PARENTS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "span", "a", "b", "strong", "i", "em", "u", "s",
    "del", "strike", "mark", "small", "sub", "sup", "label", "summary", "dt", "caption",
];

// === Slots ===

/// Markdown rendered ahead of the generic conversion, indexed by slot token.
#[derive(Debug, Default)]
pub struct Slots {
    rendered: Vec<String>,
}

impl Slots {
    fn push(&mut self, markdown: String) -> String {
        let token = format!("CXSLOT{}XC", self.rendered.len());
        self.rendered.push(markdown);
        token
    }

    /// Number of slots filled.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rendered.len()
    }

    /// Whether nothing was pre-rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }

    /// Replace every slot token in `text` with its Markdown.
    ///
    /// Multi-line Markdown that lands after a list marker or quote prefix has
    /// its later lines indented to stay inside that item. Tokens with no slot
    /// are left as they are.
    #[must_use]
    pub fn restore(&self, text: &str) -> String {
        SLOT_TOKEN
            .replace_all(text, |caps: &Captures| {
                let Some(markdown) = caps[1].parse::<usize>().ok().and_then(|idx| self.rendered.get(idx)) else {
                    return caps[0].to_string();
                };
                let start = caps.get(0).map_or(0, |m| m.start());
                let line_start = text[..start].rfind('\n').map_or(0, |pos| pos + 1);
                match continuation(&text[line_start..start]) {
                    Some(indent) if markdown.contains('\n') => indent_continuation(markdown, &indent),
                    _ => markdown.clone(),
                }
            })
            .into_owned()
    }
}

/// Indent for the lines after the first when a block follows `prefix` on
/// its line, or `None` when the prefix is ordinary text.
fn continuation(prefix: &str) -> Option<String> {
    let trimmed = prefix.trim_start();
    if trimmed.is_empty() {
        return (!prefix.is_empty()).then(|| prefix.to_string());
    }
    if prefix.chars().all(|c| c == '>' || c.is_whitespace()) {
        return Some(prefix.to_string());
    }
    let marker = trimmed.trim_end();
    let is_marker = matches!(marker, "-" | "*" | "+")
        || marker
            .strip_suffix(['.', ')'])
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()));
    (is_marker && prefix.ends_with(char::is_whitespace)).then(|| " ".repeat(prefix.chars().count()))
}

fn indent_continuation(markdown: &str, indent: &str) -> String {
    markdown
        .split('\n')
        .enumerate()
        .map(|(idx, line)| {
            if idx == 0 || line.is_empty() {
                line.to_string()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// === Pre-rendering ===

/// Render display math, inline math, tables and code blocks below `root` to
/// Markdown, replacing each with a slot token.
///
/// Math goes first so formulas inside tables end up as TeX in the cells.
/// Elements that render to nothing are removed outright.
pub fn prerender(root: &Selection) -> Slots {
    let mut slots = Slots::default();

    for display in dom::query_all(root, &format!(".{BLOCK_MATH_CLASS}")) {
        let markdown = display.nodes().first().and_then(block_math).unwrap_or_default();
        let phrasing = in_phrasing(&display);
        place(&display, markdown, phrasing, &mut slots);
    }

    for formula in dom::query_all(root, &format!(".{MATH_CLASS}")) {
        let markdown = formula.nodes().first().map(inline_math).unwrap_or_default();
        place(&formula, markdown, true, &mut slots);
    }

    for outer in dom::query_all(root, "table") {
        if dom::closest_ancestor(&outer, "table").is_some() {
            continue;
        }
        if let Some(markdown) = table(&outer) {
            let markdown = slots.restore(&markdown);
            place(&outer, markdown, false, &mut slots);
        }
    }

    for pre in dom::query_all(root, "pre") {
        if dom::closest_ancestor(&pre, "pre").is_some() {
            continue;
        }
        let markdown = code_fence(&pre);
        place(&pre, markdown, false, &mut slots);
    }

    if !slots.is_empty() {
        tracing::trace!(slots = slots.len(), "pre-rendered domain blocks");
    }
    slots
}

fn place(sel: &Selection, markdown: String, inline: bool, slots: &mut Slots) {
    if markdown.is_empty() {
        sel.remove();
        return;
    }
    let token = slots.push(markdown);
    if inline {
        dom::replace_with_html(sel, &token);
    } else {
        dom::replace_with_html(sel, &format!("<p>{token}</p>"));
    }
}

/// Whether `sel` sits inside a heading, paragraph or other phrasing element.
fn in_phrasing(sel: &Selection) -> bool {
    dom::ancestors(sel).iter().any(|ancestor| {
        dom::tag_name(ancestor).is_some_and(|tag| PHRASING_PARENTS.contains(&tag.as_str()))
    })
}

// === Code ===

/// Backtick fence long enough to enclose `content`, at least `min` long.
#[must_use]
pub fn fence_for(content: &str, min: usize) -> String {
    let longest = BACKTICK_RUN
        .find_iter(content)
        .map(|m| m.as_str().len())
        .max()
        .unwrap_or(0);
    "`".repeat(min.max(longest + 1))
}

/// Language token from a `language-X` class, if any.
#[must_use]
pub fn language_of(code: &Selection) -> Option<String> {
    let class = dom::class_name(code)?;
    LANGUAGE_CLASS
        .captures(&class)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Fenced block for a `<pre>`, reading the language from its `<code>` child.
///
/// A `<pre>` without a direct `<code>` child becomes an untagged fence around
/// its text.
#[must_use]
pub fn code_fence(pre: &Selection) -> String {
    let code = pre
        .nodes()
        .first()
        .and_then(|node| {
            node.children()
                .into_iter()
                .find(|child| child.is_element() && child.node_name().is_some_and(|n| n.eq_ignore_ascii_case("code")))
        })
        .map(Selection::from);

    let (language, text) = match &code {
        Some(code) => (language_of(code).unwrap_or_default(), dom::text_content(code).to_string()),
        None => (String::new(), dom::text_content(pre).to_string()),
    };
    let text = text.strip_suffix('\n').unwrap_or(&text);
    let fence = fence_for(text, 3);

    format!("{fence}{language}\n{text}\n{fence}")
}

// === Tables ===

/// Pipe table built from cell text.
///
/// The first row is the header; the separator has one `---` per header cell.
/// Rows of nested tables are left to those tables. Returns `None` when the
/// table has no rows so the caller can pass its content through instead.
#[must_use]
pub fn table(table: &Selection) -> Option<String> {
    let own_id = dom::node_id(table);
    let rows: Vec<Vec<String>> = dom::query_all(table, "tr")
        .iter()
        .filter(|tr| dom::closest_ancestor(tr, "table").and_then(|t| dom::node_id(&t)) == own_id)
        .map(row_cells)
        .filter(|cells| !cells.is_empty())
        .collect();

    let (header, body) = rows.split_first()?;

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(pipe_row(header));
    lines.push(pipe_row(&vec!["---".to_string(); header.len()]));
    lines.extend(body.iter().map(|row| pipe_row(row)));
    Some(lines.join("\n"))
}

fn row_cells(tr: &Selection) -> Vec<String> {
    tr.nodes()
        .first()
        .map(|node| {
            node.children()
                .into_iter()
                .filter(|child| {
                    child.is_element()
                        && child
                            .node_name()
                            .is_some_and(|n| n.eq_ignore_ascii_case("td") || n.eq_ignore_ascii_case("th"))
                })
                .map(|cell| cell_text(&Selection::from(cell)))
                .collect()
        })
        .unwrap_or_default()
}

/// Trimmed cell text on one line, with pipes escaped.
fn cell_text(cell: &Selection) -> String {
    let text = dom::text_content(cell);
    WHITESPACE_RUN
        .replace_all(text.trim(), " ")
        .replace('|', r"\|")
}

fn pipe_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

// === Math ===

/// LaTeX source from the `annotation[encoding="application/x-tex"]` below `node`.
#[must_use]
pub fn latex_source(node: &NodeRef) -> Option<String> {
    node.descendants()
        .into_iter()
        .find(|desc| {
            desc.is_element()
                && desc.node_name().is_some_and(|n| n.eq_ignore_ascii_case("annotation"))
                && desc.attr("encoding").is_some_and(|enc| enc.trim() == TEX_ENCODING)
        })
        .map(|annotation| annotation.text().trim().to_string())
        .filter(|latex| !latex.is_empty())
}

/// `$$latex$$`, or nothing when the formula has no recoverable source.
#[must_use]
pub fn block_math(node: &NodeRef) -> Option<String> {
    latex_source(node).map(|latex| format!("$${latex}$$"))
}

/// `$latex$`, or an empty string when the formula has no recoverable source.
#[must_use]
pub fn inline_math(node: &NodeRef) -> String {
    latex_source(node)
        .map(|latex| format!("${latex}$"))
        .unwrap_or_default()
}
