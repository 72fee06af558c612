//! Compiled regex patterns shared by the sanitizer, converter and filename layers.
//!
//! All patterns are compiled once on first use using `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Code Blocks
// =============================================================================

/// Language token on a `<code>` element, e.g. `language-python`.
pub static LANGUAGE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)language-([\w+#.\-]+)").expect("LANGUAGE_CLASS regex"));

/// Run of backticks inside code text; fences must be longer than the longest run.
pub static BACKTICK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`+").expect("BACKTICK_RUN regex"));

// =============================================================================
// Whitespace
// =============================================================================

/// Any run of HTML whitespace, collapsed to one space in flowing text.
pub static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\n\f]+").expect("WHITESPACE_RUN regex"));

// =============================================================================
// Markdown Output
// =============================================================================

/// Placeholder left in the DOM for a pre-rendered block; group 1 is the slot index.
pub static SLOT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CXSLOT(\d+)XC").expect("SLOT_TOKEN regex"));

/// Three or more newlines, squeezed to one blank line.
pub static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").expect("EXCESS_NEWLINES regex"));

// =============================================================================
// Inline Styles
// =============================================================================

/// Zero length with an optional unit, e.g. `0`, `0px`, `0.0rem`, `0%`.
pub static ZERO_LENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?0*\.?0+(px|em|rem|%|vh|vw|pt|ch|ex|vmin|vmax)?$").expect("ZERO_LENGTH regex")
});

// =============================================================================
// Filenames
// =============================================================================

/// Characters that are unsafe in filenames on at least one common filesystem.
pub static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\:*?"<>|]"#).expect("UNSAFE_FILENAME_CHARS regex"));
