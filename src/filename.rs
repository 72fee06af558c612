//! Download filenames for exported transcripts.

use chrono::{DateTime, Utc};

use crate::patterns::UNSAFE_FILENAME_CHARS;

/// Replace `/ \ : * ? " < > |` with `_`.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    UNSAFE_FILENAME_CHARS.replace_all(name, "_").into_owned()
}

/// `<platform>_<title>.jsonl`, or `<platform>_<YYYYMMDDTHHMMSS>.jsonl` when
/// there is no title.
#[must_use]
pub fn export_filename(platform_key: &str, title: Option<&str>, now: DateTime<Utc>) -> String {
    match title.filter(|t| !t.is_empty()) {
        Some(title) => format!("{platform_key}_{}.jsonl", sanitize_filename(title)),
        None => format!("{platform_key}_{}.jsonl", now.format("%Y%m%dT%H%M%S")),
    }
}
