//! Snapshot decoding.
//!
//! Saved chat pages are usually UTF-8, but pages saved by older browsers or
//! proxies sometimes carry a legacy charset. This module sniffs the byte-order
//! mark or the `<meta>` charset declaration and decodes to a UTF-8 `String`.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// How many leading bytes are inspected for a charset declaration.
const SNIFF_WINDOW: usize = 1024;

/// Match `<meta charset="...">` or the `charset=` part of a
/// `<meta http-equiv="Content-Type" content="...">` declaration.
#[allow(clippy::expect_used)]
static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([A-Za-z0-9_:.\-]+)"#).expect("valid regex")
});

/// Determine the encoding of a saved snapshot.
///
/// Order: byte-order mark, then the first `<meta>` charset declaration inside
/// the first kilobyte, then UTF-8.
#[must_use]
pub fn sniff_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_WINDOW)]);
    META_CHARSET_RE
        .captures(&head)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode snapshot bytes to UTF-8.
///
/// Invalid sequences become U+FFFD; decoding never fails.
#[must_use]
pub fn decode_snapshot(bytes: &[u8]) -> String {
    let encoding = sniff_encoding(bytes);
    let (decoded, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!(encoding = used.name(), "snapshot contained undecodable bytes");
    }
    decoded.into_owned()
}
