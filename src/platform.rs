//! Supported chat platforms and hostname detection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::registry::Registry;

/// A chat web application with an entry in the strategy registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    ChatGpt,
    Claude,
    Gemini,
    Grok,
    Perplexity,
}

impl Platform {
    /// Every supported platform, in registry order.
    pub const ALL: [Platform; 5] = [
        Platform::ChatGpt,
        Platform::Claude,
        Platform::Gemini,
        Platform::Grok,
        Platform::Perplexity,
    ];

    /// Registry key, also used in exported records and filenames.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Platform::ChatGpt => "chatgpt",
            Platform::Claude => "claude",
            Platform::Gemini => "gemini",
            Platform::Grok => "grok",
            Platform::Perplexity => "perplexity",
        }
    }

    /// Human-facing name used in error messages.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Platform::ChatGpt => "ChatGPT",
            Platform::Claude => "Claude",
            Platform::Gemini => "Gemini",
            Platform::Grok => "Grok",
            Platform::Perplexity => "Perplexity",
        }
    }

    /// Look a platform up by its registry key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Platform> {
        Platform::ALL.into_iter().find(|p| p.key() == key)
    }

    /// Detect the platform serving `hostname` through the process-wide
    /// registry.
    ///
    /// Matching is a case-insensitive substring test against each registry
    /// entry's hostname pattern, so `www.perplexity.ai` and `perplexity.ai`
    /// both resolve.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the registry cannot be built.
    pub fn from_hostname(hostname: &str) -> Result<Option<Platform>> {
        Ok(Registry::global()?.detect(hostname))
    }

    /// Detect the platform serving the page at `url`.
    ///
    /// Unparseable URLs and URLs without a host give `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the registry cannot be built.
    pub fn from_url(url: &str) -> Result<Option<Platform>> {
        Ok(Registry::global()?.detect_url(url))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Whether `url` points at one of the supported chat platforms.
///
/// # Errors
///
/// Returns [`crate::Error::Config`] if the registry cannot be built; a broken
/// strategy document is not the same as an unsupported page.
pub fn is_supported_url(url: &str) -> Result<bool> {
    Ok(Platform::from_url(url)?.is_some())
}
