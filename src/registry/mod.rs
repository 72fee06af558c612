//! Strategy registry.
//!
//! One validated [`StrategyEntry`] per supported platform. The process-wide
//! instance is built lazily from the embedded `config/strategies.json`, is
//! immutable once built, and can be dropped with [`Registry::reset`] so tests
//! start from a clean slate.

mod schema;
mod types;
mod validate;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

pub use schema::RawDocument;
pub use types::{ContentLocator, MessageLocator, RoleStrategy, StrategyEntry, TitleLocator};
pub use validate::{validate, Finding, Report, DEFAULT_HYBRID_MARKER};

use crate::error::{Error, Result};
use crate::platform::Platform;

/// Strategy document compiled into the binary.
pub const EMBEDDED_STRATEGIES: &str = include_str!("../../config/strategies.json");

static GLOBAL: RwLock<Option<Arc<Registry>>> = RwLock::new(None);

/// Validated, immutable table of extraction strategies.
#[derive(Debug, Clone)]
pub struct Registry {
    version: Option<String>,
    last_updated: Option<String>,
    entries: HashMap<Platform, StrategyEntry>,
}

impl Registry {
    /// Build a registry from a strategy document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document does not parse or any
    /// platform fails validation. The message lists every violation.
    pub fn from_json(json: &str) -> Result<Registry> {
        let raw = RawDocument::parse(json)
            .map_err(|e| Error::Config(format!("strategy document is not valid JSON: {e}")))?;

        let report = validate(&raw);
        for warning in &report.warnings {
            tracing::debug!(platform = %warning.platform, "{}", warning.message);
        }
        if !report.is_valid() {
            let details = report
                .violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(Error::Config(details));
        }

        Ok(Registry {
            version: raw.version,
            last_updated: raw.last_updated,
            entries: report.entries,
        })
    }

    /// Build a fresh registry from the embedded strategy document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the embedded document is invalid.
    pub fn embedded() -> Result<Registry> {
        Registry::from_json(EMBEDDED_STRATEGIES)
    }

    /// The process-wide registry, built and validated on first use.
    ///
    /// A failed build is not cached, so every caller sees the same error
    /// until the document is fixed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the embedded document is invalid.
    pub fn global() -> Result<Arc<Registry>> {
        if let Some(registry) = GLOBAL.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            return Ok(Arc::clone(registry));
        }

        let mut slot = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(registry) = slot.as_ref() {
            return Ok(Arc::clone(registry));
        }
        let registry = Arc::new(Registry::embedded()?);
        *slot = Some(Arc::clone(&registry));
        Ok(registry)
    }

    /// Drop the process-wide registry; the next [`Registry::global`] rebuilds it.
    pub fn reset() {
        *GLOBAL.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Entry for a platform key such as `"claude"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPlatform`] for keys with no entry.
    pub fn get(&self, key: &str) -> Result<&StrategyEntry> {
        Platform::from_key(key)
            .and_then(|platform| self.entries.get(&platform))
            .ok_or_else(|| Error::UnknownPlatform(key.to_string()))
    }

    /// Entry for a platform.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPlatform`] if the platform has no entry.
    pub fn entry(&self, platform: Platform) -> Result<&StrategyEntry> {
        self.entries
            .get(&platform)
            .ok_or_else(|| Error::UnknownPlatform(platform.key().to_string()))
    }

    /// Platform whose hostname fragment occurs in `hostname` (case-insensitive).
    #[must_use]
    pub fn detect(&self, hostname: &str) -> Option<Platform> {
        let hostname = hostname.to_ascii_lowercase();
        Platform::ALL.into_iter().find(|platform| {
            self.entries
                .get(platform)
                .is_some_and(|entry| hostname.contains(&entry.hostname))
        })
    }

    /// Platform serving the page at `url`, matched on the URL's host only.
    ///
    /// Unparseable URLs and URLs without a host match nothing.
    #[must_use]
    pub fn detect_url(&self, url: &str) -> Option<Platform> {
        let parsed = url::Url::parse(url).ok()?;
        self.detect(parsed.host_str()?)
    }

    /// Entries in registry order.
    pub fn entries(&self) -> impl Iterator<Item = &StrategyEntry> {
        Platform::ALL.into_iter().filter_map(|p| self.entries.get(&p))
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }
}
