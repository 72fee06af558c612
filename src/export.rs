//! The export pipeline and the response handed back to the caller.

use chrono::Utc;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::extractor;
use crate::options::ExportOptions;
use crate::page::Page;
use crate::record::RecordBuilder;
use crate::registry::Registry;
use crate::result::{Export, ExportMetadata};

/// Export the conversation on `page` using the process-wide registry.
///
/// # Errors
///
/// See [`export_with_registry`]; additionally returns [`Error::Config`] if the
/// embedded strategy document is invalid.
pub fn export_conversation(page: &dyn Page, options: &ExportOptions) -> Result<Export> {
    let registry = Registry::global()?;
    export_with_registry(page, &registry, options)
}

/// Export the conversation on `page` using an explicit registry.
///
/// Steps, in order: detect the platform from the page URL, refuse while a
/// response is generating, reveal hidden content, locate and parse every
/// turn, then read the title and artifact and build the records. Nothing on
/// the page is actuated before the generation check passes.
///
/// # Errors
///
/// - [`Error::UnsupportedPlatform`] if the URL matches no entry
/// - [`Error::GenerationInProgress`] while a response is streaming
/// - [`Error::EmptyConversation`] if no turns are found and
///   [`ExportOptions::reject_empty`] is set
/// - [`Error::RoleResolution`] for the first turn whose author is undecidable
pub fn export_with_registry(
    page: &dyn Page,
    registry: &Registry,
    options: &ExportOptions,
) -> Result<Export> {
    let url = page.url();
    let platform = registry
        .detect_url(url)
        .ok_or_else(|| Error::UnsupportedPlatform(url.to_string()))?;

    let unit = extractor::for_entry(registry.entry(platform)?.clone());
    tracing::debug!(platform = platform.key(), url, "starting export");

    if unit.is_generating(page.document()) {
        return Err(Error::GenerationInProgress {
            platform: platform.display_name().to_string(),
        });
    }

    unit.prepare(page, options);

    let doc = page.document();
    let nodes = unit.locate_boundaries(doc);
    if nodes.is_empty() && options.reject_empty {
        return Err(Error::EmptyConversation {
            platform: platform.display_name().to_string(),
        });
    }

    let messages = nodes
        .iter()
        .map(|node| unit.parse_node(node))
        .collect::<Result<Vec<_>>>()?;

    let artifact = if options.include_artifact {
        unit.artifact(doc)
    } else {
        None
    };

    let now = Utc::now();
    let metadata = ExportMetadata {
        platform,
        url: url.to_string(),
        exported_at: now,
        title: unit.title(doc),
    };
    let jsonl = RecordBuilder::new(options.convert, now).build(&messages, &metadata, artifact.as_ref())?;

    tracing::debug!(
        platform = platform.key(),
        messages = messages.len(),
        artifact = artifact.is_some(),
        "export complete"
    );

    Ok(Export {
        metadata,
        message_count: messages.len(),
        has_artifact: artifact.is_some(),
        jsonl,
    })
}

/// Reply to an export request: the records on success, the error message
/// verbatim on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<Export>> for ExportResponse {
    fn from(result: Result<Export>) -> Self {
        match result {
            Ok(export) => Self {
                success: true,
                data: Some(export.jsonl),
                error: None,
            },
            Err(err) => Self {
                success: false,
                data: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Run an export and package the outcome for the requesting side.
#[must_use]
pub fn handle_export_request(page: &dyn Page, options: &ExportOptions) -> ExportResponse {
    let result = export_conversation(page, options);
    if let Err(err) = &result {
        tracing::warn!(error = %err, "export failed");
    }
    ExportResponse::from(result)
}
