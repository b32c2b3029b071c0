//! Extraction adapters. A [`ListingSource`] yields the raw records of one
//! dealer; the pipeline never looks past this trait.

use std::path::PathBuf;

use carinv_core::{Platform, RawFieldSet};
use serde_json::Value;

use crate::error::PipelineError;

pub trait ListingSource: Send + Sync {
    /// Label used in logs and as the completion task name.
    fn name(&self) -> &str;

    fn platform(&self) -> Platform;

    /// Reads every raw listing this source holds.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when the source as a whole cannot be read.
    /// Individual malformed listings are skipped, not reported.
    fn extract(&self) -> Result<Vec<RawFieldSet>, PipelineError>;
}

/// Offline adapter over a JSON dump: an array of raw listings, or an object
/// with the array under `"listings"`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    name: String,
    platform: Platform,
    path: PathBuf,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(name: impl Into<String>, platform: Platform, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            platform,
            path: path.into(),
        }
    }
}

impl ListingSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn platform(&self) -> Platform {
        self.platform
    }

    fn extract(&self) -> Result<Vec<RawFieldSet>, PipelineError> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| PipelineError::SourceIo {
                path: self.path.display().to_string(),
                source: e,
            })?;
        parse_listings(&content, &self.name)
    }
}

/// Parses a listing dump held in memory. `context` names the dump in errors
/// and logs.
///
/// # Errors
///
/// Returns [`PipelineError::Deserialize`] if the text is not JSON, or is JSON
/// of the wrong shape.
pub fn parse_listings(content: &str, context: &str) -> Result<Vec<RawFieldSet>, PipelineError> {
    let value: Value = serde_json::from_str(content).map_err(|e| PipelineError::Deserialize {
        context: context.to_string(),
        source: e,
    })?;

    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("listings") {
            Some(Value::Array(entries)) => entries,
            other => {
                return Err(shape_error(context, other.unwrap_or(Value::Null)));
            }
        },
        other => return Err(shape_error(context, other)),
    };

    let total = entries.len();
    let listings: Vec<RawFieldSet> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| match serde_json::from_value(entry) {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::warn!(
                    source = context,
                    index = idx,
                    error = %e,
                    "skipping malformed listing"
                );
                None
            }
        })
        .collect();

    tracing::debug!(source = context, total, parsed = listings.len(), "listing dump parsed");
    Ok(listings)
}

/// Deserializing the wrong shape as a sequence yields serde's own
/// "invalid type" message.
fn shape_error(context: &str, value: Value) -> PipelineError {
    let source = serde_json::from_value::<Vec<Value>>(value)
        .err()
        .unwrap_or_else(|| {
            <serde_json::Error as serde::de::Error>::custom("expected an array of listings")
        });
    PipelineError::Deserialize {
        context: context.to_string(),
        source,
    }
}
