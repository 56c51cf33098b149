// ABOUTME: Clip request/payload models and the validation step that turns raw input into a ClipPayload.
// ABOUTME: ScrapedData holds what one fetch found; it is merged into payloads, never returned on its own.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ClipError;
use crate::urls::{non_empty, parse_absolute};

/// Raw clip input as it arrives from a client, e.g. the JSON body
/// `{ url, title?, description?, image?, favicon?, tags? }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub favicon: Option<String>,
    /// Non-string entries in the incoming array are dropped.
    #[serde(default, deserialize_with = "string_entries")]
    pub tags: Vec<String>,
}

impl ClipRequest {
    /// Convenience constructor for a request carrying only a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }
}

fn string_entries<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| match v {
            serde_json::Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

/// The pipeline's working unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipPayload {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub favicon: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Derived from the URL during enrichment; any incoming value is replaced.
    pub domain: Option<String>,
}

impl ClipPayload {
    /// Returns true when every scrapable field is already filled in, so a fetch would add nothing.
    pub fn is_complete(&self) -> bool {
        is_filled(&self.title)
            && is_filled(&self.description)
            && is_filled(&self.image)
            && is_filled(&self.favicon)
    }
}

fn is_filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Metadata found on a fetched page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub favicon: Option<String>,
    pub domain: Option<String>,
}

/// Validates a raw request and normalizes it into a [`ClipPayload`].
///
/// Fails with an `InvalidUrl` error when the URL is absent or not an absolute URL
/// with a scheme and host. Optional strings are trimmed and blanks dropped; tags
/// are trimmed and empty entries removed, order preserved.
pub fn validate(request: &ClipRequest) -> Result<ClipPayload, ClipError> {
    let raw_url = request.url.as_deref().unwrap_or_default();
    parse_absolute(raw_url)?;

    Ok(ClipPayload {
        url: raw_url.trim().to_string(),
        title: non_empty(request.title.as_deref()),
        description: non_empty(request.description.as_deref()),
        image: non_empty(request.image.as_deref()),
        favicon: non_empty(request.favicon.as_deref()),
        tags: normalize_tags(&request.tags),
        domain: None,
    })
}

/// Trims each tag and drops the empty ones. Duplicates are kept.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    tags.iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
