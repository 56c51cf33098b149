// ABOUTME: URL validation and normalization helpers for clip payloads.
// ABOUTME: Provides absolute-URL checks, domain extraction, relative resolution, and the default favicon URL.

use url::Url;

use crate::error::ClipError;

/// Favicon lookup service used when a page declares no icon of its own.
pub const DEFAULT_FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";

/// Icon size requested from the favicon service.
pub const DEFAULT_FAVICON_SIZE: u32 = 128;

/// Domain reported when a URL cannot be parsed.
pub const UNKNOWN_DOMAIN: &str = "unknown";

/// Parses `raw` as an absolute URL that carries both a scheme and a host.
pub fn parse_absolute(raw: &str) -> Result<Url, ClipError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClipError::invalid_url(
            raw,
            "Validate",
            Some(anyhow::anyhow!("URL is required")),
        ));
    }

    let parsed = Url::parse(trimmed).map_err(|e| {
        ClipError::invalid_url(
            raw,
            "Validate",
            Some(anyhow::anyhow!("invalid URL format: {}", e)),
        )
    })?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(ClipError::invalid_url(
            raw,
            "Validate",
            Some(anyhow::anyhow!("URL has no host")),
        )),
    }
}

/// Returns the lowercase hostname of `url` without a leading `www.`.
///
/// Never fails: anything without a usable host yields `"unknown"`.
pub fn extract_domain(url: &str) -> String {
    Url::parse(url.trim())
        .ok()
        .and_then(|u| u.host_str().map(domain_of_host))
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| UNKNOWN_DOMAIN.to_string())
}

/// Returns the raw lowercase hostname of `url`, keeping any `www.` prefix.
pub fn hostname(url: &str) -> Option<String> {
    Url::parse(url.trim())
        .ok()?
        .host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}

fn domain_of_host(host: &str) -> String {
    let lower = host.to_lowercase();
    match lower.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}

/// Resolves `relative` against `base`, returning `relative` unchanged when that is impossible.
pub fn resolve_url(base: &str, relative: &str) -> String {
    if let Ok(absolute) = Url::parse(relative) {
        return absolute.to_string();
    }
    Url::parse(base)
        .and_then(|b| b.join(relative))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| relative.to_string())
}

/// Builds the favicon-service URL for `domain`.
pub fn default_favicon(domain: &str) -> String {
    format!(
        "{}?domain={}&sz={}",
        DEFAULT_FAVICON_SERVICE, domain, DEFAULT_FAVICON_SIZE
    )
}

/// Trims `value`, mapping empty results to `None`.
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
