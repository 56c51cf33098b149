// ABOUTME: HTML fetcher for clip enrichment: one bounded GET per URL, no retries.
// ABOUTME: Enforces the scheme whitelist, private-network guard, 2xx status and body size cap.

use std::collections::HashMap;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use url::Url;

use crate::error::ClipError;

mod decode;
pub(crate) mod guard;

use decode::decode_body;

/// Largest body a fetch will accept, 10 MiB.
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

const OP: &str = "Fetch";

#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Sent with every request; keys are header names.
    pub headers: HashMap<String, String>,
    pub allow_private_networks: bool,
    /// Upper bound for the whole fetch, DNS resolution included.
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            headers: HashMap::new(),
            allow_private_networks: false,
            timeout: Duration::from_secs(10),
        }
    }
}

/// A page that answered with a 2xx status.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    /// The URL that was requested.
    pub url: String,
    /// URL after redirects; relative page resources resolve against this.
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// The body as text, decoded with the declared or detected charset.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

fn failed(url: &str, why: impl std::fmt::Display) -> ClipError {
    ClipError::fetch(url, OP, Some(anyhow::anyhow!("{why}")))
}

fn too_large(url: &str, size: usize) -> ClipError {
    failed(url, format!("body of {size} bytes exceeds {MAX_CONTENT_LENGTH}"))
}

/// Fetch the page at `url`.
///
/// Issues a single GET. Only 2xx responses succeed; every other outcome is a
/// `Fetch`, `Timeout`, `Ssrf` or `InvalidUrl` error. The whole operation is
/// bounded by `opts.timeout`, and dropping the future aborts the request.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    opts: &FetchOptions,
) -> Result<FetchResult, ClipError> {
    tokio::time::timeout(opts.timeout, get(client, url, opts))
        .await
        .unwrap_or_else(|_| {
            Err(ClipError::timeout(
                url,
                OP,
                Some(anyhow::anyhow!("no response within {:?}", opts.timeout)),
            ))
        })
}

async fn get(
    client: &reqwest::Client,
    url: &str,
    opts: &FetchOptions,
) -> Result<FetchResult, ClipError> {
    let target = Url::parse(url)
        .map_err(|e| ClipError::invalid_url(url, OP, Some(anyhow::Error::new(e))))?;
    if !matches!(target.scheme(), "http" | "https") {
        return Err(ClipError::invalid_url(
            url,
            OP,
            Some(anyhow::anyhow!("unsupported scheme {:?}", target.scheme())),
        ));
    }

    let guarded = !opts.allow_private_networks;
    if guarded {
        guard::check_host(&target, url, "private IP addresses are not allowed").await?;
    }

    let request = opts
        .headers
        .iter()
        .fold(client.get(target), |req, (name, value)| req.header(name, value));

    let mut response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            ClipError::timeout(url, OP, Some(anyhow::Error::new(e)))
        } else {
            failed(url, format!("request failed: {e}"))
        }
    })?;

    if guarded {
        guard::check_host(
            response.url(),
            url,
            "redirect to private IP address is not allowed",
        )
        .await?;
    }

    let status = response.status();
    if !status.is_success() {
        return Err(failed(url, format!("HTTP status {}", status.as_u16())));
    }
    if let Some(declared) = response.content_length() {
        let declared = usize::try_from(declared).unwrap_or(usize::MAX);
        if declared > MAX_CONTENT_LENGTH {
            return Err(too_large(url, declared));
        }
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_ascii_lowercase);

    // chunked bodies have no Content-Length; the cap applies while reading
    let mut body = BytesMut::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| failed(url, format!("failed to read body: {e}")))?
    {
        let size = body.len() + chunk.len();
        if size > MAX_CONTENT_LENGTH {
            return Err(too_large(url, size));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(FetchResult {
        status: status.as_u16(),
        url: url.to_string(),
        final_url,
        content_type,
        body: body.freeze(),
    })
}
