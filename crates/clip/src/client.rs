// ABOUTME: The Clipper client that runs the clip ingestion pipeline end to end.
// ABOUTME: Validates input, fetches and extracts page metadata, and merges it with user fields.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::enrich::{apply_fallbacks, merge_scraped};
use crate::error::ClipError;
use crate::metadata::extract_metadata;
use crate::options::{ClipperBuilder, Options};
use crate::payload::{validate, ClipPayload, ClipRequest, ScrapedData};
use crate::resource::guard::{redirect_refusal, PublicResolver};
use crate::resource::{fetch, FetchOptions};
use crate::urls::extract_domain;

/// The clip pipeline client.
///
/// Holds no per-request state; one instance can serve any number of concurrent clips.
#[derive(Debug, Clone)]
pub struct Clipper {
    opts: Options,
    http_client: reqwest::Client,
}

fn redirect_policy(max_redirects: usize, allow_private: bool) -> reqwest::redirect::Policy {
    reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() > max_redirects {
            return attempt.error("too many redirects");
        }
        if allow_private {
            return attempt.follow();
        }
        match redirect_refusal(attempt.url()) {
            Some(reason) => attempt.error(reason),
            None => attempt.follow(),
        }
    })
}

impl Clipper {
    /// Create a new ClipperBuilder for configuring the client.
    pub fn builder() -> ClipperBuilder {
        ClipperBuilder::new()
    }

    /// Create a new Clipper with the given options.
    pub fn new(opts: Options) -> Result<Self, ClipError> {
        let http_client = match opts.http_client.clone() {
            Some(client) => client,
            None => {
                let builder = reqwest::Client::builder()
                    .redirect(redirect_policy(
                        opts.max_redirects,
                        opts.allow_private_networks,
                    ))
                    .user_agent(&opts.user_agent)
                    .timeout(opts.timeout)
                    .cookie_store(true)
                    .gzip(true)
                    .brotli(true)
                    .deflate(true);
                let builder = if opts.allow_private_networks {
                    builder
                } else {
                    builder.dns_resolver(Arc::new(PublicResolver))
                };
                builder
                    .build()
                    .map_err(|e| ClipError::fetch("", "Build", Some(anyhow::Error::new(e))))?
            }
        };

        Ok(Self { opts, http_client })
    }

    /// The options this clipper was built with.
    pub fn options(&self) -> &Options {
        &self.opts
    }

    fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            headers: self.opts.request_headers(),
            allow_private_networks: self.opts.allow_private_networks,
            timeout: self.opts.timeout,
        }
    }

    /// Fetch `url` and extract its metadata.
    ///
    /// Relative resources resolve against the URL reached after redirects.
    pub async fn scrape(&self, url: &str) -> Result<ScrapedData, ClipError> {
        let fetched = fetch(&self.http_client, url, &self.fetch_options()).await?;
        debug!(
            url = %url,
            final_url = %fetched.final_url,
            status = fetched.status,
            bytes = fetched.body.len(),
            "fetched page"
        );
        let html = fetched.text();
        Ok(extract_metadata(&html, &fetched.final_url))
    }

    /// Extract metadata from HTML already in hand, as if it had been fetched from `url`.
    pub fn extract(&self, html: &str, url: &str) -> ScrapedData {
        extract_metadata(html, url)
    }

    /// Enrich a validated payload.
    ///
    /// Fetches the page only when some scrapable field is missing. Fetch failures
    /// are logged and absorbed; the result always has `title`, `favicon` and
    /// `domain` set. `domain` is recomputed from the URL even when no fetch runs.
    pub async fn enrich(&self, payload: ClipPayload) -> ClipPayload {
        let mut enriched = payload;
        enriched.domain = Some(extract_domain(&enriched.url));

        if enriched.is_complete() {
            debug!(url = %enriched.url, "payload complete, skipping fetch");
        } else {
            match self.scrape(&enriched.url).await {
                Ok(scraped) => merge_scraped(&mut enriched, &scraped),
                Err(err) => {
                    warn!(url = %enriched.url, error = %err, "scrape failed, using fallbacks");
                }
            }
        }

        apply_fallbacks(&mut enriched);
        enriched
    }

    /// Like [`Clipper::enrich`], but gives up as soon as `token` is cancelled.
    ///
    /// Cancellation drops the in-flight fetch and returns a `Cancelled` error.
    pub async fn enrich_until_cancelled(
        &self,
        payload: ClipPayload,
        token: &CancellationToken,
    ) -> Result<ClipPayload, ClipError> {
        let url = payload.url.clone();
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!(url = %url, "enrichment cancelled");
                Err(ClipError::cancelled(url, "Enrich"))
            }
            enriched = self.enrich(payload) => Ok(enriched),
        }
    }

    /// Validate a raw request and enrich it.
    ///
    /// The only error is the validation failure; fetch problems degrade to fallbacks.
    pub async fn clip(&self, request: &ClipRequest) -> Result<ClipPayload, ClipError> {
        let payload = validate(request)?;
        Ok(self.enrich(payload).await)
    }
}
