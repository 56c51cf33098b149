// ABOUTME: Merge and fallback rules that turn a validated payload plus scraped data into a complete payload.
// ABOUTME: User-supplied values always win; title, favicon and domain always end up non-empty.

use crate::payload::{ClipPayload, ScrapedData};
use crate::urls::{default_favicon, extract_domain, hostname, non_empty, UNKNOWN_DOMAIN};

fn fill(slot: &mut Option<String>, scraped: Option<&String>) {
    *slot = non_empty(slot.as_deref()).or_else(|| non_empty(scraped.map(String::as_str)));
}

/// Applies scraped metadata to a payload.
///
/// - Each of title/description/image/favicon keeps the user's non-empty value,
///   otherwise takes the scraped one.
/// - `domain` is replaced by the scraped domain whenever one was found.
pub fn merge_scraped(payload: &mut ClipPayload, scraped: &ScrapedData) {
    fill(&mut payload.title, scraped.title.as_ref());
    fill(&mut payload.description, scraped.description.as_ref());
    fill(&mut payload.image, scraped.image.as_ref());
    fill(&mut payload.favicon, scraped.favicon.as_ref());

    if let Some(domain) = non_empty(scraped.domain.as_deref()) {
        payload.domain = Some(domain);
    }
}

/// Final pass guaranteeing `title`, `favicon` and `domain`.
///
/// - domain: derived from `url` when missing.
/// - title: domain, else the URL's hostname, else the URL itself.
/// - favicon: the favicon-service URL for the domain.
pub fn apply_fallbacks(payload: &mut ClipPayload) {
    let domain = non_empty(payload.domain.as_deref()).unwrap_or_else(|| extract_domain(&payload.url));
    payload.domain = Some(domain.clone());

    if non_empty(payload.title.as_deref()).is_none() {
        let title = Some(domain.clone())
            .filter(|d| d != UNKNOWN_DOMAIN)
            .or_else(|| hostname(&payload.url))
            .or_else(|| non_empty(Some(payload.url.as_str())))
            .unwrap_or_else(|| domain.clone());
        payload.title = Some(title);
    }

    if non_empty(payload.favicon.as_deref()).is_none() {
        payload.favicon = Some(default_favicon(&domain));
    }
}
