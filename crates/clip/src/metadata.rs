// ABOUTME: Metadata extractor that reads title/description/image/favicon from page HTML.
// ABOUTME: Walks Open Graph, Twitter Card and generic tags in priority order; never fails.

//! Head-tag metadata extraction.
//!
//! Only `<title>`, `<meta>` and `<link>` elements are consulted. Each field has
//! its own fallback chain; the first non-empty (after trimming) value wins.
//!
//! | field       | chain                                                                      |
//! |-------------|----------------------------------------------------------------------------|
//! | title       | `<title>`, `og:title`, `twitter:title`                                     |
//! | description | `og:description`, `twitter:description`, `description`                     |
//! | image       | `og:image`, `twitter:image` (resolved against the page URL)                |
//! | favicon     | first `icon`, `shortcut icon` or `apple-touch-icon` link, else the service |
//! | domain      | derived from the page URL                                                  |

use scraper::{Html, Selector};

use crate::payload::ScrapedData;
use crate::urls::{default_favicon, extract_domain, non_empty, resolve_url};

/// Icon link selectors, in priority order.
const ICON_SELECTORS: &[&str] = &[
    "link[rel='icon']",
    "link[rel='shortcut icon']",
    "link[rel='apple-touch-icon']",
];

/// Returns the trimmed `attr` of the first element matching `selector`, if non-empty.
fn first_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    let elem = document.select(&sel).next()?;
    let value = elem.value().attr(attr)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Meta content by `property` attribute.
fn meta_property(document: &Html, property: &str) -> Option<String> {
    first_attr(document, &format!("meta[property='{}']", property), "content")
}

/// Meta content by `name` attribute.
fn meta_name(document: &Html, name: &str) -> Option<String> {
    first_attr(document, &format!("meta[name='{}']", name), "content")
}

/// Twitter Card tags are published with either `name` or `property`; `name` is the documented form.
fn meta_twitter(document: &Html, key: &str) -> Option<String> {
    meta_name(document, key).or_else(|| meta_property(document, key))
}

fn title_text(document: &Html) -> Option<String> {
    let sel = Selector::parse("title").ok()?;
    let text = document.select(&sel).next()?.text().collect::<String>();
    non_empty(Some(&text))
}

/// Icon link resolved against `base_url`.
///
/// The first link found in selector order decides; an empty `href` on it means no icon.
fn favicon_link(document: &Html, base_url: &str) -> Option<String> {
    let link = ICON_SELECTORS.iter().find_map(|selector| {
        let sel = Selector::parse(selector).ok()?;
        document.select(&sel).next()
    })?;
    let href = link.value().attr("href")?.trim();
    (!href.is_empty()).then(|| resolve_url(base_url, href))
}

/// Extract page metadata from `html` fetched from `base_url`.
///
/// Total over any input: malformed markup only means fewer fields. `favicon` and
/// `domain` are always filled, the favicon falling back to the lookup service.
pub fn extract_metadata(html: &str, base_url: &str) -> ScrapedData {
    let document = Html::parse_document(html);
    let domain = extract_domain(base_url);

    let title = title_text(&document)
        .or_else(|| meta_property(&document, "og:title"))
        .or_else(|| meta_twitter(&document, "twitter:title"));

    let description = meta_property(&document, "og:description")
        .or_else(|| meta_twitter(&document, "twitter:description"))
        .or_else(|| meta_name(&document, "description"));

    let image = meta_property(&document, "og:image")
        .or_else(|| meta_twitter(&document, "twitter:image"))
        .map(|raw| resolve_url(base_url, &raw));

    let favicon = favicon_link(&document, base_url).unwrap_or_else(|| default_favicon(&domain));

    ScrapedData {
        title,
        description,
        image,
        favicon: Some(favicon),
        domain: Some(domain),
    }
}
