// ABOUTME: Content classifier assigning link/image/note card types from a URL.
// ABOUTME: Looks only at the lowercase path extension; never fails.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Path suffixes that mark a URL as pointing straight at an image.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".bmp", ".ico",
];

/// Kind of captured item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    #[default]
    Link,
    Image,
    Note,
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CardType::Link => "link",
            CardType::Image => "image",
            CardType::Note => "note",
        };
        write!(f, "{}", s)
    }
}

/// Classify a card by its URL.
///
/// No URL (or a blank one) is a note. A URL whose path ends in a known image
/// extension is an image. Everything else, malformed URLs included, is a link.
pub fn classify(url: Option<&str>) -> CardType {
    let Some(raw) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        return CardType::Note;
    };

    match Url::parse(raw) {
        Ok(parsed) => {
            let path = parsed.path().to_lowercase();
            if IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
                CardType::Image
            } else {
                CardType::Link
            }
        }
        Err(_) => CardType::Link,
    }
}
