// ABOUTME: Card models: the persisted Card, the CardDraft used to create one, and partial CardUpdate edits.
// ABOUTME: Drafts are normalized here so every store backend creates cards the same way.

use beekeeper_clip::{
    classify, extract_domain, non_empty, normalize_tags, parse_absolute, CardType, ClipPayload,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Title used when neither the user nor the page supplied one.
pub const UNTITLED: &str = "Untitled";

/// A persisted card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub card_type: CardType,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub favicon: Option<String>,
    pub domain: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Builds a new card owned by `user_id`, assigning id, creation time and type.
    pub fn from_draft(user_id: &str, draft: CardDraft) -> Result<Self, StoreError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(StoreError::invalid("user id is required"));
        }
        let draft = draft.normalized()?;

        Ok(Card {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            card_type: classify(draft.url.as_deref()),
            title: draft.title.unwrap_or_else(|| UNTITLED.to_string()),
            description: draft.description,
            url: draft.url,
            image: draft.image,
            favicon: draft.favicon,
            domain: draft.domain,
            tags: draft.tags,
            pinned: false,
            created_at: Utc::now(),
        })
    }
}

/// Input for creating a card, either from an enriched clip or typed in by hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardDraft {
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
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CardDraft {
    /// A draft with only a title, i.e. a note.
    pub fn note(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Trims fields and checks the draft can become a card.
    ///
    /// Needs a URL or a title. A URL, when given, must be absolute; its domain
    /// is derived when the draft carries none.
    pub fn normalized(self) -> Result<Self, StoreError> {
        let url = non_empty(self.url.as_deref());
        let title = non_empty(self.title.as_deref());

        if url.is_none() && title.is_none() {
            return Err(StoreError::invalid("URL or title is required"));
        }
        if let Some(ref raw) = url {
            parse_absolute(raw).map_err(StoreError::invalid)?;
        }

        let domain = non_empty(self.domain.as_deref())
            .or_else(|| url.as_deref().map(extract_domain));

        Ok(Self {
            url,
            title,
            description: non_empty(self.description.as_deref()),
            image: non_empty(self.image.as_deref()),
            favicon: non_empty(self.favicon.as_deref()),
            domain,
            tags: normalize_tags(&self.tags),
        })
    }
}

impl From<ClipPayload> for CardDraft {
    fn from(payload: ClipPayload) -> Self {
        Self {
            url: Some(payload.url),
            title: payload.title,
            description: payload.description,
            image: payload.image,
            favicon: payload.favicon,
            domain: payload.domain,
            tags: payload.tags,
        }
    }
}

/// Partial edit of the mutable card fields. Everything else about a card is fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardUpdate {
    /// Blank titles are ignored.
    #[serde(default)]
    pub title: Option<String>,
    /// A blank description clears it.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub pinned: Option<bool>,
}

impl CardUpdate {
    /// An update that only changes `pinned`.
    pub fn pinned(pinned: bool) -> Self {
        Self {
            pinned: Some(pinned),
            ..Default::default()
        }
    }

    /// Returns true when applying this update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.tags.is_none() && self.pinned.is_none()
    }

    /// Applies the update in place.
    pub fn apply_to(&self, card: &mut Card) {
        if let Some(title) = non_empty(self.title.as_deref()) {
            card.title = title;
        }
        if let Some(ref description) = self.description {
            card.description = non_empty(Some(description.as_str()));
        }
        if let Some(ref tags) = self.tags {
            card.tags = normalize_tags(tags);
        }
        if let Some(pinned) = self.pinned {
            card.pinned = pinned;
        }
    }
}
