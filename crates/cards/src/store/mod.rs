// ABOUTME: CardStore trait plus the in-memory backend and the card collection shared by all backends.
// ABOUTME: Stores own ownership checks and serialize writers so updates and deletes never interleave.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::StoreError;
use crate::models::{Card, CardDraft, CardUpdate};

pub mod file;

pub use file::FileStore;

/// Storage interface for cards. Backends are interchangeable and chosen at startup.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// All cards owned by `user_id`, newest first.
    async fn list(&self, user_id: &str) -> Result<Vec<Card>, StoreError>;

    /// One card, `None` if no card has this id.
    async fn get(&self, user_id: &str, card_id: &str) -> Result<Option<Card>, StoreError>;

    /// Creates a card from a draft, assigning id, creation time and type.
    async fn create(&self, user_id: &str, draft: CardDraft) -> Result<Card, StoreError>;

    /// Applies a partial update and returns the updated card.
    async fn update(
        &self,
        user_id: &str,
        card_id: &str,
        update: CardUpdate,
    ) -> Result<Card, StoreError>;

    /// Deletes a card permanently. Returns false if no card has this id.
    async fn delete(&self, user_id: &str, card_id: &str) -> Result<bool, StoreError>;
}

/// Every card in a store, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct CardSet {
    #[serde(default)]
    cards: Vec<Card>,
}

impl CardSet {
    fn position(&self, user_id: &str, card_id: &str) -> Result<Option<usize>, StoreError> {
        match self.cards.iter().position(|c| c.id == card_id) {
            Some(idx) if self.cards[idx].user_id != user_id => {
                Err(StoreError::Forbidden(card_id.to_string()))
            }
            found => Ok(found),
        }
    }

    pub(crate) fn list(&self, user_id: &str) -> Vec<Card> {
        let mut cards: Vec<Card> = self
            .cards
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        // stable: equal timestamps keep insertion order, which is already newest first
        cards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        cards
    }

    pub(crate) fn get(&self, user_id: &str, card_id: &str) -> Result<Option<Card>, StoreError> {
        Ok(self
            .position(user_id, card_id)?
            .map(|idx| self.cards[idx].clone()))
    }

    pub(crate) fn insert(&mut self, card: Card) {
        self.cards.insert(0, card);
    }

    pub(crate) fn update(
        &mut self,
        user_id: &str,
        card_id: &str,
        update: &CardUpdate,
    ) -> Result<Card, StoreError> {
        let idx = self
            .position(user_id, card_id)?
            .ok_or_else(|| StoreError::NotFound(card_id.to_string()))?;
        let card = &mut self.cards[idx];
        update.apply_to(card);
        Ok(card.clone())
    }

    pub(crate) fn remove(&mut self, user_id: &str, card_id: &str) -> Result<bool, StoreError> {
        match self.position(user_id, card_id)? {
            Some(idx) => {
                self.cards.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Process-local card store. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    cards: RwLock<CardSet>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn list(&self, user_id: &str) -> Result<Vec<Card>, StoreError> {
        Ok(self.cards.read().await.list(user_id))
    }

    async fn get(&self, user_id: &str, card_id: &str) -> Result<Option<Card>, StoreError> {
        self.cards.read().await.get(user_id, card_id)
    }

    async fn create(&self, user_id: &str, draft: CardDraft) -> Result<Card, StoreError> {
        let card = Card::from_draft(user_id, draft)?;
        self.cards.write().await.insert(card.clone());
        info!(card_id = %card.id, user_id = %card.user_id, card_type = %card.card_type, "card created");
        Ok(card)
    }

    async fn update(
        &self,
        user_id: &str,
        card_id: &str,
        update: CardUpdate,
    ) -> Result<Card, StoreError> {
        self.cards.write().await.update(user_id, card_id, &update)
    }

    async fn delete(&self, user_id: &str, card_id: &str) -> Result<bool, StoreError> {
        let removed = self.cards.write().await.remove(user_id, card_id)?;
        if removed {
            info!(card_id = %card_id, user_id = %user_id, "card deleted");
        }
        Ok(removed)
    }
}
