// ABOUTME: ClipService chains the clip pipeline into a card store.
// ABOUTME: clip = validate, enrich, create; manual cards and card edits pass straight to the store.

use std::sync::Arc;

use beekeeper_clip::{validate, CancellationToken, ClipPayload, ClipRequest, Clipper};
use tracing::{debug, info};

use crate::error::ServiceError;
use crate::models::{Card, CardDraft, CardUpdate};
use crate::store::CardStore;

/// Front door for card operations. Cheap to clone; clones share the HTTP client and store.
#[derive(Clone)]
pub struct ClipService {
    clipper: Clipper,
    store: Arc<dyn CardStore>,
}

impl std::fmt::Debug for ClipService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipService")
            .field("clipper", &self.clipper)
            .finish_non_exhaustive()
    }
}

impl ClipService {
    pub fn new(clipper: Clipper, store: Arc<dyn CardStore>) -> Self {
        Self { clipper, store }
    }

    pub fn clipper(&self) -> &Clipper {
        &self.clipper
    }

    pub fn store(&self) -> &Arc<dyn CardStore> {
        &self.store
    }

    /// Enriches a request without storing anything.
    pub async fn preview(&self, request: &ClipRequest) -> Result<ClipPayload, ServiceError> {
        Ok(self.clipper.clip(request).await?)
    }

    /// Clips a URL into a new card for `user_id`.
    ///
    /// Fails only on validation or storage; an unreachable page still yields a card.
    pub async fn clip(&self, user_id: &str, request: &ClipRequest) -> Result<Card, ServiceError> {
        let payload = self.clipper.clip(request).await?;
        self.store_payload(user_id, payload).await
    }

    /// Like [`ClipService::clip`], but abandons the fetch when `token` fires.
    ///
    /// A cancelled clip stores nothing.
    pub async fn clip_until_cancelled(
        &self,
        user_id: &str,
        request: &ClipRequest,
        token: &CancellationToken,
    ) -> Result<Card, ServiceError> {
        let payload = validate(request)?;
        let payload = self.clipper.enrich_until_cancelled(payload, token).await?;
        self.store_payload(user_id, payload).await
    }

    async fn store_payload(&self, user_id: &str, payload: ClipPayload) -> Result<Card, ServiceError> {
        let url = payload.url.clone();
        let card = self.store.create(user_id, payload.into()).await?;
        info!(url = %url, card_id = %card.id, "clipped");
        Ok(card)
    }

    /// Creates a card from user-entered fields, without fetching anything.
    pub async fn add_manual(&self, user_id: &str, draft: CardDraft) -> Result<Card, ServiceError> {
        debug!(user_id = %user_id, "adding manual card");
        Ok(self.store.create(user_id, draft).await?)
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Card>, ServiceError> {
        Ok(self.store.list(user_id).await?)
    }

    pub async fn get(&self, user_id: &str, card_id: &str) -> Result<Option<Card>, ServiceError> {
        Ok(self.store.get(user_id, card_id).await?)
    }

    pub async fn update(
        &self,
        user_id: &str,
        card_id: &str,
        update: CardUpdate,
    ) -> Result<Card, ServiceError> {
        Ok(self.store.update(user_id, card_id, update).await?)
    }

    /// Sets or clears the pinned flag.
    pub async fn pin(&self, user_id: &str, card_id: &str, pinned: bool) -> Result<Card, ServiceError> {
        self.update(user_id, card_id, CardUpdate::pinned(pinned)).await
    }

    pub async fn delete(&self, user_id: &str, card_id: &str) -> Result<bool, ServiceError> {
        Ok(self.store.delete(user_id, card_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use beekeeper_clip::CardType;

    fn offline_service() -> ClipService {
        ClipService::new(
            Clipper::builder().build().unwrap(),
            Arc::new(MemoryStore::new()),
        )
    }

    #[tokio::test]
    async fn invalid_clip_stores_nothing() {
        let service = offline_service();
        let err = service
            .clip("u", &ClipRequest::new("not a url"))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
        assert!(service.list("u").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancelled_clip_stores_nothing() {
        let service = offline_service();
        let token = CancellationToken::new();
        token.cancel();

        let err = service
            .clip_until_cancelled("u", &ClipRequest::new("https://example.com"), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Clip(ref e) if e.is_cancelled()));
        assert!(service.list("u").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn manual_note_and_pin() {
        let service = offline_service();
        let note = service.add_manual("u", CardDraft::note("Buy honey")).await.unwrap();
        assert_eq!(note.card_type, CardType::Note);

        let pinned = service.pin("u", &note.id, true).await.unwrap();
        assert!(pinned.pinned);
        let unpinned = service.pin("u", &note.id, false).await.unwrap();
        assert!(!unpinned.pinned);

        assert!(service.delete("u", &note.id).await.unwrap());
        assert_eq!(service.get("u", &note.id).await.unwrap(), None);
    }
}
