// ABOUTME: JSON-file card store that survives restarts.
// ABOUTME: Each write goes to a sibling temp file which is then renamed over the document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::{CardSet, CardStore};
use crate::error::StoreError;
use crate::models::{Card, CardDraft, CardUpdate};

/// Card store persisted as a single JSON document of the form `{ "cards": [...] }`.
///
/// The whole document is held in memory. A mutation is committed in memory only
/// after it has reached disk, so a failed write leaves the store unchanged.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    cards: Mutex<CardSet>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store; it is created on the first write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let cards = match fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => CardSet::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CardSet::default(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), "opened card file");
        Ok(Self {
            path,
            cards: Mutex::new(cards),
        })
    }

    /// Location of the JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, cards: &CardSet) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(cards)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let written = async {
            fs::write(&tmp, &json).await?;
            fs::rename(&tmp, &self.path).await
        }
        .await;

        if let Err(e) = written {
            error!(path = %self.path.display(), error = %e, "failed to write card file");
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Runs `mutate` on a copy of the cards and commits it once persisted.
    async fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut CardSet) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.cards.lock().await;
        let mut next = guard.clone();
        let out = mutate(&mut next)?;
        if next != *guard {
            self.persist(&next).await?;
            *guard = next;
        }
        Ok(out)
    }
}

#[async_trait]
impl CardStore for FileStore {
    async fn list(&self, user_id: &str) -> Result<Vec<Card>, StoreError> {
        Ok(self.cards.lock().await.list(user_id))
    }

    async fn get(&self, user_id: &str, card_id: &str) -> Result<Option<Card>, StoreError> {
        self.cards.lock().await.get(user_id, card_id)
    }

    async fn create(&self, user_id: &str, draft: CardDraft) -> Result<Card, StoreError> {
        let card = Card::from_draft(user_id, draft)?;
        self.commit(|cards| {
            cards.insert(card.clone());
            Ok(())
        })
        .await?;
        info!(card_id = %card.id, user_id = %card.user_id, card_type = %card.card_type, "card created");
        Ok(card)
    }

    async fn update(
        &self,
        user_id: &str,
        card_id: &str,
        update: CardUpdate,
    ) -> Result<Card, StoreError> {
        self.commit(|cards| cards.update(user_id, card_id, &update))
            .await
    }

    async fn delete(&self, user_id: &str, card_id: &str) -> Result<bool, StoreError> {
        let removed = self
            .commit(|cards| cards.remove(user_id, card_id))
            .await?;
        if removed {
            info!(card_id = %card_id, user_id = %user_id, "card deleted");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_file_is_empty_and_not_created_by_reads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cards.json");
        let store = FileStore::open(&path).await.unwrap();

        assert!(store.list("u").await.unwrap().is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn writes_document_with_cards_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("cards.json");
        let store = FileStore::open(&path).await.unwrap();
        let card = store.create("u", CardDraft::note("hello")).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["cards"][0]["id"], card.id.as_str());
        assert_eq!(raw["cards"][0]["type"], "note");
        assert!(!dir.path().join("nested").join("cards.json.tmp").exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cards.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = FileStore::open(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Serde(_)));
    }

    #[tokio::test]
    async fn blank_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cards.json");
        std::fs::write(&path, "\n").unwrap();

        let store = FileStore::open(&path).await.unwrap();
        assert!(store.list("u").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_mutation_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cards.json");
        let store = FileStore::open(&path).await.unwrap();
        let card = store.create("owner", CardDraft::note("n")).await.unwrap();
        let before = std::fs::read(&path).unwrap();

        let err = store
            .update("intruder", &card.id, CardUpdate::pinned(true))
            .await
            .unwrap_err();
        assert!(err.is_forbidden());
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }
}
