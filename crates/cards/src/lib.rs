// ABOUTME: Card storage and the clip service for BeeKeeper.
// ABOUTME: Re-exports the card models, the CardStore trait with its backends, configuration, and ClipService.

//! Cards built from clipped links, plus the stores that keep them.
//!
//! ```no_run
//! use beekeeper_cards::{open_store, ClipService, StoreConfig};
//! use beekeeper_clip::{ClipRequest, Clipper};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = open_store(&StoreConfig::from_env()?).await?;
//! let service = ClipService::new(Clipper::builder().build()?, store);
//! let card = service.clip("user-1", &ClipRequest::new("https://example.com")).await?;
//! println!("{} ({})", card.title, card.card_type);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

pub use crate::config::{open_store, StoreBackend, StoreConfig, StoreKind};
pub use crate::error::{ServiceError, StoreError};
pub use crate::models::{Card, CardDraft, CardUpdate, UNTITLED};
pub use crate::service::ClipService;
pub use crate::store::{CardStore, FileStore, MemoryStore};
