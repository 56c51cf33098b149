// ABOUTME: Main library entry point for the BeeKeeper clip ingestion pipeline.
// ABOUTME: Re-exports the public API: Clipper, ClipperBuilder, payload types, errors, and pipeline steps.

//! Clip ingestion pipeline.
//!
//! Turns a user-supplied URL (plus optional overrides) into a complete card
//! payload: validate, fetch, extract Open Graph / Twitter / generic metadata,
//! merge with user fields, then classify.
//!
//! # Example
//!
//! ```no_run
//! use beekeeper_clip::{classify, ClipError, ClipRequest, Clipper};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ClipError> {
//!     let clipper = Clipper::builder().build()?;
//!     let payload = clipper.clip(&ClipRequest::new("https://example.com")).await?;
//!     println!("{:?} is a {}", payload.title, classify(Some(&payload.url)));
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod client;
pub mod enrich;
pub mod error;
pub mod metadata;
pub mod options;
pub mod payload;
pub mod resource;
pub mod urls;

pub use crate::classify::{classify, CardType, IMAGE_EXTENSIONS};
pub use crate::client::Clipper;
pub use crate::enrich::{apply_fallbacks, merge_scraped};
pub use crate::error::{ClipError, ErrorCode};
pub use crate::metadata::extract_metadata;
pub use crate::options::{ClipperBuilder, Options};
pub use crate::payload::{normalize_tags, validate, ClipPayload, ClipRequest, ScrapedData};
pub use crate::urls::{default_favicon, extract_domain, non_empty, parse_absolute, resolve_url};
pub use tokio_util::sync::CancellationToken;
