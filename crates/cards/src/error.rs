// ABOUTME: Error types for card storage and the clip service.
// ABOUTME: StoreError covers lookups, configuration and persistence; ServiceError adds pipeline failures.

use std::fmt;

use beekeeper_clip::ClipError;
use thiserror::Error;

/// Errors raised by a card store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No card with this id exists.
    #[error("card not found: {0}")]
    NotFound(String),

    /// The card exists but belongs to another user.
    #[error("card {0} belongs to another user")]
    Forbidden(String),

    /// The input cannot become a card.
    #[error("invalid card: {0}")]
    Invalid(String),

    /// The backend selection or its settings are unusable.
    #[error("invalid store configuration: {0}")]
    Config(String),

    #[error("card storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("card storage is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

impl StoreError {
    /// Creates an Invalid error with a custom message.
    pub fn invalid(msg: impl fmt::Display) -> Self {
        StoreError::Invalid(msg.to_string())
    }

    /// Returns true for NotFound.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// Returns true for Forbidden.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, StoreError::Forbidden(_))
    }
}

/// Errors surfaced by [`crate::ClipService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Validation (or cancellation) failure from the clip pipeline.
    #[error(transparent)]
    Clip(#[from] ClipError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Returns true when the caller sent input that can never succeed.
    pub fn is_client_error(&self) -> bool {
        match self {
            ServiceError::Clip(e) => e.is_invalid_url(),
            ServiceError::Store(e) => matches!(
                e,
                StoreError::Invalid(_) | StoreError::NotFound(_) | StoreError::Forbidden(_)
            ),
        }
    }
}
