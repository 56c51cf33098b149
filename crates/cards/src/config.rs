// ABOUTME: Store configuration: which backend to use and where file-backed cards live.
// ABOUTME: open_store is the single place a backend is chosen; callers only see Arc<dyn CardStore>.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::error::StoreError;
use crate::store::{CardStore, FileStore, MemoryStore};

/// Environment variable naming the backend (`memory` or `file`).
pub const STORE_ENV: &str = "BEEKEEPER_STORE";
/// Environment variable holding the JSON file path for the file backend.
pub const DATA_ENV: &str = "BEEKEEPER_DATA";
/// File used by the file backend when no path is configured.
pub const DEFAULT_DATA_FILE: &str = "beekeeper-cards.json";

/// Backend kind without its settings, as named on the command line or in the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreKind {
    #[default]
    Memory,
    File,
}

impl FromStr for StoreKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(StoreKind::Memory),
            "file" | "json" => Ok(StoreKind::File),
            other => Err(StoreError::Config(format!(
                "unknown store backend {other:?} (expected memory or file)"
            ))),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreKind::Memory => "memory",
            StoreKind::File => "file",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
        }
    }
}

impl StoreConfig {
    /// In-memory cards.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Cards persisted to a JSON file at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: StoreBackend::File(path.into()),
        }
    }

    /// Builds a config from a backend kind and an optional data path.
    pub fn from_parts(kind: StoreKind, data: Option<PathBuf>) -> Self {
        match kind {
            StoreKind::Memory => Self::memory(),
            StoreKind::File => {
                Self::file(data.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)))
            }
        }
    }

    /// Reads `BEEKEEPER_STORE` and `BEEKEEPER_DATA`. Unset or blank values use the defaults.
    pub fn from_env() -> Result<Self, StoreError> {
        let kind = match env::var(STORE_ENV) {
            Ok(v) if !v.trim().is_empty() => v.parse()?,
            _ => StoreKind::default(),
        };
        Ok(Self::from_parts(kind, data_from_env()))
    }

    /// Explicit settings first, the environment only for what they leave open.
    ///
    /// A `kind` skips `BEEKEEPER_STORE` entirely, so a bad value there cannot break it.
    /// A `data` path alone selects the file backend.
    pub fn with_overrides(
        kind: Option<StoreKind>,
        data: Option<PathBuf>,
    ) -> Result<Self, StoreError> {
        match (kind, data) {
            (None, None) => Self::from_env(),
            (None, Some(path)) => Ok(Self::file(path)),
            (Some(kind), data) => Ok(Self::from_parts(kind, data.or_else(data_from_env))),
        }
    }
}

fn data_from_env() -> Option<PathBuf> {
    env::var_os(DATA_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Opens the configured backend.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn CardStore>, StoreError> {
    match &config.backend {
        StoreBackend::Memory => {
            debug!("using in-memory card store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::File(path) => {
            debug!(path = %path.display(), "using file card store");
            Ok(Arc::new(FileStore::open(path.clone()).await?))
        }
    }
}
