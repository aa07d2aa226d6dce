//! # Key-Value Storage
//!
//! The durable layer under the state store: a string key-value contract,
//! two backends, and the absorbing boundary that makes persistence
//! best-effort.
//!
//! ## The Absorbing Boundary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Two Layers, Two Policies                            │
//! │                                                                         │
//! │  KvBackend (inner)                 Storage (outer)                     │
//! │  ──────────────────                ───────────────                     │
//! │  get → Result<Option<String>>      get → Option<T>                     │
//! │  set → Result<()>                  set → ()                            │
//! │  remove → Result<()>               remove → ()                         │
//! │                                                                         │
//! │  Typed failures, testable          Failures collapse HERE:             │
//! │  in isolation                      get → None, set/remove → no-op,     │
//! │                                    each absorbed failure logged        │
//! │                                                                         │
//! │  The "never fail the caller" policy lives at exactly one seam          │
//! │  instead of being implicit everywhere.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{StorageError, StorageResult};

// =============================================================================
// Backend Contract
// =============================================================================

/// A durable string key-value backend.
///
/// Implementations are fallible and typed; the [`Storage`] wrapper decides
/// what failure means for callers. Values are opaque strings (the storage
/// layer serializes categories to JSON before they get here).
pub trait KvBackend: Send + Sync {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes the value stored under `key`. Absent keys are fine.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Sharing a backend between a store and a later rehydration (or a test
/// asserting on raw persisted bytes) just wraps it in an `Arc`.
impl<B: KvBackend + ?Sized> KvBackend for std::sync::Arc<B> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

// =============================================================================
// Memory Backend
// =============================================================================

/// In-memory backend for tests and ephemeral sessions.
///
/// A `Mutex<HashMap>` would do; `BTreeMap` keeps dumps deterministic when
/// debugging.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryBackend {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// JSON File Backend
// =============================================================================

/// File-backed backend: the whole keyspace is one JSON object document.
///
/// ## Layout
/// ```json
/// {
///   "tienda:cart": "[{\"productId\":\"p1\", ...}]",
///   "tienda:user": "{\"id\":\"1700...\", ...}"
/// }
/// ```
///
/// Reads tolerate a missing file (empty keyspace). Every write rewrites the
/// document; the store's snapshots are a few kilobytes, so read-modify-write
/// per operation is simpler than an incremental format and fast enough.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Creates a backend persisting to the given file path.
    ///
    /// The file is created lazily on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileBackend { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> StorageResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_document(&self, document: &BTreeMap<String, String>) -> StorageResult<()> {
        let raw = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KvBackend for JsonFileBackend {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_document()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut document = self.read_document()?;
        document.insert(key.to_string(), value.to_string());
        self.write_document(&document)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut document = self.read_document()?;
        if document.remove(key).is_some() {
            self.write_document(&document)?;
        }
        Ok(())
    }
}

// =============================================================================
// Absorbing Storage Wrapper
// =============================================================================

/// The storage seam the state store talks to.
///
/// Serializes categories to JSON strings and collapses every backend or
/// parse failure: `get` degrades to `None` ("no prior value"), `set` and
/// `remove` to no-ops. Each absorbed failure is logged at warn so an
/// operator can see persistence degrading, but no caller ever does.
pub struct Storage {
    backend: Box<dyn KvBackend>,
}

impl Storage {
    /// Wraps a backend.
    pub fn new(backend: impl KvBackend + 'static) -> Self {
        Storage {
            backend: Box::new(backend),
        }
    }

    /// Reads and deserializes the value under `key`.
    ///
    /// Missing key, backend failure, and corrupt payload all come back as
    /// `None` - the caller treats every case as "no prior value".
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get(key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(key, %err, "storage read failed, treating as absent");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, %err, "stored value corrupt, treating as absent");
                None
            }
        }
    }

    /// Serializes and stores `value` under `key`. Best-effort.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, %err, "value not serializable, skipping persist");
                return;
            }
        };

        if let Err(err) = self.backend.set(key, &raw) {
            warn!(key, %err, "storage write failed, in-memory state stays authoritative");
        }
    }

    /// Removes the value under `key`. Best-effort.
    pub fn remove(&self, key: &str) {
        if let Err(err) = self.backend.remove(key) {
            warn!(key, %err, "storage remove failed");
        }
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
