//! # Store Error Types
//!
//! Error types for the storage and catalog layers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Backend failure (io / serde_json)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageError (this module) ← typed inside the storage layer           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Storage absorber ← collapses to None / no-op, logs a warning          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StateStore callers never see a persistence failure                    │
//! │                                                                         │
//! │  CatalogError is different: catalog loads are read-once-at-startup     │
//! │  and ARE surfaced, so the caller can decide what to render without     │
//! │  data.                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Storage Error
// =============================================================================

/// Key-value backend failures.
///
/// These stay internal to the storage layer: the [`crate::storage::Storage`]
/// wrapper collapses every one of them to an absent value or a no-op before
/// a store caller can observe it.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backing file could not be read or written.
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document or value is not valid JSON.
    #[error("storage payload corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The backend's lock was poisoned by a panicking holder.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Result type for backend operations.
pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Catalog Error
// =============================================================================

/// Catalog / shipping-rate data source failures.
///
/// Unlike storage, the catalog contract is not best-effort: data is fetched
/// once per session and a failure is surfaced to the caller.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Data file could not be read.
    #[error("catalog data unavailable: {0}")]
    Io(#[from] std::io::Error),

    /// Data is not the expected JSON shape.
    #[error("catalog data malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

// =============================================================================
// Unit Tests
// =============================================================================
