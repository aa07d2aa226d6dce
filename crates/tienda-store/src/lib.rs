//! # tienda-store: State Store and Persistence
//!
//! The single authoritative in-memory representation of session, cart,
//! checkout and order data, with durable mirroring and change notification.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     tienda-store Data Flow                              │
//! │                                                                         │
//! │  View layer (external)                                                  │
//! │     │  mutation calls            ▲  re-read on notify                   │
//! │     ▼                            │                                      │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      StateStore                                 │   │
//! │  │                                                                 │   │
//! │  │   validate/clamp ──► mutate ──► persist ──► notify              │   │
//! │  │   (tienda-core)      (memory)   (Storage)   (subscribers)       │   │
//! │  └──────────────────────────────────┬──────────────────────────────┘   │
//! │                                     │                                   │
//! │  ┌──────────────────────────────────▼──────────────────────────────┐   │
//! │  │   Storage (absorbing boundary)                                  │   │
//! │  │   get → None on failure, set/remove → no-op on failure          │   │
//! │  └──────────────────────────────────┬──────────────────────────────┘   │
//! │                                     │                                   │
//! │         ┌───────────────────────────┴───────────────┐                  │
//! │         ▼                                           ▼                  │
//! │  ┌──────────────┐                          ┌─────────────────┐         │
//! │  │MemoryBackend │                          │ JsonFileBackend │         │
//! │  │ (tests,      │                          │ (durable JSON   │         │
//! │  │  ephemeral)  │                          │  document)      │         │
//! │  └──────────────┘                          └─────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - The StateStore: hydrate, mutate, persist, notify
//! - [`storage`] - Key-value backends and the failure-absorbing boundary
//! - [`keys`] - Namespaced storage keys, one per state category
//! - [`catalog`] - Read-only product catalog and shipping rate table
//! - [`error`] - Storage and catalog error types

pub mod catalog;
pub mod error;
pub mod keys;
pub mod storage;
pub mod store;

pub use catalog::{Catalog, ShippingQuote, ShippingRates};
pub use error::{CatalogError, StorageError};
pub use storage::{JsonFileBackend, KvBackend, MemoryBackend, Storage};
pub use store::{StateStore, Subscription};
