//! # Domain Types
//!
//! Core domain types used throughout Tienda.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      User       │   │    TaxRate      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  bps (u32)      │       │
//! │  │  name           │   │  email          │   │  1600 = 16%     │       │
//! │  │  price_cents    │   │  name           │   └─────────────────┘       │
//! │  │  stock, rating  │   └─────────────────┘                             │
//! │  └─────────────────┘                                                   │
//! │                                                                         │
//! │  Product comes from the read-only catalog; User is the session         │
//! │  identity; TaxRate parameterizes the totals projection.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1600 bps = 16% (Mexican IVA)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product from the catalog.
///
/// The catalog is a read-only external data source fetched once per session;
/// products are never mutated by the store. Cart lines freeze the name and
/// price at add time, so later catalog changes do not affect an open cart.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier within the catalog.
    pub id: String,

    /// Display name shown in listings and on the receipt.
    pub name: String,

    /// Price in centavos (smallest currency unit).
    pub price_cents: i64,

    /// Units available. Zero means "stock unknown" for capping purposes:
    /// the cart falls back to the plain clamped quantity.
    pub stock: i64,

    /// Category used by the listing filters.
    pub category: String,

    /// Average rating, 0.0 - 5.0. Display only.
    pub rating: f64,

    /// Image reference (path under the static assets root).
    pub img: String,

    /// Warehouse state the product ships from.
    pub ships_from: String,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Stock cap for cart math: `None` when stock is zero (unknown).
    ///
    /// Mirrors the cart rule "if stock is 0 or unknown, fall back to the
    /// clamped value".
    #[inline]
    pub fn stock_cap(&self) -> Option<i64> {
        if self.stock > 0 {
            Some(self.stock)
        } else {
            None
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// The session user.
///
/// Present means authenticated; absent means anonymous. The store accepts
/// the struct as given - credential and format checks are the login form's
/// responsibility (see [`crate::validation`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    /// Opaque identifier assigned at login.
    pub id: String,

    /// Login email.
    pub email: String,

    /// Display name (derived from the email local part at login).
    pub name: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
