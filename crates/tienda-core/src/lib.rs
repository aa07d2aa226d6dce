//! # tienda-core: Pure Business Logic for Tienda
//!
//! This crate is the **heart** of Tienda. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tienda Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (browser pages)                     │   │
//! │  │    Products ──► Cart ──► Checkout Stepper ──► Receipt           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ generated TS bindings                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tienda-store (StateStore)                    │   │
//! │  │    add_to_cart, set_payment, save_order, subscribe, ...         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tienda-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ checkout  │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │  Payment  │  │   │
//! │  │   │   User    │  │  TaxRate  │  │ CartItem  │  │  Address  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                 │   │
//! │  │   │   order   │  │validation │  │  format   │                 │   │
//! │  │   │   Order   │  │   rules   │  │ currency  │                 │   │
//! │  │   │   Totals  │  │  checks   │  │   ETA     │                 │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, User, TaxRate)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Cart lines, quantity clamping, derived subtotals
//! - [`checkout`] - Payment/address/shipping drafts and step gating
//! - [`order`] - Totals projection and immutable order snapshots
//! - [`validation`] - Form-layer input validation
//! - [`format`] - Currency and delivery-ETA display formatting
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Storage, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in centavos (i64) to avoid float errors
//! 4. **Permissive Cart Math**: Out-of-range quantities are clamped, never rejected;
//!    callers that care receive a status saying what was applied
//!
//! ## Example Usage
//!
//! ```rust
//! use tienda_core::money::Money;
//! use tienda_core::types::TaxRate;
//!
//! // Create money from centavos (never from floats!)
//! let subtotal = Money::from_cents(100_000); // $1,000.00
//!
//! // IVA at 16%
//! let tax = subtotal.calculate_tax(TaxRate::from_bps(tienda_core::TAX_RATE_BPS));
//! assert_eq!(tax.cents(), 16_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod format;
pub mod money;
pub mod order;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tienda_core::Money` instead of
// `use tienda_core::money::Money`

pub use cart::{Cart, CartItem, CartUpdate};
pub use checkout::{Address, CheckoutStep, Payment, ShippingOption};
pub use error::{ValidationError, ValidationResult};
pub use money::Money;
pub use order::{Order, Totals};
pub use types::{Product, TaxRate, User};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum quantity of a single cart line.
///
/// A line that would drop below this is clamped back up, never removed:
/// removal is an explicit operation.
pub const MIN_ITEM_QUANTITY: i64 = 1;

/// Maximum quantity of a single cart line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Requests beyond this are clamped, not rejected.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// IVA (value-added tax) rate in basis points: 1600 = 16%.
///
/// Applied to the cart subtotal when projecting totals; shipping is not
/// taxed.
pub const TAX_RATE_BPS: u32 = 1600;
