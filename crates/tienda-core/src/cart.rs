//! # Cart
//!
//! Cart lines, quantity clamping, and derived totals.
//!
//! ## Cart Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Invariants                                 │
//! │                                                                         │
//! │  • One line per product id (adding the same product merges quantity)   │
//! │  • Quantity always in [1, 999], further capped by stock when known     │
//! │  • subtotal = unit price × quantity, recomputed on every mutation      │
//! │  • Totals (subtotal, count) are derived, never stored separately       │
//! │                                                                         │
//! │  Out-of-range requests are CLAMPED, never rejected. The UI stays       │
//! │  simple; callers that need to know receive a CartUpdate status.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;
use crate::{MAX_ITEM_QUANTITY, MIN_ITEM_QUANTITY};

// =============================================================================
// Quantity Clamping
// =============================================================================

/// Clamps a requested quantity into the allowed `[1, 999]` range.
///
/// ## Example
/// ```rust
/// use tienda_core::cart::clamp_quantity;
///
/// assert_eq!(clamp_quantity(5), 5);
/// assert_eq!(clamp_quantity(0), 1);
/// assert_eq!(clamp_quantity(-3), 1);
/// assert_eq!(clamp_quantity(5000), 999);
/// ```
#[inline]
pub const fn clamp_quantity(qty: i64) -> i64 {
    if qty < MIN_ITEM_QUANTITY {
        MIN_ITEM_QUANTITY
    } else if qty > MAX_ITEM_QUANTITY {
        MAX_ITEM_QUANTITY
    } else {
        qty
    }
}

/// Applies an optional stock cap on top of a clamped quantity.
///
/// A cap of `None` or a non-positive cap (stock unknown or zero) leaves the
/// clamped value as is; a positive cap must never push a line below 1, and
/// cannot, because the clamped input is already at least 1.
#[inline]
fn cap_by_stock(qty: i64, cap: Option<i64>) -> i64 {
    match cap {
        Some(stock) if stock > 0 => qty.min(stock),
        _ => qty,
    }
}

// =============================================================================
// Cart Update Status
// =============================================================================

/// Outcome of a cart mutation.
///
/// Mutations never fail; they clamp. This status tells the caller what was
/// actually applied so a future UI can say "only 3 left" instead of silently
/// truncating. Ignoring it preserves the permissive default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartUpdate {
    /// Quantity the caller asked for.
    pub requested: i64,

    /// Quantity the line holds after the mutation.
    pub line_quantity: i64,

    /// True when clamping or a stock cap altered the request.
    pub clamped: bool,
}

// =============================================================================
// Cart Item
// =============================================================================

/// One product's aggregated quantity and derived subtotal within a cart.
///
/// ## Design Notes
/// - `name` and `unit_price_cents` are frozen copies taken when the product
///   is first added; later catalog changes do not affect an open cart.
/// - `subtotal_cents` is stored for the frontend's convenience but is
///   recomputed from price × quantity on every mutation and on rehydration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    /// Product ID this line aggregates.
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Price in centavos at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity in cart, always within `[1, 999]`.
    pub quantity: i64,

    /// Line subtotal: `unit_price_cents × quantity`.
    pub subtotal_cents: i64,
}

impl CartItem {
    /// Creates a new cart line from a product, freezing name and price.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity,
            subtotal_cents: product.price_cents * quantity,
        }
    }

    /// Sets the quantity and recomputes the subtotal.
    fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.subtotal_cents = self.unit_price_cents * quantity;
    }

    /// Repairs a line loaded from storage.
    ///
    /// Persisted lines go through the same clamp applied to live mutations,
    /// so a corrupted or stale quantity is silently pulled back into range
    /// and its subtotal recomputed. A line whose persisted subtotal disagrees
    /// with price × quantity comes out consistent.
    pub fn restore(mut self) -> Self {
        let qty = clamp_quantity(self.quantity);
        self.set_quantity(qty);
        self
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart: a set of lines keyed by product id.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product merges)
/// - Quantity per line within `[1, 999]`, capped by stock when known
/// - Every mutation recomputes the affected line's subtotal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    /// Lines in insertion order.
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Rebuilds a cart from persisted lines, repairing each one.
    pub fn restore(items: Vec<CartItem>) -> Self {
        Cart {
            items: items.into_iter().map(CartItem::restore).collect(),
        }
    }

    /// Adds a product to the cart or merges into the existing line.
    ///
    /// ## Behavior
    /// 1. The requested quantity is clamped to `[1, 999]`, then capped by
    ///    the product's stock (a stock of 0 means unknown: no cap).
    /// 2. If the product already has a line, the capped amount is merged
    ///    into it and the merged quantity is re-clamped and re-capped.
    /// 3. Otherwise a new line is appended.
    ///
    /// Never fails; returns what was applied.
    pub fn add_item(&mut self, product: &Product, qty: i64) -> CartUpdate {
        let cap = product.stock_cap();
        let add = cap_by_stock(clamp_quantity(qty), cap);

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let unclamped = item.quantity + qty;
            let next = cap_by_stock(clamp_quantity(item.quantity + add), cap);
            item.set_quantity(next);
            return CartUpdate {
                requested: qty,
                line_quantity: next,
                clamped: next != unclamped,
            };
        }

        self.items.push(CartItem::from_product(product, add));
        CartUpdate {
            requested: qty,
            line_quantity: add,
            clamped: add != qty,
        }
    }

    /// Updates the quantity of an existing line.
    ///
    /// ## Behavior
    /// - Unknown id: complete no-op, returns `None`.
    /// - Otherwise clamps to `[1, 999]`, applies the optional stock cap,
    ///   and recomputes the subtotal.
    pub fn update_quantity(
        &mut self,
        product_id: &str,
        qty: i64,
        max_stock: Option<i64>,
    ) -> Option<CartUpdate> {
        let item = self.items.iter_mut().find(|i| i.product_id == product_id)?;
        let next = cap_by_stock(clamp_quantity(qty), max_stock);
        item.set_quantity(next);
        Some(CartUpdate {
            requested: qty,
            line_quantity: next,
            clamped: next != qty,
        })
    }

    /// Removes the line for a product id. Absent ids are ignored.
    ///
    /// Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != initial_len
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the number of lines (unique products).
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity across all lines (the cart badge number).
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Calculates the subtotal across all lines.
    pub fn subtotal_cents(&self) -> i64 {
        self.items.iter().map(|i| i.subtotal_cents).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
