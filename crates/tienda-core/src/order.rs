//! # Orders and Totals
//!
//! The totals projection shown on the cart summary and review step, and the
//! immutable order snapshot written when a purchase is confirmed.
//!
//! ## Snapshot Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Order Confirmation                                  │
//! │                                                                         │
//! │   Live state (keeps changing)        Order (frozen at confirmation)    │
//! │   ─────────────────────────          ──────────────────────────────    │
//! │   cart lines ────────────┐           items: independent copies         │
//! │   address draft ─────────┼──copy──►  address: snapshot                 │
//! │   shipping draft ────────┤           shipping_opt: snapshot            │
//! │   payment draft ─────────┘           payment: snapshot                 │
//! │                                                                         │
//! │   Clearing the cart after confirmation does NOT touch the order.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartItem;
use crate::checkout::{Address, Payment, ShippingOption};
use crate::money::Money;
use crate::types::TaxRate;

// =============================================================================
// Totals Projection
// =============================================================================

/// Derived checkout totals.
///
/// A pure projection over the cart and the selected shipping option - it is
/// computed on demand and never persisted on its own (orders embed a copy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Totals {
    /// Sum of line subtotals.
    pub subtotal_cents: i64,

    /// IVA on the subtotal, rounded half up. Shipping is not taxed.
    pub taxes_cents: i64,

    /// Selected shipping option's cost, or 0 when none is selected yet.
    pub shipping_cents: i64,

    /// subtotal + taxes + shipping.
    pub total_cents: i64,
}

impl Totals {
    /// Projects totals from a cart subtotal and an optional shipping choice.
    pub fn project(subtotal: Money, shipping: Option<&ShippingOption>, rate: TaxRate) -> Self {
        let taxes = subtotal.calculate_tax(rate);
        let shipping_cents = shipping.map(|opt| opt.cost_cents).unwrap_or(0);
        Totals {
            subtotal_cents: subtotal.cents(),
            taxes_cents: taxes.cents(),
            shipping_cents,
            total_cents: subtotal.cents() + taxes.cents() + shipping_cents,
        }
    }

    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A confirmed purchase.
///
/// Immutable once created: every field is an independent copy of the cart
/// and checkout drafts at confirmation time, not a live reference. Only the
/// most recent order is retained (the "last order" slot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    /// Time-based identifier (milliseconds since the Unix epoch).
    pub id: String,

    /// Snapshot of the cart lines at confirmation.
    pub items: Vec<CartItem>,

    /// Sum of line subtotals at confirmation.
    pub subtotal_cents: i64,

    /// IVA charged.
    pub taxes_cents: i64,

    /// Shipping charged.
    pub shipping_cents: i64,

    /// Grand total charged.
    pub total_cents: i64,

    /// Delivery address snapshot.
    pub address: Address,

    /// Shipping option snapshot.
    pub shipping_opt: ShippingOption,

    /// Payment method snapshot (card already masked).
    pub payment: Payment,

    /// When the order was confirmed.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Composes an order from the current cart and checkout drafts.
    ///
    /// Takes owned copies so the snapshot is decoupled from live state;
    /// the caller typically clears the cart right after saving the result.
    pub fn compose(
        items: Vec<CartItem>,
        totals: Totals,
        address: Address,
        shipping_opt: ShippingOption,
        payment: Payment,
    ) -> Self {
        let created_at = Utc::now();
        Order {
            id: created_at.timestamp_millis().to_string(),
            items,
            subtotal_cents: totals.subtotal_cents,
            taxes_cents: totals.taxes_cents,
            shipping_cents: totals.shipping_cents,
            total_cents: totals.total_cents,
            address,
            shipping_opt,
            payment,
            created_at,
        }
    }

    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TAX_RATE_BPS;

    fn iva() -> TaxRate {
        TaxRate::from_bps(TAX_RATE_BPS)
    }

    fn shipping_option(cost_cents: i64) -> ShippingOption {
        ShippingOption {
            id: "Estándar".to_string(),
            label: "Estándar".to_string(),
            eta_days: 3,
            cost_cents,
        }
    }

    #[test]
    fn test_totals_without_shipping() {
        // subtotal=1000 → taxes=160, shipping=0, total=1160
        let totals = Totals::project(Money::from_cents(1000), None, iva());
        assert_eq!(totals.subtotal_cents, 1000);
        assert_eq!(totals.taxes_cents, 160);
        assert_eq!(totals.shipping_cents, 0);
        assert_eq!(totals.total_cents, 1160);
    }

    #[test]
    fn test_totals_with_shipping() {
        // subtotal=1000, shipping=100 → total=1260
        let opt = shipping_option(100);
        let totals = Totals::project(Money::from_cents(1000), Some(&opt), iva());
        assert_eq!(totals.total_cents, 1260);
    }

    #[test]
    fn test_totals_empty_cart() {
        let totals = Totals::project(Money::zero(), None, iva());
        assert_eq!(totals.subtotal_cents, 0);
        assert_eq!(totals.total_cents, 0);
    }

    #[test]
    fn test_order_compose_embeds_totals_and_stamps_id() {
        let items = vec![CartItem {
            product_id: "p1".to_string(),
            name: "Producto p1".to_string(),
            unit_price_cents: 500,
            quantity: 2,
            subtotal_cents: 1000,
        }];
        let totals = Totals::project(Money::from_cents(1000), Some(&shipping_option(100)), iva());

        let order = Order::compose(
            items.clone(),
            totals,
            Address::default(),
            shipping_option(100),
            Payment::transfer("SPEI-1"),
        );

        assert_eq!(order.items, items);
        assert_eq!(order.subtotal_cents, 1000);
        assert_eq!(order.taxes_cents, 160);
        assert_eq!(order.shipping_cents, 100);
        assert_eq!(order.total_cents, 1260);
        assert_eq!(order.id, order.created_at.timestamp_millis().to_string());
        assert!(order.id.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_order_is_independent_snapshot() {
        let mut items = vec![CartItem {
            product_id: "p1".to_string(),
            name: "Producto p1".to_string(),
            unit_price_cents: 500,
            quantity: 2,
            subtotal_cents: 1000,
        }];
        let totals = Totals::project(Money::from_cents(1000), None, iva());
        let order = Order::compose(
            items.clone(),
            totals,
            Address::default(),
            shipping_option(0),
            Payment::transfer("SPEI-1"),
        );

        // Mutating the source after composition must not reach the order.
        items[0].quantity = 9;
        assert_eq!(order.items[0].quantity, 2);
    }
}
