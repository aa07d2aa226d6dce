//! # Checkout Drafts
//!
//! The in-progress, not-yet-finalized checkout selections: payment method,
//! delivery address, and shipping option. Drafts live in the state store
//! until an order is confirmed, then get reset.
//!
//! ## Step Gating
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Stepper                                   │
//! │                                                                         │
//! │  ┌──────────┐      ┌──────────────┐      ┌──────────┐                  │
//! │  │ Payment  │─────►│   Address    │─────►│  Review  │                  │
//! │  │          │      │  + shipping  │      │ confirm  │                  │
//! │  └──────────┘      └──────────────┘      └──────────┘                  │
//! │                                                                         │
//! │  A step is reachable only when every earlier step has a complete       │
//! │  draft. Requesting a later step without one demotes the request to     │
//! │  the first incomplete step (StateStore::checkout_step).                │
//! │                                                                         │
//! │  Shipping is chosen inside the Address step because cost and ETA       │
//! │  depend on the destination state.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Payment Draft
// =============================================================================

/// The selected payment method.
///
/// ## Design Notes
/// Exactly one variant is active - the tagged representation makes the
/// "type-specific fields" of the wire format explicit instead of a bag of
/// optional fields. The raw card number is NEVER retained: [`Payment::card`]
/// keeps only the last four digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "lowercase")]
#[ts(export)]
pub enum Payment {
    /// Credit/debit card, masked down to its last four digits.
    #[serde(rename_all = "camelCase")]
    Card {
        /// Last four digits of the card number.
        card_last4: String,
        /// Name printed on the card.
        holder: String,
    },

    /// Bank transfer identified by its reference string.
    Transfer {
        /// Transfer reference entered by the shopper.
        #[serde(rename = "ref")]
        reference: String,
    },
}

impl Payment {
    /// Builds a card payment draft, retaining only the last four digits.
    ///
    /// The caller validates the full number first (see
    /// [`crate::validation::validate_card_number`]); this constructor is the
    /// masking point - the full number never leaves the form layer.
    ///
    /// ## Example
    /// ```rust
    /// use tienda_core::checkout::Payment;
    ///
    /// let payment = Payment::card("4539 5787 6362 1486", "ANA TORRES");
    /// assert_eq!(
    ///     payment,
    ///     Payment::Card {
    ///         card_last4: "1486".to_string(),
    ///         holder: "ANA TORRES".to_string(),
    ///     }
    /// );
    /// ```
    pub fn card(number: &str, holder: &str) -> Self {
        let digits: Vec<char> = number.chars().filter(|c| c.is_ascii_digit()).collect();
        let start = digits.len().saturating_sub(4);
        Payment::Card {
            card_last4: digits[start..].iter().collect(),
            holder: holder.to_string(),
        }
    }

    /// Builds a bank-transfer payment draft.
    pub fn transfer(reference: &str) -> Self {
        Payment::Transfer {
            reference: reference.to_string(),
        }
    }
}

// =============================================================================
// Address Draft
// =============================================================================

/// The delivery address draft.
///
/// All fields are required before the checkout may progress past the
/// address step; [`Address::is_complete`] is the gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Address {
    /// Recipient full name.
    pub name: String,

    /// Contact phone (10 digits, validated by the form).
    pub phone: String,

    /// Street name.
    pub street: String,

    /// Exterior number.
    pub ext: String,

    /// Neighborhood (colonia).
    pub suburb: String,

    /// Postal code (5 digits, validated by the form).
    pub zip: String,

    /// City.
    pub city: String,

    /// State - also the key into the shipping rate table.
    pub state: String,
}

impl Address {
    /// Checks that every field is filled in (whitespace does not count).
    pub fn is_complete(&self) -> bool {
        [
            &self.name,
            &self.phone,
            &self.street,
            &self.ext,
            &self.suburb,
            &self.zip,
            &self.city,
            &self.state,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

// =============================================================================
// Shipping Option
// =============================================================================

/// A shipping choice priced for the destination state.
///
/// Built from the shipping rate table once the address state is known;
/// cost and ETA are frozen into the draft (and later the order snapshot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShippingOption {
    /// Tier identifier ("Económico", "Estándar", "Exprés").
    pub id: String,

    /// Display label.
    pub label: String,

    /// Estimated delivery time in days.
    pub eta_days: u32,

    /// Shipping cost in centavos.
    pub cost_cents: i64,
}

impl ShippingOption {
    /// Returns the shipping cost as Money.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }
}

// =============================================================================
// Checkout Step
// =============================================================================

/// The three checkout steps, in order.
///
/// Ordered so gating can compare: a requested step is demoted to the first
/// step whose prerequisite draft is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CheckoutStep {
    /// Choose and validate the payment method.
    Payment,

    /// Enter the delivery address and pick a shipping option.
    Address,

    /// Review the order summary and confirm.
    Review,
}

// =============================================================================
// Unit Tests
// =============================================================================
