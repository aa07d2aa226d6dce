//! # Storage Keys
//!
//! Namespaced keys for the durable key-value layer, one per state category.
//! Every category persists as its own JSON document under its own key, so a
//! corrupt entry only loses that category on rehydration.

/// Session user.
pub const USER: &str = "tienda:user";

/// Cart lines.
pub const CART: &str = "tienda:cart";

/// Payment draft.
pub const PAYMENT: &str = "tienda:payment";

/// Address draft.
pub const ADDRESS: &str = "tienda:address";

/// Selected shipping option.
pub const SHIPPING_OPT: &str = "tienda:shippingOpt";

/// Last completed order (single slot, overwritten on each confirmation).
pub const LAST_ORDER: &str = "tienda:order:last";

/// All category keys, in hydration order.
pub const ALL: [&str; 6] = [USER, CART, PAYMENT, ADDRESS, SHIPPING_OPT, LAST_ORDER];
