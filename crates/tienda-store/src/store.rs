//! # State Store
//!
//! The single authoritative in-memory representation of session, cart,
//! checkout and order data, with durable mirroring and change notification.
//!
//! ## Operation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Every Mutating Operation                                   │
//! │                                                                         │
//! │  validate/clamp ──► mutate in memory ──► persist snapshot ──► notify   │
//! │  (tienda-core)      (under the lock)     (best-effort)       (sync)    │
//! │                                                                         │
//! │  By the time the call returns, durable storage reflects the new        │
//! │  state and every subscriber has already run. Listeners must not        │
//! │  assume further asynchrony.                                            │
//! │                                                                         │
//! │  Reads return owned copies - callers can never mutate internal         │
//! │  state by reference.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! There is one logical mutator (the UI event loop), but accessors take
//! `&self` via a `Mutex` around the state so the store can be shared like
//! any other managed state. The lock is released before listeners run, so
//! a listener may re-read the store; it must not mutate it re-entrantly.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, error};

use tienda_core::cart::{Cart, CartItem, CartUpdate};
use tienda_core::checkout::{Address, CheckoutStep, Payment, ShippingOption};
use tienda_core::money::Money;
use tienda_core::order::{Order, Totals};
use tienda_core::types::{Product, TaxRate, User};
use tienda_core::TAX_RATE_BPS;

use crate::keys;
use crate::storage::{KvBackend, Storage};

// =============================================================================
// Subscriptions
// =============================================================================

/// Capability to deregister a listener.
///
/// Returned by [`StateStore::subscribe`]; pass it back to
/// [`StateStore::unsubscribe`]. Dropping it without unsubscribing leaves the
/// listener registered for the life of the store.
#[derive(Debug)]
pub struct Subscription(u64);

type Listener = Arc<dyn Fn() + Send + Sync>;

// =============================================================================
// State Categories
// =============================================================================

/// The in-memory categories, mirrored to storage as one document per key.
#[derive(Debug, Default)]
struct State {
    user: Option<User>,
    cart: Cart,
    payment: Option<Payment>,
    address: Option<Address>,
    shipping_opt: Option<ShippingOption>,
    last_order: Option<Order>,
}

// =============================================================================
// State Store
// =============================================================================

/// The storefront state store.
///
/// Constructed explicitly by the application entry point and injected into
/// whichever view needs it - there is no module-level singleton, so tests
/// get fresh, isolated stores.
pub struct StateStore {
    state: Mutex<State>,
    storage: Storage,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
}

impl StateStore {
    /// Creates a store hydrated from the given backend.
    ///
    /// Missing or corrupt entries default to empty/absent. Cart lines pass
    /// through the same clamp applied to live mutations, so a stale or
    /// tampered persisted quantity is repaired into range and its subtotal
    /// recomputed before anything reads it.
    pub fn new(backend: impl KvBackend + 'static) -> Self {
        let storage = Storage::new(backend);

        let state = State {
            user: storage.get(keys::USER),
            cart: Cart::restore(storage.get::<Vec<CartItem>>(keys::CART).unwrap_or_default()),
            payment: storage.get(keys::PAYMENT),
            address: storage.get(keys::ADDRESS),
            shipping_opt: storage.get(keys::SHIPPING_OPT),
            last_order: storage.get(keys::LAST_ORDER),
        };

        debug!(
            cart_lines = state.cart.line_count(),
            has_user = state.user.is_some(),
            "state store hydrated"
        );

        StateStore {
            state: Mutex::new(state),
            storage,
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(0),
        }
    }

    // -------------------------------------------------------------------------
    // Mutation pipeline
    // -------------------------------------------------------------------------

    /// Mirrors the live categories to storage. Best-effort: absent
    /// categories are removed, failures are absorbed by [`Storage`].
    fn persist(&self, state: &State) {
        Self::persist_optional(&self.storage, keys::USER, &state.user);
        self.storage.set(keys::CART, &state.cart.items);
        Self::persist_optional(&self.storage, keys::PAYMENT, &state.payment);
        Self::persist_optional(&self.storage, keys::ADDRESS, &state.address);
        Self::persist_optional(&self.storage, keys::SHIPPING_OPT, &state.shipping_opt);
    }

    fn persist_optional<T: serde::Serialize>(storage: &Storage, key: &str, value: &Option<T>) {
        match value {
            Some(value) => storage.set(key, value),
            None => storage.remove(key),
        }
    }

    /// Runs a mutation to completion: mutate + persist under the lock, then
    /// notify with the lock released so listeners can re-read the store.
    fn mutate<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let result = {
            let mut state = self.state.lock().expect("state mutex poisoned");
            let result = f(&mut state);
            self.persist(&state);
            result
        };
        self.notify();
        result
    }

    /// Invokes every subscriber, in registration order, isolating each one:
    /// a panicking listener is logged and skipped so it cannot break the
    /// mutation's completion guarantee for the listeners after it.
    fn notify(&self) {
        let listeners: Vec<(u64, Listener)> = self
            .listeners
            .lock()
            .expect("listener mutex poisoned")
            .clone();

        for (id, listener) in listeners {
            if catch_unwind(AssertUnwindSafe(|| listener())).is_err() {
                error!(listener = id, "subscriber panicked during notification");
            }
        }
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    /// Registers a zero-argument listener invoked synchronously after every
    /// state-mutating operation.
    ///
    /// No payload is passed: listeners re-read whatever state they care
    /// about. Multiple independent subscribers are supported (the cart badge
    /// and the cart page each register their own).
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .expect("listener mutex poisoned")
            .push((id, Arc::new(listener)));
        Subscription(id)
    }

    /// Deregisters a listener. Unknown subscriptions are ignored.
    pub fn unsubscribe(&self, subscription: Subscription) {
        self.listeners
            .lock()
            .expect("listener mutex poisoned")
            .retain(|(id, _)| *id != subscription.0);
    }

    // -------------------------------------------------------------------------
    // User session
    // -------------------------------------------------------------------------

    /// Returns the session user, if authenticated.
    pub fn user(&self) -> Option<User> {
        self.state.lock().expect("state mutex poisoned").user.clone()
    }

    /// Sets the session user.
    ///
    /// Accepts the struct as given - credential and format checks belong to
    /// the login form (see `tienda_core::validation`).
    pub fn set_user(&self, user: User) {
        debug!(email = %user.email, "set_user");
        self.mutate(|state| state.user = Some(user));
    }

    /// Clears the session user (logout). Cart and drafts are untouched.
    pub fn clear_user(&self) {
        debug!("clear_user");
        self.mutate(|state| state.user = None);
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    /// Returns an owned copy of the cart lines.
    pub fn cart(&self) -> Vec<CartItem> {
        self.state
            .lock()
            .expect("state mutex poisoned")
            .cart
            .items
            .clone()
    }

    /// Adds a product to the cart, merging into an existing line.
    ///
    /// Quantities are clamped to `[1, 999]` and capped by stock when known;
    /// the returned status says what was applied (callers may ignore it).
    pub fn add_to_cart(&self, product: &Product, qty: i64) -> CartUpdate {
        debug!(product_id = %product.id, qty, "add_to_cart");
        self.mutate(|state| state.cart.add_item(product, qty))
    }

    /// Updates the quantity of an existing line.
    ///
    /// Unknown ids are a complete no-op: nothing is persisted and no
    /// listener fires. Otherwise the quantity is clamped, optionally capped
    /// by `max_stock`, and the subtotal recomputed.
    pub fn update_qty(&self, product_id: &str, qty: i64, max_stock: Option<i64>) -> Option<CartUpdate> {
        debug!(product_id, qty, "update_qty");
        let update = {
            let mut state = self.state.lock().expect("state mutex poisoned");
            let update = state.cart.update_quantity(product_id, qty, max_stock)?;
            self.persist(&state);
            update
        };
        self.notify();
        Some(update)
    }

    /// Removes a line from the cart. Absent ids are ignored.
    pub fn remove_from_cart(&self, product_id: &str) {
        debug!(product_id, "remove_from_cart");
        self.mutate(|state| state.cart.remove_item(product_id));
    }

    /// Empties the cart. Drafts and user are untouched.
    pub fn clear_cart(&self) {
        debug!("clear_cart");
        self.mutate(|state| state.cart.clear());
    }

    // -------------------------------------------------------------------------
    // Checkout drafts
    // -------------------------------------------------------------------------

    /// Returns the payment draft, if one was chosen.
    pub fn payment(&self) -> Option<Payment> {
        self.state
            .lock()
            .expect("state mutex poisoned")
            .payment
            .clone()
    }

    /// Overwrites the payment draft. Card numbers were already masked by
    /// `Payment::card`; no cross-field validation happens here.
    pub fn set_payment(&self, payment: Payment) {
        debug!("set_payment");
        self.mutate(|state| state.payment = Some(payment));
    }

    /// Returns the address draft, if one was entered.
    pub fn address(&self) -> Option<Address> {
        self.state
            .lock()
            .expect("state mutex poisoned")
            .address
            .clone()
    }

    /// Overwrites the address draft.
    pub fn set_address(&self, address: Address) {
        debug!("set_address");
        self.mutate(|state| state.address = Some(address));
    }

    /// Returns the selected shipping option, if any.
    pub fn shipping(&self) -> Option<ShippingOption> {
        self.state
            .lock()
            .expect("state mutex poisoned")
            .shipping_opt
            .clone()
    }

    /// Overwrites the shipping selection.
    ///
    /// The option was priced for the address state by the shipping rate
    /// table; this layer just records the choice.
    pub fn set_shipping(&self, option: ShippingOption) {
        debug!(tier = %option.id, "set_shipping");
        self.mutate(|state| state.shipping_opt = Some(option));
    }

    /// Clears payment, address and shipping drafts, leaving cart and user
    /// untouched. Used after an order completes or to restart checkout.
    pub fn reset_checkout(&self) {
        debug!("reset_checkout");
        self.mutate(|state| {
            state.payment = None;
            state.address = None;
            state.shipping_opt = None;
        });
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    /// Saves a confirmed order into the single "last order" slot,
    /// overwriting any previous one. Order history is not retained.
    pub fn save_order(&self, order: Order) {
        debug!(order_id = %order.id, "save_order");
        {
            let mut state = self.state.lock().expect("state mutex poisoned");
            self.storage.set(keys::LAST_ORDER, &order);
            state.last_order = Some(order);
        }
        self.notify();
    }

    /// Returns the last completed order, if any.
    pub fn last_order(&self) -> Option<Order> {
        self.state
            .lock()
            .expect("state mutex poisoned")
            .last_order
            .clone()
    }

    // -------------------------------------------------------------------------
    // Projections and gating
    // -------------------------------------------------------------------------

    /// Derives the checkout totals from the current cart and shipping
    /// selection. A pure projection - never persisted on its own.
    pub fn totals(&self) -> Totals {
        let state = self.state.lock().expect("state mutex poisoned");
        Totals::project(
            Money::from_cents(state.cart.subtotal_cents()),
            state.shipping_opt.as_ref(),
            TaxRate::from_bps(TAX_RATE_BPS),
        )
    }

    /// Whether the checkout flow may be entered at all.
    ///
    /// Session gating policy: checkout requires an authenticated user; the
    /// views send anonymous sessions to login first.
    pub fn can_checkout(&self) -> bool {
        self.state
            .lock()
            .expect("state mutex poisoned")
            .user
            .is_some()
    }

    /// Demotes a requested checkout step to the first incomplete
    /// prerequisite.
    ///
    /// - No payment draft: back to [`CheckoutStep::Payment`]
    /// - No complete address: back to [`CheckoutStep::Address`]
    ///
    /// The stepper calls this before rendering, so deep links and stale
    /// navigation cannot skip a gate.
    pub fn checkout_step(&self, requested: CheckoutStep) -> CheckoutStep {
        let state = self.state.lock().expect("state mutex poisoned");

        if requested >= CheckoutStep::Address && state.payment.is_none() {
            return CheckoutStep::Payment;
        }

        let address_complete = state
            .address
            .as_ref()
            .map(Address::is_complete)
            .unwrap_or(false);
        if requested >= CheckoutStep::Review && !address_complete {
            return CheckoutStep::Address;
        }

        requested
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StorageError, StorageResult};
    use crate::storage::MemoryBackend;
    use std::sync::atomic::AtomicUsize;

    fn test_product(id: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Producto {}", id),
            price_cents,
            stock,
            category: "pruebas".to_string(),
            rating: 4.2,
            img: format!("img/{}.webp", id),
            ships_from: "CDMX".to_string(),
        }
    }

    fn test_user() -> User {
        User {
            id: "1700000000000".to_string(),
            email: "ana@example.com".to_string(),
            name: "ana".to_string(),
        }
    }

    fn full_address() -> Address {
        Address {
            name: "Ana Torres".to_string(),
            phone: "5512345678".to_string(),
            street: "Av. Reforma".to_string(),
            ext: "123".to_string(),
            suburb: "Juárez".to_string(),
            zip: "06600".to_string(),
            city: "Ciudad de México".to_string(),
            state: "CDMX".to_string(),
        }
    }

    fn shipping_option(cost_cents: i64) -> ShippingOption {
        ShippingOption {
            id: "Exprés".to_string(),
            label: "Exprés".to_string(),
            eta_days: 1,
            cost_cents,
        }
    }

    fn fresh_store() -> StateStore {
        StateStore::new(MemoryBackend::new())
    }

    #[test]
    fn test_fresh_store_is_empty() {
        let store = fresh_store();
        assert!(store.user().is_none());
        assert!(store.cart().is_empty());
        assert!(store.payment().is_none());
        assert!(store.address().is_none());
        assert!(store.shipping().is_none());
        assert!(store.last_order().is_none());
    }

    #[test]
    fn test_add_to_cart_clamps_and_caps() {
        let store = fresh_store();
        let product = test_product("p1", 1000, 5);

        let update = store.add_to_cart(&product, 50);

        let cart = store.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].quantity, 5);
        assert_eq!(cart[0].subtotal_cents, 5000);
        assert!(update.clamped);
    }

    #[test]
    fn test_add_twice_accumulates_one_line() {
        let store = fresh_store();
        let product = test_product("p1", 1000, 10);

        store.add_to_cart(&product, 3);
        store.add_to_cart(&product, 4);

        let cart = store.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].quantity, 7);
        assert_eq!(cart[0].subtotal_cents, 7000);
    }

    #[test]
    fn test_update_qty_unknown_id_is_silent_noop() {
        let store = fresh_store();
        store.add_to_cart(&test_product("p1", 1000, 10), 2);

        let notified = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&notified);
        let sub = store.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(store.update_qty("missing", 5, None).is_none());

        // Cart unchanged, nothing notified
        assert_eq!(store.cart()[0].quantity, 2);
        assert_eq!(notified.load(Ordering::SeqCst), 0);
        store.unsubscribe(sub);
    }

    #[test]
    fn test_update_qty_clamps_and_recomputes() {
        let store = fresh_store();
        store.add_to_cart(&test_product("p1", 250, 0), 2);

        let update = store.update_qty("p1", 5000, None).unwrap();
        assert_eq!(update.line_quantity, 999);
        assert!(update.clamped);
        assert_eq!(store.cart()[0].subtotal_cents, 250 * 999);
    }

    #[test]
    fn test_remove_from_cart() {
        let store = fresh_store();
        store.add_to_cart(&test_product("p1", 1000, 10), 1);
        store.add_to_cart(&test_product("p2", 2000, 10), 1);

        // Absent id leaves the cart unchanged
        store.remove_from_cart("missing");
        assert_eq!(store.cart().len(), 2);

        // Existing id removes exactly that line
        store.remove_from_cart("p1");
        let cart = store.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].product_id, "p2");
    }

    #[test]
    fn test_clear_cart() {
        let store = fresh_store();
        store.add_to_cart(&test_product("p1", 1000, 10), 3);

        store.clear_cart();

        assert!(store.cart().is_empty());
        assert_eq!(store.totals().subtotal_cents, 0);
    }

    #[test]
    fn test_cart_reads_are_copies() {
        let store = fresh_store();
        store.add_to_cart(&test_product("p1", 1000, 10), 2);

        let mut copy = store.cart();
        copy[0].quantity = 500;
        copy[0].subtotal_cents = 0;

        // Internal state untouched
        assert_eq!(store.cart()[0].quantity, 2);
        assert_eq!(store.cart()[0].subtotal_cents, 2000);
    }

    #[test]
    fn test_totals_projection() {
        let store = fresh_store();
        store.add_to_cart(&test_product("p1", 1000, 10), 1);

        // subtotal=1000 → taxes=160, shipping=0, total=1160
        let totals = store.totals();
        assert_eq!(totals.subtotal_cents, 1000);
        assert_eq!(totals.taxes_cents, 160);
        assert_eq!(totals.shipping_cents, 0);
        assert_eq!(totals.total_cents, 1160);

        // with shipping cost=100 → total=1260
        store.set_shipping(shipping_option(100));
        assert_eq!(store.totals().total_cents, 1260);
    }

    #[test]
    fn test_round_trip_rehydration() {
        let backend = Arc::new(MemoryBackend::new());
        {
            let store = StateStore::new(Arc::clone(&backend));
            store.set_user(test_user());
            store.add_to_cart(&test_product("p1", 100, 10), 5);
            store.set_payment(Payment::transfer("SPEI-1"));
            store.set_address(full_address());
            store.set_shipping(shipping_option(9900));
        }

        let reloaded = StateStore::new(backend);
        assert_eq!(reloaded.user(), Some(test_user()));
        let cart = reloaded.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].quantity, 5);
        assert_eq!(cart[0].subtotal_cents, 500); // invariant re-applied from storage
        assert_eq!(reloaded.payment(), Some(Payment::transfer("SPEI-1")));
        assert_eq!(reloaded.address(), Some(full_address()));
        assert_eq!(reloaded.shipping(), Some(shipping_option(9900)));
    }

    #[test]
    fn test_hydration_repairs_out_of_range_quantities() {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .set(
                keys::CART,
                r#"[{"productId":"p1","name":"Producto p1","unitPriceCents":100,"quantity":5000,"subtotalCents":1}]"#,
            )
            .unwrap();

        let store = StateStore::new(backend);
        let cart = store.cart();
        assert_eq!(cart[0].quantity, 999);
        assert_eq!(cart[0].subtotal_cents, 99_900);
    }

    #[test]
    fn test_hydration_treats_corrupt_cart_as_empty() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set(keys::CART, "{{{{not json").unwrap();
        backend.set(keys::USER, "also not json").unwrap();

        let store = StateStore::new(backend);
        assert!(store.cart().is_empty());
        assert!(store.user().is_none());
    }

    #[test]
    fn test_mutations_survive_a_dead_backend() {
        /// Backend that fails every operation.
        struct FailingBackend;

        impl KvBackend for FailingBackend {
            fn get(&self, _key: &str) -> StorageResult<Option<String>> {
                Err(StorageError::Poisoned)
            }

            fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
                Err(StorageError::Poisoned)
            }

            fn remove(&self, _key: &str) -> StorageResult<()> {
                Err(StorageError::Poisoned)
            }
        }

        let store = StateStore::new(FailingBackend);

        // In-memory state stays authoritative even though nothing persists
        let update = store.add_to_cart(&test_product("p1", 1000, 10), 2);
        assert_eq!(update.line_quantity, 2);
        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.totals().subtotal_cents, 2000);
    }

    #[test]
    fn test_subscriber_fan_out_in_registration_order() {
        let store = fresh_store();
        let calls: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

        let first_calls = Arc::clone(&calls);
        let first = store.subscribe(move || first_calls.lock().unwrap().push("badge"));
        let second_calls = Arc::clone(&calls);
        let _second = store.subscribe(move || second_calls.lock().unwrap().push("page"));

        store.set_user(test_user());
        assert_eq!(*calls.lock().unwrap(), vec!["badge", "page"]);

        calls.lock().unwrap().clear();
        store.unsubscribe(first);
        store.clear_user();
        assert_eq!(*calls.lock().unwrap(), vec!["page"]);
    }

    #[test]
    fn test_every_mutating_operation_notifies() {
        let store = fresh_store();
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&notified);
        store.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let product = test_product("p1", 1000, 10);
        store.set_user(test_user()); // 1
        store.add_to_cart(&product, 1); // 2
        let _ = store.update_qty("p1", 2, None); // 3
        store.remove_from_cart("p1"); // 4
        store.clear_cart(); // 5
        store.set_payment(Payment::transfer("SPEI-1")); // 6
        store.set_address(full_address()); // 7
        store.set_shipping(shipping_option(100)); // 8
        store.reset_checkout(); // 9
        store.clear_user(); // 10

        assert_eq!(notified.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_listeners_may_reread_the_store() {
        let store = Arc::new(fresh_store());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let reader = Arc::clone(&store);
        let seen_in = Arc::clone(&seen);
        store.subscribe(move || {
            // The state lock is released before notification, so re-reading
            // is safe and observes the already-applied mutation.
            seen_in.lock().unwrap().push(reader.totals().subtotal_cents);
        });

        store.add_to_cart(&test_product("p1", 1000, 10), 1);
        store.add_to_cart(&test_product("p1", 1000, 10), 1);

        assert_eq!(*seen.lock().unwrap(), vec![1000, 2000]);
    }

    #[test]
    fn test_panicking_subscriber_is_isolated() {
        let store = fresh_store();
        let notified = Arc::new(AtomicUsize::new(0));

        store.subscribe(|| panic!("broken badge widget"));
        let counter = Arc::clone(&notified);
        store.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        // The mutation completes and the second listener still runs
        store.set_user(test_user());
        assert_eq!(notified.load(Ordering::SeqCst), 1);
        assert_eq!(store.user(), Some(test_user()));
    }

    #[test]
    fn test_reset_checkout_leaves_cart_and_user() {
        let store = fresh_store();
        store.set_user(test_user());
        store.add_to_cart(&test_product("p1", 1000, 10), 2);
        store.set_payment(Payment::card("4539578763621486", "ANA TORRES"));
        store.set_address(full_address());
        store.set_shipping(shipping_option(100));

        store.reset_checkout();

        assert!(store.payment().is_none());
        assert!(store.address().is_none());
        assert!(store.shipping().is_none());
        assert_eq!(store.user(), Some(test_user()));
        assert_eq!(store.cart().len(), 1);
    }

    #[test]
    fn test_save_order_overwrites_single_slot_and_survives_restart() {
        let backend = Arc::new(MemoryBackend::new());
        let store = StateStore::new(Arc::clone(&backend));

        store.add_to_cart(&test_product("p1", 1000, 10), 1);
        let first = Order::compose(
            store.cart(),
            store.totals(),
            full_address(),
            shipping_option(100),
            Payment::transfer("SPEI-1"),
        );
        store.save_order(first.clone());
        assert_eq!(store.last_order(), Some(first.clone()));

        let mut second = first.clone();
        second.id = "9999999999999".to_string();
        store.save_order(second.clone());
        assert_eq!(store.last_order(), Some(second.clone()));

        // Only the most recent order survives a restart
        let reloaded = StateStore::new(backend);
        assert_eq!(reloaded.last_order(), Some(second));
    }

    #[test]
    fn test_order_snapshot_outlives_cart_clear() {
        let store = fresh_store();
        store.add_to_cart(&test_product("p1", 1000, 10), 2);

        let order = Order::compose(
            store.cart(),
            store.totals(),
            full_address(),
            shipping_option(100),
            Payment::transfer("SPEI-1"),
        );
        store.save_order(order);

        // Confirmation flow: cart cleared, drafts reset
        store.clear_cart();
        store.reset_checkout();

        let receipt = store.last_order().unwrap();
        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].quantity, 2);
    }

    #[test]
    fn test_session_gating_requires_login() {
        let store = fresh_store();
        assert!(!store.can_checkout());

        store.set_user(test_user());
        assert!(store.can_checkout());

        store.clear_user();
        assert!(!store.can_checkout());
    }

    #[test]
    fn test_checkout_step_gating() {
        let store = fresh_store();

        // Nothing drafted: everything demotes to Payment
        assert_eq!(store.checkout_step(CheckoutStep::Review), CheckoutStep::Payment);
        assert_eq!(store.checkout_step(CheckoutStep::Address), CheckoutStep::Payment);
        assert_eq!(store.checkout_step(CheckoutStep::Payment), CheckoutStep::Payment);

        // Payment drafted: Review still demotes to Address
        store.set_payment(Payment::transfer("SPEI-1"));
        assert_eq!(store.checkout_step(CheckoutStep::Address), CheckoutStep::Address);
        assert_eq!(store.checkout_step(CheckoutStep::Review), CheckoutStep::Address);

        // Incomplete address does not open Review
        let mut partial = full_address();
        partial.zip = String::new();
        store.set_address(partial);
        assert_eq!(store.checkout_step(CheckoutStep::Review), CheckoutStep::Address);

        // Complete address opens Review
        store.set_address(full_address());
        assert_eq!(store.checkout_step(CheckoutStep::Review), CheckoutStep::Review);
    }
}
