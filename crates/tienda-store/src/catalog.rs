//! # Catalog Data Source
//!
//! The read-only external data the storefront consumes: the product catalog
//! and the shipping rate table. Both are fetched once per session and
//! treated as immutable thereafter; the state store never writes them.
//!
//! ## Shipping Rate Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                How Shipping Quotes Work                                 │
//! │                                                                         │
//! │  Address step picks a state ────┐                                      │
//! │  Shopper picks a tier ──────────┤                                      │
//! │                                 ▼                                      │
//! │  rates["Jalisco"]["Exprés"] = { cost_cents: 19900, eta_days: 1 }       │
//! │                                 │                                      │
//! │                                 ▼                                      │
//! │  ShippingOption { id: "Exprés", cost_cents: 19900, eta_days: 1 }       │
//! │  frozen into the checkout draft (and later the order snapshot)         │
//! │                                                                         │
//! │  Cost and ETA depend on the destination state, which is why the        │
//! │  shipping choice lives inside the address step.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tienda_core::checkout::ShippingOption;
use tienda_core::types::Product;

use crate::error::CatalogResult;

// =============================================================================
// Product Catalog
// =============================================================================

/// The product catalog, loaded once per session.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Parses a catalog from its JSON document (an array of products).
    pub fn from_json(raw: &str) -> CatalogResult<Self> {
        let products: Vec<Product> = serde_json::from_str(raw)?;
        debug!(count = products.len(), "catalog loaded");
        Ok(Catalog { products })
    }

    /// Loads a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// All products, in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Looks up a product by id.
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products in a category, in catalog order.
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> {
        self.products.iter().filter(move |p| p.category == category)
    }

    /// Distinct categories, sorted (for the listing filter).
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.products.iter().map(|p| p.category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// =============================================================================
// Shipping Rates
// =============================================================================

/// One entry of the rate table: what a tier costs to a state, and how long
/// it takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingQuote {
    /// Shipping cost in centavos.
    pub cost_cents: i64,

    /// Estimated delivery time in days.
    pub eta_days: u32,
}

/// The shipping rate table: destination state → tier → quote.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShippingRates {
    rates: BTreeMap<String, BTreeMap<String, ShippingQuote>>,
}

impl ShippingRates {
    /// Parses the rate table from its JSON document.
    pub fn from_json(raw: &str) -> CatalogResult<Self> {
        let rates: Self = serde_json::from_str(raw)?;
        debug!(states = rates.rates.len(), "shipping rates loaded");
        Ok(rates)
    }

    /// Loads the rate table from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Destination states with rates, sorted (feeds the address form's
    /// state selector).
    pub fn states(&self) -> Vec<&str> {
        self.rates.keys().map(String::as_str).collect()
    }

    /// Tiers offered to a state, sorted. Empty for unknown states.
    pub fn tiers(&self, state: &str) -> Vec<&str> {
        self.rates
            .get(state)
            .map(|tiers| tiers.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Looks up the quote for a state and tier.
    pub fn quote(&self, state: &str, tier: &str) -> Option<&ShippingQuote> {
        self.rates.get(state)?.get(tier)
    }

    /// Builds the shipping option a shopper selected: the tier name becomes
    /// id and label, cost and ETA come from the quote.
    ///
    /// Returns `None` when the state or tier is unknown - the address form
    /// only offers combinations present in the table, so a miss means a
    /// stale or tampered request.
    pub fn option_for(&self, state: &str, tier: &str) -> Option<ShippingOption> {
        let quote = self.quote(state, tier)?;
        Some(ShippingOption {
            id: tier.to_string(),
            label: tier.to_string(),
            eta_days: quote.eta_days,
            cost_cents: quote.cost_cents,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;

    const CATALOG_JSON: &str = r#"[
        {
            "id": "p1",
            "name": "Teclado mecánico",
            "priceCents": 129900,
            "stock": 10,
            "category": "accesorios",
            "rating": 4.5,
            "img": "img/teclado.webp",
            "shipsFrom": "CDMX"
        },
        {
            "id": "p2",
            "name": "Monitor 27\"",
            "priceCents": 549900,
            "stock": 4,
            "category": "pantallas",
            "rating": 4.8,
            "img": "img/monitor.webp",
            "shipsFrom": "Jalisco"
        },
        {
            "id": "p3",
            "name": "Mouse inalámbrico",
            "priceCents": 49900,
            "stock": 0,
            "category": "accesorios",
            "rating": 4.1,
            "img": "img/mouse.webp",
            "shipsFrom": "CDMX"
        }
    ]"#;

    const RATES_JSON: &str = r#"{
        "CDMX": {
            "Económico": { "costCents": 5900, "etaDays": 5 },
            "Estándar": { "costCents": 9900, "etaDays": 3 },
            "Exprés": { "costCents": 19900, "etaDays": 1 }
        },
        "Jalisco": {
            "Económico": { "costCents": 7900, "etaDays": 6 },
            "Exprés": { "costCents": 24900, "etaDays": 2 }
        }
    }"#;

    #[test]
    fn test_catalog_parse_and_find() {
        let catalog = Catalog::from_json(CATALOG_JSON).unwrap();
        assert_eq!(catalog.len(), 3);

        let monitor = catalog.find("p2").unwrap();
        assert_eq!(monitor.price_cents, 549_900);
        assert_eq!(monitor.stock, 4);

        assert!(catalog.find("missing").is_none());
    }

    #[test]
    fn test_catalog_categories() {
        let catalog = Catalog::from_json(CATALOG_JSON).unwrap();
        assert_eq!(catalog.categories(), vec!["accesorios", "pantallas"]);
        assert_eq!(catalog.by_category("accesorios").count(), 2);
        assert_eq!(catalog.by_category("nada").count(), 0);
    }

    #[test]
    fn test_catalog_malformed_json() {
        assert!(matches!(
            Catalog::from_json("{not json"),
            Err(CatalogError::Malformed(_))
        ));
    }

    #[test]
    fn test_catalog_missing_file() {
        assert!(matches!(
            Catalog::load("/definitely/not/here.json"),
            Err(CatalogError::Io(_))
        ));
    }

    #[test]
    fn test_catalog_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("productos.json");
        std::fs::write(&path, CATALOG_JSON).unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_rates_quote_lookup() {
        let rates = ShippingRates::from_json(RATES_JSON).unwrap();

        let quote = rates.quote("CDMX", "Exprés").unwrap();
        assert_eq!(quote.cost_cents, 19_900);
        assert_eq!(quote.eta_days, 1);

        assert!(rates.quote("CDMX", "Dron").is_none());
        assert!(rates.quote("Marte", "Exprés").is_none());
    }

    #[test]
    fn test_rates_states_and_tiers() {
        let rates = ShippingRates::from_json(RATES_JSON).unwrap();
        assert_eq!(rates.states(), vec!["CDMX", "Jalisco"]);
        assert_eq!(rates.tiers("Jalisco"), vec!["Económico", "Exprés"]);
        assert!(rates.tiers("Marte").is_empty());
    }

    #[test]
    fn test_rates_build_shipping_option() {
        let rates = ShippingRates::from_json(RATES_JSON).unwrap();

        let option = rates.option_for("Jalisco", "Exprés").unwrap();
        assert_eq!(option.id, "Exprés");
        assert_eq!(option.label, "Exprés");
        assert_eq!(option.cost_cents, 24_900);
        assert_eq!(option.eta_days, 2);

        assert!(rates.option_for("Jalisco", "Dron").is_none());
    }
}
