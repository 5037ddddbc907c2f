//! # Totals Aggregator
//!
//! Derives cart totals on demand: the anchor-currency total, the
//! local-currency convenience total, and one total per currency known to
//! the registry.
//!
//! ## Per-Currency Column Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  by_currency[C] = Σ over lines of  subtotal_usd × rate_to_use(line, C)  │
//! │                                                                         │
//! │  rate_to_use(line, C):                                                  │
//! │    line's own bound rate   if the binding's currency is C               │
//! │    registry default for C  otherwise, when one exists                   │
//! │    1                       otherwise (the anchor currency itself)       │
//! │                                                                         │
//! │  A cart mixing BCV-priced and Paralelo-priced lines still collapses     │
//! │  into one coherent VES figure: each line contributes at its own rate.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::cart::{Cart, CartLine};
use crate::money::convert_at;
use crate::rates::RateRegistry;

/// Cart totals summary for display and tender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    /// Anchor-currency total: exact sum of line `subtotal_usd`s,
    /// independent of any rate.
    #[ts(as = "String")]
    pub usd: Decimal,

    /// Local-currency convenience total: sum of line `subtotal_bs`es.
    #[ts(as = "String")]
    pub bs_primary: Decimal,

    /// One total per currency with at least one active registry rate.
    #[ts(as = "BTreeMap<String, String>")]
    pub by_currency: BTreeMap<String, Decimal>,
}

impl CartTotals {
    /// Computes totals for the cart against the current registry
    /// snapshot. An empty cart yields zeros; an empty registry yields an
    /// empty `by_currency` map.
    pub fn compute(cart: &Cart, registry: &RateRegistry) -> Self {
        let usd: Decimal = cart.lines().iter().map(|l| l.subtotal_usd).sum();
        let bs_primary: Decimal = cart.lines().iter().map(|l| l.subtotal_bs).sum();

        let mut by_currency = BTreeMap::new();
        for code in registry.active_currency_codes() {
            let total: Decimal = cart
                .lines()
                .iter()
                .map(|line| convert_at(line.subtotal_usd, rate_to_use(line, code, registry)))
                .sum();
            by_currency.insert(code.to_string(), total);
        }

        CartTotals {
            usd,
            bs_primary,
            by_currency,
        }
    }
}

/// The rate a line contributes at for a given currency column.
fn rate_to_use(line: &CartLine, currency_code: &str, registry: &RateRegistry) -> Decimal {
    if line.exchange_rate_currency.as_deref() == Some(currency_code) {
        return line.exchange_rate;
    }
    match registry.default_for(currency_code) {
        Some(rate) => rate.rate_value,
        // Only reachable for the anchor currency (implicit rate 1).
        None => Decimal::ONE,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExchangeRate, Product, SaleUnit};
    use rust_decimal_macros::dec;

    fn rate(id: &str, code: &str, name: &str, value: Decimal, default: bool) -> ExchangeRate {
        ExchangeRate {
            id: id.to_string(),
            currency_code: code.to_string(),
            name: name.to_string(),
            rate_value: value,
            is_default: default,
            is_active: true,
        }
    }

    fn registry() -> RateRegistry {
        RateRegistry::from_snapshot(vec![
            rate("r-bcv", "VES", "BCV", dec!(40), true),
            rate("r-par", "VES", "Paralelo", dec!(45), false),
            rate("r-eur", "EUR", "EUR", dec!(0.90), true),
        ])
    }

    fn product(id: &str, price: Decimal) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            sku: format!("SKU-{}", id),
            price_usd: price,
            exchange_rate_id: None,
            is_serialized: false,
        }
    }

    fn unidad() -> SaleUnit {
        SaleUnit {
            name: "Unidad".to_string(),
            price_usd: None,
            conversion_factor: dec!(1),
            exchange_rate_id: None,
            exchange_rate_name: None,
        }
    }

    #[test]
    fn test_empty_cart_yields_zero_totals() {
        let totals = CartTotals::compute(&Cart::new("VES"), &registry());
        assert_eq!(totals.usd, Decimal::ZERO);
        assert_eq!(totals.bs_primary, Decimal::ZERO);
        assert_eq!(totals.by_currency.get("VES"), Some(&Decimal::ZERO));
        assert_eq!(totals.by_currency.len(), 2);
    }

    #[test]
    fn test_empty_registry_yields_no_currencies() {
        let totals = CartTotals::compute(&Cart::new("VES"), &RateRegistry::new());
        assert_eq!(totals.usd, Decimal::ZERO);
        assert!(totals.by_currency.is_empty());
    }

    #[test]
    fn test_usd_total_is_exact_sum() {
        let reg = registry();
        let mut cart = Cart::new("VES");
        cart.add_item(&product("1", dec!(10)), &unidad(), None, &reg)
            .unwrap();
        cart.add_item(&product("2", dec!(2.49)), &unidad(), None, &reg)
            .unwrap();

        let totals = CartTotals::compute(&cart, &reg);
        assert_eq!(totals.usd, dec!(12.49));
        assert_eq!(totals.bs_primary, dec!(499.60));
    }

    #[test]
    fn test_mixed_rate_lines_collapse_per_currency() {
        let reg = registry();
        let mut cart = Cart::new("VES");
        // line 1: default rate 40
        cart.add_item(&product("1", dec!(10)), &unidad(), None, &reg)
            .unwrap();
        // line 2: special Paralelo rate 45
        let special = SaleUnit {
            exchange_rate_id: Some("r-par".to_string()),
            ..unidad()
        };
        cart.add_item(&product("2", dec!(20)), &special, None, &reg)
            .unwrap();

        let totals = CartTotals::compute(&cart, &reg);
        // VES: 10×40 + 20×45 (each line at its own VES rate)
        assert_eq!(totals.by_currency.get("VES"), Some(&dec!(1300.00)));
        // EUR: neither line is EUR-bound, both convert at the EUR default
        assert_eq!(totals.by_currency.get("EUR"), Some(&dec!(27.00)));
        assert_eq!(totals.usd, dec!(30.00));
    }

    #[test]
    fn test_stale_special_rate_still_attributed_to_its_currency() {
        let reg = registry();
        let mut cart = Cart::new("VES");
        let special = SaleUnit {
            exchange_rate_id: Some("r-par".to_string()),
            ..unidad()
        };
        cart.add_item(&product("1", dec!(10)), &special, None, &reg)
            .unwrap();

        // Paralelo retired; the line goes stale at 45
        let pruned = RateRegistry::from_snapshot(vec![rate("r-bcv", "VES", "BCV", dec!(42), true)]);
        cart.apply_rates(&pruned);
        assert!(cart.lines()[0].rate_stale);

        let totals = CartTotals::compute(&cart, &pruned);
        // The captured binding currency keeps the line at its stale 45,
        // not the new default 42.
        assert_eq!(totals.by_currency.get("VES"), Some(&dec!(450.00)));
    }

    #[test]
    fn test_anchor_currency_column_uses_rate_one() {
        let reg = RateRegistry::from_snapshot(vec![
            rate("r-bcv", "VES", "BCV", dec!(40), true),
            // a USD entry with no default (e.g. a cash-discount rate)
            rate("r-usd-cash", "USD", "Efectivo", dec!(0.95), false),
        ]);
        let mut cart = Cart::new("VES");
        cart.add_item(&product("1", dec!(10)), &unidad(), None, &reg)
            .unwrap();

        let totals = CartTotals::compute(&cart, &reg);
        // No USD default and the line is VES-bound: implicit rate 1
        assert_eq!(totals.by_currency.get("USD"), Some(&dec!(10.00)));
    }

    #[test]
    fn test_removal_drops_total_by_line_subtotal() {
        let reg = registry();
        let mut cart = Cart::new("VES");
        let key = cart
            .add_item(&product("1", dec!(10)), &unidad(), None, &reg)
            .unwrap()
            .key
            .clone();
        cart.add_item(&product("2", dec!(5)), &unidad(), None, &reg)
            .unwrap();

        let before = CartTotals::compute(&cart, &reg);
        cart.update_quantity(&key, Decimal::ZERO);
        let after = CartTotals::compute(&cart, &reg);

        assert_eq!(before.usd - after.usd, dec!(10.00));
    }
}
