//! # Cart Aggregate
//!
//! The ordered collection of cart lines, the mutations on it, and the
//! re-pricing pass that runs when the rate table changes.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Host Action              Operation                Cart Change          │
//! │  ───────────              ─────────                ───────────          │
//! │                                                                         │
//! │  Scan/click product ────► add_item() ────────────► merge or append     │
//! │                                                                         │
//! │  Edit quantity ─────────► update_quantity() ─────► recompute subtotals │
//! │                                                                         │
//! │  Assign salesperson ────► update_line() ─────────► metadata only       │
//! │                                                                         │
//! │  Remove / clear ────────► remove_item() / clear()                      │
//! │                                                                         │
//! │  Rates refreshed ───────► apply_rates() ─────────► re-price every line │
//! │                                                                         │
//! │  INVARIANT: after every one of these,                                   │
//! │     subtotal_usd == round(quantity × unit_price_usd)                    │
//! │     subtotal_bs  == round(subtotal_usd × exchange_rate)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{convert_at, line_subtotal};
use crate::rates::{resolve, RateRegistry, ResolvedRate};
use crate::types::{LineKey, LinePatch, Product, RateSource, SaleUnit};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One row of the cart: a product sold in a specific presentation at a
/// specific quantity and resolved rate.
///
/// ## Design Notes
/// - Pricing fields are frozen at add time (snapshot pattern): a product
///   price change in the catalog does not touch lines already in the cart.
/// - The rate binding is NOT frozen: `apply_rates` tracks the bound
///   registry entry across snapshots and re-prices `subtotal_bs`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    /// Cart-unique identity (product + presentation, or serial).
    pub key: LineKey,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// SKU at time of adding (frozen).
    pub sku: String,

    /// Quantity of the unit. Fractional for weighed goods.
    #[ts(as = "String")]
    pub quantity: Decimal,

    /// USD price for one unit at time of adding (frozen).
    #[ts(as = "String")]
    pub unit_price_usd: Decimal,

    /// Base units per one of this unit (frozen).
    #[ts(as = "String")]
    pub conversion_factor: Decimal,

    /// `quantity × unit_price_usd`, rounded to money precision.
    #[ts(as = "String")]
    pub subtotal_usd: Decimal,

    /// Numeric exchange rate currently in effect for this line.
    #[ts(as = "String")]
    pub exchange_rate: Decimal,

    /// Registry entry the binding tracks; `None` only for fallback.
    pub exchange_rate_id: Option<String>,

    /// Display name of the bound rate.
    pub exchange_rate_name: Option<String>,

    /// Currency of the bound rate, captured at bind time.
    pub exchange_rate_currency: Option<String>,

    /// Which hierarchy step produced the binding.
    pub rate_source: RateSource,

    /// True iff the bound rate is not its currency's default.
    pub is_special_rate: bool,

    /// Set when a registry refresh could not re-resolve the binding;
    /// the line keeps pricing at the last known rate until the host
    /// intervenes.
    pub rate_stale: bool,

    /// `subtotal_usd × exchange_rate`, rounded to money precision.
    #[ts(as = "String")]
    pub subtotal_bs: Decimal,

    /// Salesperson credited with the line.
    pub salesperson_id: Option<String>,

    /// Technician assigned (service/repair lines).
    pub technician_id: Option<String>,

    /// Line discount in basis points, applied by the host at tender.
    pub discount_bps: Option<u32>,

    /// Stock level observed when the line was added.
    #[ts(as = "Option<String>")]
    pub stock_snapshot: Option<Decimal>,

    /// Scanned serial numbers for serialized lines.
    pub serials: Vec<String>,

    /// When this line was added to the cart.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a line for one unit of a product with a freshly resolved
    /// rate binding.
    fn new(key: LineKey, product: &Product, unit: &SaleUnit, resolved: ResolvedRate) -> Self {
        let mut line = CartLine {
            key,
            name: product.name.clone(),
            sku: product.sku.clone(),
            quantity: Decimal::ONE,
            unit_price_usd: unit.unit_price(product),
            conversion_factor: unit.conversion_factor,
            subtotal_usd: Decimal::ZERO,
            exchange_rate: resolved.value,
            exchange_rate_id: resolved.id,
            exchange_rate_name: resolved.name,
            exchange_rate_currency: resolved.currency,
            rate_source: resolved.source,
            is_special_rate: resolved.is_special,
            rate_stale: false,
            subtotal_bs: Decimal::ZERO,
            salesperson_id: None,
            technician_id: None,
            discount_bps: None,
            stock_snapshot: None,
            serials: Vec::new(),
            added_at: Utc::now(),
        };
        line.recompute();
        line
    }

    /// Re-derives both subtotals from quantity, price, and rate.
    ///
    /// Every mutation path ends here, which is what keeps the
    /// consistency invariant from drifting.
    fn recompute(&mut self) {
        self.subtotal_usd = line_subtotal(self.unit_price_usd, self.quantity);
        self.subtotal_bs = convert_at(self.subtotal_usd, self.exchange_rate);
    }

    /// Adopts a new numeric rate, re-pricing only the local-currency
    /// subtotal. Rate changes never move the anchor-currency amount.
    fn adopt_rate(&mut self, value: Decimal) {
        if self.exchange_rate != value {
            self.exchange_rate = value;
            self.subtotal_bs = convert_at(self.subtotal_usd, self.exchange_rate);
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart aggregate: an ordered sequence of lines with unique keys.
///
/// ## Invariants
/// - Insertion order is preserved; no two lines share a `LineKey`.
/// - Subtotals are always recomputable from quantity × price × rate.
/// - At most [`MAX_CART_LINES`] lines; quantities capped at
///   [`MAX_LINE_QUANTITY`].
///
/// One cart per checkout session, single logical writer. Hosts that need
/// shared ownership wrap it in [`crate::session::SessionState`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    items: Vec<CartLine>,

    /// Currency used for `subtotal_bs` and default-rate resolution.
    local_currency: String,

    /// When the cart was created/last cleared.
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates an empty cart pricing its local subtotals in the given
    /// currency (the `bs` column).
    pub fn new(local_currency: impl Into<String>) -> Self {
        Cart {
            items: Vec::new(),
            local_currency: local_currency.into(),
            created_at: Utc::now(),
        }
    }

    /// Adds one unit of a product to the cart.
    ///
    /// ## Behavior
    /// - Existing key: quantity increments by one and subtotals
    ///   recompute. The existing rate binding is preserved - merging
    ///   never re-resolves.
    /// - New key: the rate is resolved through the hierarchy and a new
    ///   line is appended.
    /// - `serial` (serialized products) becomes the line identity, so
    ///   scanning two serials yields two lines.
    pub fn add_item(
        &mut self,
        product: &Product,
        unit: &SaleUnit,
        serial: Option<&str>,
        registry: &RateRegistry,
    ) -> CoreResult<&CartLine> {
        let key = match serial {
            Some(serial) => LineKey::for_serial(&product.id, serial),
            None => LineKey::for_unit(&product.id, &unit.name),
        };

        if let Some(pos) = self.items.iter().position(|i| i.key == key) {
            let item = &mut self.items[pos];
            let new_qty = item.quantity + Decimal::ONE;
            if new_qty > Decimal::from(MAX_LINE_QUANTITY) {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty.to_string(),
                    max: MAX_LINE_QUANTITY,
                });
            }
            item.quantity = new_qty;
            item.recompute();
            return Ok(&self.items[pos]);
        }

        if self.items.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        let resolved = resolve(product, unit, &self.local_currency, registry);
        let mut line = CartLine::new(key, product, unit, resolved);
        if let Some(serial) = serial {
            line.serials.push(serial.trim().to_string());
        }
        self.items.push(line);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Sets a line's quantity, recomputing its subtotals.
    ///
    /// ## Behavior
    /// - `quantity ≤ 0`: removes the line (negative input normalizes to
    ///   removal, never an error).
    /// - Above [`MAX_LINE_QUANTITY`]: clamps to the cap.
    /// - Unknown key: no-op. Callers only hold keys they got from the
    ///   cart, so an unknown key just means the line is already gone.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: Decimal) {
        if quantity <= Decimal::ZERO {
            self.remove_item(key);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.key == *key) {
            item.quantity = quantity.min(Decimal::from(MAX_LINE_QUANTITY));
            item.recompute();
        }
    }

    /// Removes a line unconditionally. No-op if absent.
    pub fn remove_item(&mut self, key: &LineKey) {
        self.items.retain(|i| i.key != *key);
    }

    /// Merges passthrough metadata into a line. No-op on unknown key.
    ///
    /// The patch type carries no pricing fields, so this cannot break
    /// the subtotal invariant.
    pub fn update_line(&mut self, key: &LineKey, patch: LinePatch) {
        if let Some(item) = self.items.iter_mut().find(|i| i.key == *key) {
            if let Some(salesperson_id) = patch.salesperson_id {
                item.salesperson_id = Some(salesperson_id);
            }
            if let Some(technician_id) = patch.technician_id {
                item.technician_id = Some(technician_id);
            }
            if let Some(discount_bps) = patch.discount_bps {
                item.discount_bps = Some(discount_bps);
            }
            if let Some(stock_snapshot) = patch.stock_snapshot {
                item.stock_snapshot = Some(stock_snapshot);
            }
            if let Some(serials) = patch.serials {
                item.serials = serials;
            }
        }
    }

    /// Empties the cart and restamps it (sale completed or reset).
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    // -------------------------------------------------------------------------
    // Recalculation Reactor
    // -------------------------------------------------------------------------

    /// Re-prices every line against a fresh registry snapshot.
    ///
    /// Per line, in order:
    /// 1. Bound id still active       → adopt its value, binding kept.
    /// 2. Bound name matches active   → adopt value, rebind the id.
    /// 3. Not a special rate          → adopt the currency default.
    /// 4. Nothing matched             → keep the last known rate and
    ///    mark the line stale. A special-rate line never silently
    ///    switches to the default - that would change its rate class.
    ///
    /// Only `subtotal_bs` moves; `subtotal_usd` is rate-independent.
    pub fn apply_rates(&mut self, registry: &RateRegistry) {
        for item in &mut self.items {
            if let Some(rate) = item
                .exchange_rate_id
                .as_deref()
                .and_then(|id| registry.get_active(id))
            {
                item.adopt_rate(rate.rate_value);
                item.rate_stale = false;
                continue;
            }

            if let Some(rate) = item
                .exchange_rate_name
                .as_deref()
                .and_then(|name| registry.active_by_name(name))
            {
                item.exchange_rate_id = Some(rate.id.clone());
                item.exchange_rate_currency = Some(rate.currency_code.clone());
                item.adopt_rate(rate.rate_value);
                item.rate_stale = false;
                continue;
            }

            if !item.is_special_rate {
                if let Some(rate) = registry.default_for(&self.local_currency) {
                    item.exchange_rate_id = Some(rate.id.clone());
                    item.exchange_rate_name = Some(rate.name.clone());
                    item.exchange_rate_currency = Some(rate.currency_code.clone());
                    item.rate_source = RateSource::Default;
                    item.adopt_rate(rate.rate_value);
                    item.rate_stale = false;
                    continue;
                }
            }

            // Stale-but-stable: price at the last known rate until the
            // host re-activates the entry or the cashier re-prices.
            item.rate_stale = true;
        }
    }

    // -------------------------------------------------------------------------
    // Read Accessors
    // -------------------------------------------------------------------------

    /// The ordered line list, for rendering.
    pub fn lines(&self) -> &[CartLine] {
        &self.items
    }

    /// Looks up a single line by key.
    pub fn get(&self, key: &LineKey) -> Option<&CartLine> {
        self.items.iter().find(|i| i.key == *key)
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> Decimal {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency the `bs` subtotals are expressed in.
    pub fn local_currency(&self) -> &str {
        &self.local_currency
    }

    /// When the cart was created/last cleared.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExchangeRate;
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
    fn test_add_resolves_default_rate() {
        // Scenario: $10 product, default VES rate 40
        let mut cart = Cart::new("VES");
        cart.add_item(&product("1", dec!(10)), &unidad(), None, &registry())
            .unwrap();

        let line = &cart.lines()[0];
        assert_eq!(line.subtotal_usd, dec!(10.00));
        assert_eq!(line.exchange_rate, dec!(40));
        assert_eq!(line.subtotal_bs, dec!(400.00));
        assert_eq!(line.rate_source, RateSource::Default);
        assert!(!line.is_special_rate);
    }

    #[test]
    fn test_add_same_key_merges_without_re_resolving() {
        let mut cart = Cart::new("VES");
        let p = product("1", dec!(10));
        cart.add_item(&p, &unidad(), None, &registry()).unwrap();

        // Registry default changes between the two adds
        let newer = RateRegistry::from_snapshot(vec![rate("r-bcv", "VES", "BCV", dec!(99), true)]);
        cart.add_item(&p, &unidad(), None, &newer).unwrap();

        assert_eq!(cart.line_count(), 1);
        let line = &cart.lines()[0];
        assert_eq!(line.quantity, dec!(2));
        // Binding preserved: still priced at the rate resolved on first add
        assert_eq!(line.exchange_rate, dec!(40));
        assert_eq!(line.subtotal_bs, dec!(800.00));
    }

    #[test]
    fn test_serialized_adds_do_not_merge() {
        let mut cart = Cart::new("VES");
        let mut p = product("1", dec!(150));
        p.is_serialized = true;

        cart.add_item(&p, &unidad(), Some("IMEI-111"), &registry())
            .unwrap();
        cart.add_item(&p, &unidad(), Some("IMEI-222"), &registry())
            .unwrap();

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.lines()[0].serials, vec!["IMEI-111"]);
        assert_eq!(cart.lines()[1].quantity, dec!(1));
    }

    #[test]
    fn test_update_quantity_recomputes_subtotals() {
        let mut cart = Cart::new("VES");
        let line = cart
            .add_item(&product("1", dec!(2.50)), &unidad(), None, &registry())
            .unwrap();
        let key = line.key.clone();

        cart.update_quantity(&key, dec!(4));
        let line = cart.get(&key).unwrap();
        assert_eq!(line.subtotal_usd, dec!(10.00));
        assert_eq!(line.subtotal_bs, dec!(400.00));
    }

    #[test]
    fn test_update_quantity_is_idempotent() {
        let mut cart = Cart::new("VES");
        let key = cart
            .add_item(&product("1", dec!(3)), &unidad(), None, &registry())
            .unwrap()
            .key
            .clone();

        cart.update_quantity(&key, dec!(7));
        let once = cart.get(&key).unwrap().clone();
        cart.update_quantity(&key, dec!(7));
        let twice = cart.get(&key).unwrap();

        assert_eq!(once.quantity, twice.quantity);
        assert_eq!(once.subtotal_usd, twice.subtotal_usd);
        assert_eq!(once.subtotal_bs, twice.subtotal_bs);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = Cart::new("VES");
        let key = cart
            .add_item(&product("1", dec!(3)), &unidad(), None, &registry())
            .unwrap()
            .key
            .clone();

        cart.update_quantity(&key, Decimal::ZERO);
        assert!(cart.is_empty());

        // negative input behaves the same way
        let key = cart
            .add_item(&product("1", dec!(3)), &unidad(), None, &registry())
            .unwrap()
            .key
            .clone();
        cart.update_quantity(&key, dec!(-2));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unknown_key_is_noop() {
        let mut cart = Cart::new("VES");
        cart.add_item(&product("1", dec!(3)), &unidad(), None, &registry())
            .unwrap();

        let ghost = LineKey::for_unit("p-ghost", "Unidad");
        cart.update_quantity(&ghost, dec!(5));
        cart.remove_item(&ghost);
        cart.update_line(&ghost, LinePatch::default());

        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_update_line_merges_metadata_only() {
        let mut cart = Cart::new("VES");
        let key = cart
            .add_item(&product("1", dec!(10)), &unidad(), None, &registry())
            .unwrap()
            .key
            .clone();
        let before = cart.get(&key).unwrap().clone();

        cart.update_line(
            &key,
            LinePatch {
                salesperson_id: Some("v-9".to_string()),
                discount_bps: Some(500),
                ..LinePatch::default()
            },
        );

        let after = cart.get(&key).unwrap();
        assert_eq!(after.salesperson_id.as_deref(), Some("v-9"));
        assert_eq!(after.discount_bps, Some(500));
        // pricing untouched
        assert_eq!(after.subtotal_usd, before.subtotal_usd);
        assert_eq!(after.subtotal_bs, before.subtotal_bs);
        assert_eq!(after.exchange_rate, before.exchange_rate);
    }

    #[test]
    fn test_apply_rates_reprices_bs_only() {
        // Scenario: default VES rate moves 40 -> 42
        let mut cart = Cart::new("VES");
        cart.add_item(&product("1", dec!(10)), &unidad(), None, &registry())
            .unwrap();

        let newer = RateRegistry::from_snapshot(vec![rate("r-bcv", "VES", "BCV", dec!(42), true)]);
        cart.apply_rates(&newer);

        let line = &cart.lines()[0];
        assert_eq!(line.subtotal_usd, dec!(10.00));
        assert_eq!(line.exchange_rate, dec!(42));
        assert_eq!(line.subtotal_bs, dec!(420.00));
        assert!(!line.rate_stale);
    }

    #[test]
    fn test_apply_rates_rebinds_by_name_when_id_rotates() {
        let mut cart = Cart::new("VES");
        cart.add_item(&product("1", dec!(10)), &unidad(), None, &registry())
            .unwrap();

        // Host re-created the BCV entry under a new id
        let rotated =
            RateRegistry::from_snapshot(vec![rate("r-bcv-2", "VES", "BCV", dec!(41), true)]);
        cart.apply_rates(&rotated);

        let line = &cart.lines()[0];
        assert_eq!(line.exchange_rate_id.as_deref(), Some("r-bcv-2"));
        assert_eq!(line.exchange_rate, dec!(41));
        assert_eq!(line.subtotal_bs, dec!(410.00));
    }

    #[test]
    fn test_apply_rates_special_rate_goes_stale_not_default() {
        let mut cart = Cart::new("VES");
        let special_unit = SaleUnit {
            exchange_rate_id: Some("r-par".to_string()),
            ..unidad()
        };
        cart.add_item(&product("1", dec!(10)), &special_unit, None, &registry())
            .unwrap();
        assert!(cart.lines()[0].is_special_rate);

        // Paralelo retired entirely; only the default remains
        let pruned = RateRegistry::from_snapshot(vec![rate("r-bcv", "VES", "BCV", dec!(42), true)]);
        cart.apply_rates(&pruned);

        let line = &cart.lines()[0];
        // must NOT silently adopt the default: keeps last known 45
        assert_eq!(line.exchange_rate, dec!(45));
        assert_eq!(line.subtotal_bs, dec!(450.00));
        assert!(line.rate_stale);
    }

    #[test]
    fn test_apply_rates_non_special_falls_back_to_default() {
        let mut cart = Cart::new("VES");
        cart.add_item(&product("1", dec!(10)), &unidad(), None, &registry())
            .unwrap();

        // Bound entry gone, default now lives under another id/name
        let replaced =
            RateRegistry::from_snapshot(vec![rate("r-prom", "VES", "Promedio", dec!(43), true)]);
        cart.apply_rates(&replaced);

        let line = &cart.lines()[0];
        assert_eq!(line.exchange_rate_id.as_deref(), Some("r-prom"));
        assert_eq!(line.exchange_rate, dec!(43));
        assert_eq!(line.rate_source, RateSource::Default);
        assert!(!line.rate_stale);
    }

    #[test]
    fn test_apply_rates_stale_line_recovers_on_reactivation() {
        let mut cart = Cart::new("VES");
        let special_unit = SaleUnit {
            exchange_rate_id: Some("r-par".to_string()),
            ..unidad()
        };
        cart.add_item(&product("1", dec!(10)), &special_unit, None, &registry())
            .unwrap();

        cart.apply_rates(&RateRegistry::from_snapshot(vec![rate(
            "r-bcv", "VES", "BCV", dec!(42), true,
        )]));
        assert!(cart.lines()[0].rate_stale);

        // Paralelo comes back with a new value
        cart.apply_rates(&registry());
        let line = &cart.lines()[0];
        assert!(!line.rate_stale);
        assert_eq!(line.exchange_rate, dec!(45));
    }

    #[test]
    fn test_cart_capacity_caps() {
        let mut cart = Cart::new("VES");
        for i in 0..MAX_CART_LINES {
            cart.add_item(&product(&i.to_string(), dec!(1)), &unidad(), None, &registry())
                .unwrap();
        }
        let overflow = cart.add_item(&product("extra", dec!(1)), &unidad(), None, &registry());
        assert!(matches!(overflow, Err(CoreError::CartTooLarge { .. })));
    }

    #[test]
    fn test_quantity_clamps_at_cap() {
        let mut cart = Cart::new("VES");
        let key = cart
            .add_item(&product("1", dec!(1)), &unidad(), None, &registry())
            .unwrap()
            .key
            .clone();

        cart.update_quantity(&key, dec!(5000));
        assert_eq!(cart.get(&key).unwrap().quantity, Decimal::from(MAX_LINE_QUANTITY));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new("VES");
        cart.add_item(&product("1", dec!(3)), &unidad(), None, &registry())
            .unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_quantity(), Decimal::ZERO);
    }

    #[test]
    fn test_fractional_quantity_subtotals() {
        let mut cart = Cart::new("VES");
        let kg = SaleUnit {
            name: "Kg".to_string(),
            price_usd: Some(dec!(4.80)),
            conversion_factor: dec!(0.001),
            exchange_rate_id: None,
            exchange_rate_name: None,
        };
        let key = cart
            .add_item(&product("1", dec!(4.80)), &kg, None, &registry())
            .unwrap()
            .key
            .clone();

        cart.update_quantity(&key, dec!(0.250));
        let line = cart.get(&key).unwrap();
        assert_eq!(line.subtotal_usd, dec!(1.20));
        assert_eq!(line.subtotal_bs, dec!(48.00));
    }
}
