//! # Rate Registry & Resolver
//!
//! Read-only view over the host's exchange-rate table, plus the
//! resolution hierarchy that decides which rate prices a cart line.
//!
//! ## Resolution Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Which rate applies to product P sold as unit U in currency C?          │
//! │                                                                         │
//! │  1. unit.exchange_rate_id    (pre-resolved if the unit also carries     │
//! │         │                     the rate name)                            │
//! │         ▼ not active                                                    │
//! │  2. product.exchange_rate_id                                            │
//! │         │                                                               │
//! │         ▼ not active                                                    │
//! │  3. active default rate for C                                           │
//! │         │                                                               │
//! │         ▼ none configured                                               │
//! │  4. FALLBACK_RATE (1:1) + tracing::warn!                                │
//! │                                                                         │
//! │  First match with an ACTIVE rate wins. The hierarchy is a literal       │
//! │  list of strategies so the precedence is testable on its own.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use tracing::warn;

use crate::types::{ExchangeRate, Product, RateSource, SaleUnit};
use crate::FALLBACK_RATE;

// =============================================================================
// Rate Registry
// =============================================================================

/// One atomically-replaced snapshot of the exchange-rate table.
///
/// The host owns the table and pushes full snapshots in; this type only
/// answers lookups. There is no partial update - a new snapshot replaces
/// the whole registry at once.
#[derive(Debug, Clone, Default)]
pub struct RateRegistry {
    rates: Vec<ExchangeRate>,
}

impl RateRegistry {
    /// An empty registry (no rates known yet).
    pub fn new() -> Self {
        RateRegistry { rates: Vec::new() }
    }

    /// Wraps a full snapshot of the host's rate table.
    pub fn from_snapshot(rates: Vec<ExchangeRate>) -> Self {
        RateRegistry { rates }
    }

    /// Looks up a rate by id, active or not.
    pub fn get(&self, id: &str) -> Option<&ExchangeRate> {
        self.rates.iter().find(|r| r.id == id)
    }

    /// Looks up an active rate by id.
    pub fn get_active(&self, id: &str) -> Option<&ExchangeRate> {
        self.rates.iter().find(|r| r.id == id && r.is_active)
    }

    /// Looks up an active rate by display name.
    pub fn active_by_name(&self, name: &str) -> Option<&ExchangeRate> {
        self.rates.iter().find(|r| r.name == name && r.is_active)
    }

    /// The active default rate for a currency, if one is configured.
    ///
    /// The host guarantees at most one; if it ever sends several, the
    /// first in snapshot order wins.
    pub fn default_for(&self, currency_code: &str) -> Option<&ExchangeRate> {
        self.rates
            .iter()
            .find(|r| r.is_active && r.is_default && r.currency_code == currency_code)
    }

    /// Distinct currency codes with at least one active rate, in
    /// first-seen snapshot order.
    pub fn active_currency_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = Vec::new();
        for rate in self.rates.iter().filter(|r| r.is_active) {
            if !codes.contains(&rate.currency_code.as_str()) {
                codes.push(&rate.currency_code);
            }
        }
        codes
    }

    /// True when the snapshot holds no rates at all.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Number of rates in the snapshot (active or not).
    pub fn len(&self) -> usize {
        self.rates.len()
    }
}

// =============================================================================
// Resolved Rate
// =============================================================================

/// The outcome of running the hierarchy: the rate a line gets bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRate {
    /// Numeric rate in effect (units of currency per USD).
    pub value: Decimal,

    /// Registry entry this binding tracks; `None` only for the fallback.
    pub id: Option<String>,

    /// Display name of the matched rate.
    pub name: Option<String>,

    /// Currency code of the matched rate, captured at bind time so
    /// totals can still attribute the line after the entry is retired.
    pub currency: Option<String>,

    /// Which hierarchy step matched.
    pub source: RateSource,

    /// True iff the bound rate is not its currency's default.
    pub is_special: bool,
}

impl ResolvedRate {
    fn from_registry(rate: &ExchangeRate, source: RateSource) -> Self {
        ResolvedRate {
            value: rate.rate_value,
            id: Some(rate.id.clone()),
            name: Some(rate.name.clone()),
            currency: Some(rate.currency_code.clone()),
            source,
            is_special: !rate.is_default,
        }
    }

    fn fallback() -> Self {
        ResolvedRate {
            value: FALLBACK_RATE,
            id: None,
            name: None,
            currency: None,
            source: RateSource::Fallback,
            is_special: false,
        }
    }
}

// =============================================================================
// Resolution Strategies
// =============================================================================

/// One step of the hierarchy. Kept as data so the precedence order is a
/// plain list rather than nested conditionals.
#[derive(Debug)]
enum Strategy<'a> {
    /// Unit carries id + resolved name: trust the id if still active.
    PreResolved { id: &'a str },
    /// Unit-level rate override.
    UnitOverride { id: &'a str },
    /// Product-level rate override.
    ProductOverride { id: &'a str },
    /// The target currency's configured default.
    CurrencyDefault { code: &'a str },
}

impl Strategy<'_> {
    fn apply(&self, registry: &RateRegistry) -> Option<ResolvedRate> {
        match self {
            Strategy::PreResolved { id } => registry
                .get_active(id)
                .map(|r| ResolvedRate::from_registry(r, RateSource::PreResolved)),
            Strategy::UnitOverride { id } => registry
                .get_active(id)
                .map(|r| ResolvedRate::from_registry(r, RateSource::Unit)),
            Strategy::ProductOverride { id } => registry
                .get_active(id)
                .map(|r| ResolvedRate::from_registry(r, RateSource::Product)),
            Strategy::CurrencyDefault { code } => registry
                .default_for(code)
                .map(|r| ResolvedRate::from_registry(r, RateSource::Default)),
        }
    }
}

/// Resolves the effective exchange rate for a product/unit pair.
///
/// Strict priority: unit override (pre-resolved when the unit carries
/// the rate name), then product override, then the currency default,
/// then the 1:1 fallback. Inactive rates never match; a fallback hit
/// means the registry is misconfigured and is logged as a warning.
pub fn resolve(
    product: &Product,
    unit: &SaleUnit,
    target_currency: &str,
    registry: &RateRegistry,
) -> ResolvedRate {
    let mut strategies: Vec<Strategy<'_>> = Vec::with_capacity(3);

    if let Some(id) = unit.exchange_rate_id.as_deref() {
        if unit.exchange_rate_name.is_some() {
            strategies.push(Strategy::PreResolved { id });
        } else {
            strategies.push(Strategy::UnitOverride { id });
        }
    }
    if let Some(id) = product.exchange_rate_id.as_deref() {
        strategies.push(Strategy::ProductOverride { id });
    }
    strategies.push(Strategy::CurrencyDefault {
        code: target_currency,
    });

    for strategy in &strategies {
        if let Some(resolved) = strategy.apply(registry) {
            return resolved;
        }
    }

    warn!(
        sku = %product.sku,
        currency = %target_currency,
        "no active exchange rate resolved; using fallback rate"
    );
    ResolvedRate::fallback()
}

// =============================================================================
// Unit Tests
// =============================================================================
