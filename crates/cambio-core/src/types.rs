//! # Domain Types
//!
//! Core domain types for the pricing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ExchangeRate   │   │    Product      │   │    SaleUnit     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  name           │       │
//! │  │  currency_code  │   │  sku            │   │  price_usd?     │       │
//! │  │  rate_value     │   │  price_usd      │   │  conversion     │       │
//! │  │  is_default     │   │  rate override? │   │  rate override? │       │
//! │  │  is_active      │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │   RateSource    │   │    LineKey      │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  Unit           │   │  product_id     │                             │
//! │  │  Product        │   │  unit_key       │                             │
//! │  │  Default        │   └─────────────────┘                             │
//! │  │  PreResolved    │                                                    │
//! │  │  Fallback       │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The exchange-rate table itself lives with the host (database, admin
//! screens); this crate only ever sees read-only snapshots of it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Exchange Rate
// =============================================================================

/// One entry of the host's exchange-rate table.
///
/// Rates are expressed as units of `currency_code` per one USD (the anchor
/// currency). The host guarantees at most one active default per currency
/// code; the resolver assumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExchangeRate {
    /// Unique identifier within the rate table.
    pub id: String,

    /// ISO-4217-style currency code ("VES", "EUR", ...).
    pub currency_code: String,

    /// Display name ("BCV", "Paralelo", "Promedio", ...).
    pub name: String,

    /// Units of this currency per one USD. Positive.
    #[ts(as = "String")]
    pub rate_value: Decimal,

    /// Whether this is the designated default rate for its currency.
    pub is_default: bool,

    /// Inactive rates are invisible to resolution (soft delete).
    pub is_active: bool,
}

// =============================================================================
// Currency
// =============================================================================

/// Currency enumeration metadata, supplied by the host alongside the rate
/// table. Used only for labeling per-currency totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Currency {
    pub code: String,
    pub symbol: String,
    pub name: String,
}

// =============================================================================
// Product
// =============================================================================

/// The pricing-relevant subset of a product.
///
/// Catalog management (stock, categories, suppliers) is a host concern;
/// the cart only needs identity, price, and the optional rate override.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Base price in USD for one base unit.
    #[ts(as = "String")]
    pub price_usd: Decimal,

    /// Rate this product uses instead of its currency's default, if any.
    pub exchange_rate_id: Option<String>,

    /// IMEI/serial tracked products get one cart line per scanned serial.
    pub is_serialized: bool,
}

// =============================================================================
// Sale Unit
// =============================================================================

/// A sellable presentation of a product ("Unidad", "Caja x12", "Kg").
///
/// A unit may carry its own price and its own rate override; the unit's
/// override outranks the product's in the resolution hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleUnit {
    /// Presentation name, unique per product.
    pub name: String,

    /// Unit price in USD; `None` means derive from the product price.
    #[ts(as = "Option<String>")]
    pub price_usd: Option<Decimal>,

    /// Base units per one of this unit. `< 1` for fractional sale
    /// (weighed goods), `> 1` for packs.
    #[ts(as = "String")]
    pub conversion_factor: Decimal,

    /// Rate this unit uses instead of product/default, if any.
    pub exchange_rate_id: Option<String>,

    /// Resolved rate name carried by the caller. When present together
    /// with `exchange_rate_id`, the resolver treats the binding as
    /// pre-resolved and only re-checks that it is still active.
    pub exchange_rate_name: Option<String>,
}

impl SaleUnit {
    /// Effective USD price for one of this unit.
    ///
    /// Units without an explicit price sell at the product's base price
    /// scaled by the conversion factor.
    pub fn unit_price(&self, product: &Product) -> Decimal {
        self.price_usd
            .unwrap_or(product.price_usd * self.conversion_factor)
    }
}

// =============================================================================
// Rate Source
// =============================================================================

/// Which step of the resolution hierarchy produced a line's bound rate.
///
/// `Fallback` means the registry was misconfigured (no usable rate at
/// all); the host should surface that as a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum RateSource {
    /// The unit's own rate override.
    Unit,
    /// The product's rate override.
    Product,
    /// The currency's designated default rate.
    Default,
    /// A still-valid binding the caller resolved earlier.
    PreResolved,
    /// Hardcoded last resort; indicates a misconfigured registry.
    Fallback,
}

// =============================================================================
// Line Key
// =============================================================================

/// Cart line identity: which product, in which presentation.
///
/// An explicit key type instead of string concatenation, so the merge
/// rule is visible: two adds merge into one line iff their keys are
/// equal. `unit_key` is the sanitized unit name - or, for serialized
/// products, the scanned serial, so every serial gets its own line.
///
/// Collision rule: unit names that sanitize to the same string ("Caja"
/// vs "caja ") are the same presentation and DO merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineKey {
    pub product_id: String,
    pub unit_key: String,
}

impl LineKey {
    /// Key for a product sold in a named presentation.
    pub fn for_unit(product_id: &str, unit_name: &str) -> Self {
        LineKey {
            product_id: product_id.to_string(),
            unit_key: sanitize_unit_name(unit_name),
        }
    }

    /// Key for one serialized (IMEI-tracked) instance.
    pub fn for_serial(product_id: &str, serial: &str) -> Self {
        LineKey {
            product_id: product_id.to_string(),
            unit_key: format!("sn:{}", serial.trim()),
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.product_id, self.unit_key)
    }
}

/// Lowercases, trims, and collapses whitespace runs to `-`.
fn sanitize_unit_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

// =============================================================================
// Line Patch
// =============================================================================

/// Partial update for a cart line's passthrough metadata.
///
/// Deliberately has no quantity/price/rate fields: metadata edits cannot
/// put a line's subtotals out of sync with its pricing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LinePatch {
    /// Salesperson credited with the line.
    pub salesperson_id: Option<String>,

    /// Technician assigned (service/repair lines).
    pub technician_id: Option<String>,

    /// Line discount in basis points (1000 = 10%). Applied by the host
    /// at tender time, carried here untouched.
    pub discount_bps: Option<u32>,

    /// Stock level observed when the line was added.
    #[ts(as = "Option<String>")]
    pub stock_snapshot: Option<Decimal>,

    /// Scanned serial numbers for serialized lines.
    pub serials: Option<Vec<String>>,
}

// =============================================================================
// Unit Tests
// =============================================================================
