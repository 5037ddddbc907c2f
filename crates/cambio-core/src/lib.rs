//! # cambio-core: Cart Pricing & Multi-Currency Engine
//!
//! This crate is the **heart** of Cambio POS. It owns the cart aggregate
//! and the exchange-rate resolution logic as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cambio POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (web client)                        │   │
//! │  │    Search UI ──► Cart UI ──► Tender UI ──► Receipt UI           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ host command layer                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cambio-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   rates   │  │   cart    │  │  totals   │  │  editor   │   │   │
//! │  │   │ Registry  │  │   Cart    │  │CartTotals │  │LineEditor │   │   │
//! │  │   │ resolve() │  │ CartLine  │  │per-currncy│  │ dual-mode │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        Host collaborators (rate table, catalog, printers)       │   │
//! │  │        push snapshots in; never reached into from here          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ExchangeRate, Product, SaleUnit, LineKey...)
//! - [`rates`] - Rate registry snapshots and the resolution hierarchy
//! - [`cart`] - Cart aggregate and the registry-change re-pricing pass
//! - [`totals`] - Anchor, local, and per-currency totals
//! - [`editor`] - Dual-mode quantity/amount editor
//! - [`money`] - Decimal money math (rounding, pivot conversion, parsing)
//! - [`session`] - Host-facing facade and shared state wrapper
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every operation is deterministic - same cart,
//!    same snapshot, same result
//! 2. **No I/O**: The host owns the rate table and pushes full snapshots
//! 3. **Decimal Money**: Quantities, rates, and amounts are fixed-point
//!    decimals - no floats, no NaN, no drift
//! 4. **Unblockable Checkout**: degenerate inputs normalize to safe
//!    values; a misconfigured registry falls back loudly, never fatally
//!
//! ## Example Usage
//!
//! ```rust
//! use cambio_core::session::CheckoutSession;
//! use cambio_core::types::{ExchangeRate, Product, SaleUnit};
//! use rust_decimal::Decimal;
//!
//! let mut session = CheckoutSession::new("VES");
//! session.on_registry_changed(vec![ExchangeRate {
//!     id: "r-bcv".into(),
//!     currency_code: "VES".into(),
//!     name: "BCV".into(),
//!     rate_value: Decimal::from(40),
//!     is_default: true,
//!     is_active: true,
//! }]);
//!
//! let product = Product {
//!     id: "p-1".into(),
//!     name: "Harina PAN".into(),
//!     sku: "HPAN-1KG".into(),
//!     price_usd: Decimal::from(2),
//!     exchange_rate_id: None,
//!     is_serialized: false,
//! };
//! let unit = SaleUnit {
//!     name: "Unidad".into(),
//!     price_usd: None,
//!     conversion_factor: Decimal::ONE,
//!     exchange_rate_id: None,
//!     exchange_rate_name: None,
//! };
//!
//! session.add_to_cart(&product, &unit, None).unwrap();
//! assert_eq!(session.totals().usd, Decimal::from(2));
//! assert_eq!(session.totals().bs_primary, Decimal::from(80));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod editor;
pub mod error;
pub mod money;
pub mod rates;
pub mod session;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use cambio_core::Cart` instead of
// `use cambio_core::cart::Cart`

pub use cart::{Cart, CartLine};
pub use editor::{EntryMode, LineEditor};
pub use error::{CoreError, CoreResult, ValidationError};
pub use rates::{resolve, RateRegistry, ResolvedRate};
pub use session::{CheckoutSession, SessionState};
pub use totals::CartTotals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

use rust_decimal::Decimal;

/// The anchor currency every other currency is quoted against.
///
/// Catalog prices are stored in USD; every rate in the registry is
/// "units of currency per one USD", so USD itself always converts at 1.
pub const ANCHOR_CURRENCY: &str = "USD";

/// Last-resort exchange rate (anchor parity) used when the registry has
/// no usable rate at all.
///
/// Resolving to this means the rate table is misconfigured; the resolver
/// logs a warning and tags the line `RateSource::Fallback` so the host
/// can surface a diagnostic. Checkout keeps working in the meantime.
pub const FALLBACK_RATE: Decimal = Decimal::ONE;

/// Maximum distinct lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
