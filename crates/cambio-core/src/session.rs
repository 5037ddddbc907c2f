//! # Checkout Session
//!
//! The embedding surface the host talks to: one cart plus the latest
//! rate-table snapshot, behind a small facade.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Data Flow                                    │
//! │                                                                         │
//! │  Host Event               Facade Call              Effect               │
//! │  ──────────               ───────────              ──────               │
//! │                                                                         │
//! │  Rates refreshed ───────► on_registry_changed() ─► swap snapshot,      │
//! │  (poll/WebSocket,                                   re-price cart       │
//! │   host's concern)                                                       │
//! │                                                                         │
//! │  Product scanned ───────► add_to_cart() ─────────► resolve + append    │
//! │                                                                         │
//! │  Totals panel ──────────► totals() ──────────────► computed on demand  │
//! │                                                                         │
//! │  Sale finalized ────────► clear() ───────────────► empty cart          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! `CheckoutSession` itself is single-writer, matching the one-cart-per-
//! terminal ownership model. Hosts whose command layer runs concurrently
//! wrap it in [`SessionState`] (`Arc<Mutex<_>>`) and serialize access the
//! same way the rest of this crate assumes.

use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use tracing::debug;

use crate::cart::{Cart, CartLine};
use crate::editor::LineEditor;
use crate::error::CoreResult;
use crate::rates::RateRegistry;
use crate::totals::CartTotals;
use crate::types::{Currency, ExchangeRate, LineKey, LinePatch, Product, SaleUnit};

// =============================================================================
// Checkout Session
// =============================================================================

/// One checkout session: a cart, the current registry snapshot, and the
/// host-supplied currency list.
///
/// The registry arrives only through [`on_registry_changed`]; nothing
/// here fetches anything. The session is created empty and lives until
/// the sale completes or the host resets it.
///
/// [`on_registry_changed`]: CheckoutSession::on_registry_changed
#[derive(Debug)]
pub struct CheckoutSession {
    cart: Cart,
    registry: RateRegistry,
    currencies: Vec<Currency>,
}

impl CheckoutSession {
    /// Creates a session pricing local subtotals in `local_currency`.
    pub fn new(local_currency: impl Into<String>) -> Self {
        CheckoutSession {
            cart: Cart::new(local_currency),
            registry: RateRegistry::new(),
            currencies: Vec::new(),
        }
    }

    /// Replaces the currency enumeration metadata.
    pub fn set_currencies(&mut self, currencies: Vec<Currency>) {
        self.currencies = currencies;
    }

    /// Host pushed a fresh rate-table snapshot: swap it in atomically
    /// and re-price every cart line against it.
    pub fn on_registry_changed(&mut self, snapshot: Vec<ExchangeRate>) {
        debug!(rates = snapshot.len(), "registry snapshot replaced");
        self.registry = RateRegistry::from_snapshot(snapshot);
        self.cart.apply_rates(&self.registry);
    }

    /// Adds one unit of a product; returns the affected line's key.
    ///
    /// `serial` must be given for serialized products so each scanned
    /// instance gets its own line.
    pub fn add_to_cart(
        &mut self,
        product: &Product,
        unit: &SaleUnit,
        serial: Option<&str>,
    ) -> CoreResult<LineKey> {
        debug!(sku = %product.sku, unit = %unit.name, "add_to_cart");
        let line = self
            .cart
            .add_item(product, unit, serial, &self.registry)?;
        Ok(line.key.clone())
    }

    /// Sets a line's quantity; `≤ 0` removes, unknown key no-ops.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: Decimal) {
        debug!(key = %key, %quantity, "update_quantity");
        self.cart.update_quantity(key, quantity);
    }

    /// Removes a line; no-op if absent.
    pub fn remove_from_cart(&mut self, key: &LineKey) {
        debug!(key = %key, "remove_from_cart");
        self.cart.remove_item(key);
    }

    /// Merges passthrough metadata into a line.
    pub fn update_line(&mut self, key: &LineKey, patch: LinePatch) {
        self.cart.update_line(key, patch);
    }

    /// Empties the cart (sale completed or cancelled).
    pub fn clear(&mut self) {
        debug!("clear cart");
        self.cart.clear();
    }

    /// Totals against the current snapshot, computed on demand.
    pub fn totals(&self) -> CartTotals {
        CartTotals::compute(&self.cart, &self.registry)
    }

    /// Opens a dual-mode quantity editor on a line.
    pub fn editor(&self, key: &LineKey) -> Option<LineEditor> {
        self.cart.get(key).map(LineEditor::for_line)
    }

    /// The ordered line list, for rendering.
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// The cart itself, read-only.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The current registry snapshot, read-only.
    pub fn registry(&self) -> &RateRegistry {
        &self.registry
    }

    /// Host-supplied currency metadata.
    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }
}

// =============================================================================
// Shared Session State
// =============================================================================

/// Shared-ownership wrapper for concurrent hosts.
///
/// ## Why Not RwLock?
/// Session operations are quick and most of them write. A RwLock would
/// add complexity with minimal benefit.
#[derive(Debug, Clone)]
pub struct SessionState {
    inner: Arc<Mutex<CheckoutSession>>,
}

impl SessionState {
    /// Creates shared state around a fresh session.
    pub fn new(local_currency: impl Into<String>) -> Self {
        SessionState {
            inner: Arc::new(Mutex::new(CheckoutSession::new(local_currency))),
        }
    }

    /// Executes a function with read access to the session.
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CheckoutSession) -> R,
    {
        let session = self.inner.lock().expect("session mutex poisoned");
        f(&session)
    }

    /// Executes a function with write access to the session.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CheckoutSession) -> R,
    {
        let mut session = self.inner.lock().expect("session mutex poisoned");
        f(&mut session)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
