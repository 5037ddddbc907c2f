//! # Dual-Mode Quantity Editor
//!
//! Per-line editor keeping "quantity of unit" and "monetary amount in a
//! chosen currency" mathematically synchronized.
//!
//! ## The Two Modes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  QUANTITY MODE                      AMOUNT MODE                         │
//! │                                                                         │
//! │  cashier types: 0.250 (kg)          cashier types: Bs 50                │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  amount = qty × price × rate        amount_usd = amount / rate          │
//! │                                     qty = amount_usd / price            │
//! │                                                                         │
//! │  Both directions pivot through USD; the display currency is just        │
//! │  a lens. Switching it in amount mode re-expresses the entered           │
//! │  amount without moving the underlying quantity.                         │
//! │                                                                         │
//! │  Weighed goods (conversion_factor < 1) open in amount mode -            │
//! │  "give me 50 bolívares of cheese" - whole units open in quantity.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All input is lenient: malformed or negative text parses to 0, and the
//! zero-price guard keeps amount-mode division defined. Displayed values
//! are decimal strings; computation is all `Decimal`, so NaN/Infinity
//! cannot appear.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartLine;
use crate::money::{parse_decimal_or_zero, pivot_convert, round_money, safe_div};
use crate::rates::RateRegistry;
use crate::ANCHOR_CURRENCY;

// =============================================================================
// Entry Mode
// =============================================================================

/// Which field the cashier is typing into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EntryMode {
    /// Editing the unit quantity; the amount is derived.
    Quantity,
    /// Editing a monetary amount; the quantity is derived.
    Amount,
}

impl EntryMode {
    /// Fractional-unit products (sold by weight/volume) open in amount
    /// mode; whole units open in quantity mode.
    pub fn default_for(conversion_factor: Decimal) -> Self {
        if conversion_factor < Decimal::ONE {
            EntryMode::Amount
        } else {
            EntryMode::Quantity
        }
    }
}

// =============================================================================
// Line Editor
// =============================================================================

/// Editor state for a single cart line.
///
/// Holds decimal strings the way the UI shows them plus the numeric
/// quantity that is the actual truth. The host reads `quantity()` back
/// and feeds it to `Cart::update_quantity` when the edit is committed.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineEditor {
    mode: EntryMode,

    /// Currency the amount field is shown in.
    display_currency: String,

    /// Frozen from the line being edited.
    #[ts(as = "String")]
    unit_price_usd: Decimal,

    /// The line's bound rate and its currency.
    #[ts(as = "String")]
    bound_rate: Decimal,
    bound_currency: Option<String>,

    /// Current quantity (derived in amount mode).
    #[ts(as = "String")]
    quantity: Decimal,

    /// Display strings, exactly as typed/derived.
    quantity_text: String,
    amount_text: String,
}

impl LineEditor {
    /// Opens an editor on a cart line.
    ///
    /// The display currency starts at the line's bound currency (USD for
    /// fallback-priced lines); the mode follows the unit's conversion
    /// factor.
    pub fn for_line(line: &CartLine) -> Self {
        let display_currency = line
            .exchange_rate_currency
            .clone()
            .unwrap_or_else(|| ANCHOR_CURRENCY.to_string());
        let mut editor = LineEditor {
            mode: EntryMode::default_for(line.conversion_factor),
            display_currency,
            unit_price_usd: line.unit_price_usd,
            bound_rate: line.exchange_rate,
            bound_currency: line.exchange_rate_currency.clone(),
            quantity: line.quantity,
            quantity_text: line.quantity.normalize().to_string(),
            amount_text: String::new(),
        };
        editor.amount_text = editor.derived_amount(&RateRegistry::new()).to_string();
        editor
    }

    /// Rate for expressing amounts in `code`, pivoting through USD.
    ///
    /// The line's own bound rate wins for its own currency; other
    /// currencies use the registry default; USD is always 1.
    fn rate_of(&self, code: &str, registry: &RateRegistry) -> Decimal {
        if self.bound_currency.as_deref() == Some(code) {
            return self.bound_rate;
        }
        if code == ANCHOR_CURRENCY {
            return Decimal::ONE;
        }
        registry
            .default_for(code)
            .map(|r| r.rate_value)
            .unwrap_or(Decimal::ONE)
    }

    /// Amount in the display currency derived from the current quantity.
    fn derived_amount(&self, registry: &RateRegistry) -> Decimal {
        let amount_usd = self.quantity * self.unit_price_usd;
        round_money(amount_usd * self.rate_of(&self.display_currency, registry))
    }

    /// Cashier typed into the quantity field.
    ///
    /// Malformed or negative input normalizes to quantity 0; the amount
    /// field re-derives.
    pub fn enter_quantity(&mut self, text: &str, registry: &RateRegistry) {
        self.mode = EntryMode::Quantity;
        self.quantity_text = text.to_string();
        self.quantity = parse_decimal_or_zero(text).max(Decimal::ZERO);
        self.amount_text = self.derived_amount(registry).to_string();
    }

    /// Cashier typed into the amount field.
    ///
    /// The quantity re-derives as `amount_usd / unit_price_usd`; a
    /// zero-priced line resolves to quantity 0 rather than a division
    /// error.
    pub fn enter_amount(&mut self, text: &str, registry: &RateRegistry) {
        self.mode = EntryMode::Amount;
        self.amount_text = text.to_string();
        let amount = parse_decimal_or_zero(text).max(Decimal::ZERO);
        let amount_usd = safe_div(amount, self.rate_of(&self.display_currency, registry));
        self.quantity = safe_div(amount_usd, self.unit_price_usd);
        self.quantity_text = self.quantity.normalize().to_string();
    }

    /// Switches the currency the amount field is shown in.
    ///
    /// In amount mode the entered amount is re-expressed through the USD
    /// pivot - the underlying quantity does not move. In quantity mode
    /// the derived amount simply re-renders in the new currency.
    pub fn set_display_currency(&mut self, code: &str, registry: &RateRegistry) {
        let from_rate = self.rate_of(&self.display_currency, registry);
        let to_rate = self.rate_of(code, registry);
        self.display_currency = code.to_string();

        match self.mode {
            EntryMode::Amount => {
                let amount = parse_decimal_or_zero(&self.amount_text).max(Decimal::ZERO);
                let re_expressed = round_money(pivot_convert(amount, from_rate, to_rate));
                self.amount_text = re_expressed.to_string();
            }
            EntryMode::Quantity => {
                self.amount_text = self.derived_amount(registry).to_string();
            }
        }
    }

    /// Switches entry mode without changing any value.
    pub fn set_mode(&mut self, mode: EntryMode) {
        self.mode = mode;
    }

    // -------------------------------------------------------------------------
    // Read Accessors
    // -------------------------------------------------------------------------

    /// The quantity to commit back to the cart.
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Current amount in the display currency.
    pub fn amount(&self) -> Decimal {
        parse_decimal_or_zero(&self.amount_text).max(Decimal::ZERO)
    }

    pub fn mode(&self) -> EntryMode {
        self.mode
    }

    pub fn display_currency(&self) -> &str {
        &self.display_currency
    }

    pub fn quantity_text(&self) -> &str {
        &self.quantity_text
    }

    pub fn amount_text(&self) -> &str {
        &self.amount_text
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
