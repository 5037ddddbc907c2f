//! # Money Math
//!
//! Decimal helpers shared by the cart, the totals aggregator, and the
//! quantity editor.
//!
//! ## Why Fixed-Point Decimal?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  And integer cents alone don't survive this domain either:              │
//! │    quantities are fractional (0.250 kg), exchange rates have            │
//! │    4+ decimal places, and both multiply into money.                     │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal everywhere                                  │
//! │    Exact base-10 arithmetic; monetary RESULTS round to 2 dp,            │
//! │    midpoint away from zero. No NaN, no Infinity, by construction.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Rounding precision for monetary values (2 decimal places).
pub const MONEY_DP: u32 = 2;

/// Rounds a monetary value to [`MONEY_DP`] places, midpoint away from zero.
///
/// Every amount that leaves this crate as money (subtotals, converted
/// amounts, totals) passes through here exactly once.
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Line subtotal in the anchor currency: `unit_price × quantity`, rounded.
#[inline]
pub fn line_subtotal(unit_price_usd: Decimal, quantity: Decimal) -> Decimal {
    round_money(unit_price_usd * quantity)
}

/// Converts an anchor-currency amount at the given exchange rate, rounded.
#[inline]
pub fn convert_at(amount_usd: Decimal, rate: Decimal) -> Decimal {
    round_money(amount_usd * rate)
}

/// Division that resolves divide-by-zero to zero instead of panicking.
///
/// Checkout flows must never die on a misconfigured rate or a free item,
/// so `x / 0` is defined as `0` throughout this crate.
#[inline]
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// Re-expresses an amount from one currency to another through the USD
/// pivot: `amount / from_rate × to_rate`.
///
/// Rates are units-of-currency per USD; USD itself is rate 1. The result
/// is intentionally unrounded - callers round at the display edge so
/// round-trips through the pivot stay stable.
#[inline]
pub fn pivot_convert(amount: Decimal, from_rate: Decimal, to_rate: Decimal) -> Decimal {
    safe_div(amount, from_rate) * to_rate
}

/// Parses a user-entered decimal string, mapping anything malformed to 0.
///
/// The quantity editor feeds raw keyboard input through here; `"12,5"`,
/// `""`, `"abc"` and friends all become `0` rather than an error or NaN.
pub fn parse_decimal_or_zero(input: &str) -> Decimal {
    Decimal::from_str(input.trim()).unwrap_or(Decimal::ZERO)
}

// =============================================================================
// Unit Tests
// =============================================================================
