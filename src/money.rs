//! Money column limits
//!
//! Balances and transfer amounts are stored in `NUMERIC(18, 2)` columns.
//! PostgreSQL rounds every write to two fractional digits, row by row, so a
//! value that does not fit exactly must never reach the store.

use rust_decimal::Decimal;
use thiserror::Error;

/// Fractional digits kept by the money columns
pub const MONEY_SCALE: u32 = 2;

/// Money validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Amount too large, would overflow")]
    Overflow,
}

/// Largest magnitude a `NUMERIC(18, 2)` column holds: 9999999999999999.99
pub fn max_money() -> Decimal {
    Decimal::new(999_999_999_999_999_999, MONEY_SCALE)
}

/// Accept `value` only if a money column stores it without rounding.
///
/// Trailing zeros do not count against the scale: `40.500` is accepted.
pub fn check_money(value: Decimal) -> Result<Decimal, MoneyError> {
    let scale = value.normalize().scale();
    if scale > MONEY_SCALE {
        return Err(MoneyError::PrecisionOverflow {
            provided: scale,
            max: MONEY_SCALE,
        });
    }
    if value.abs() > max_money() {
        return Err(MoneyError::Overflow);
    }
    Ok(value)
}
