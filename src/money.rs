//! Money representation.
//!
//! Balances and amounts are stored as `i64` paise (1/100 rupee) to avoid
//! floating-point errors. On the wire they are decimals in rupees, e.g.
//! `500` or `1250.75`.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::AppError;

/// Currency reported by every balance endpoint.
pub const CURRENCY: &str = "INR";

const PAISE_PER_RUPEE: i64 = 100;

/// Ceiling for a single payout transfer (₹2,00,000).
pub const MAX_TRANSFER_PAISE: i64 = 200_000 * PAISE_PER_RUPEE;

/// Ceiling for a single add-money deposit (₹50,000).
pub const MAX_DEPOSIT_PAISE: i64 = 50_000 * PAISE_PER_RUPEE;

/// A `LOW_BALANCE` notification is raised when a debit leaves less than this.
pub const LOW_BALANCE_THRESHOLD_PAISE: i64 = 1_000 * PAISE_PER_RUPEE;

/// Opening balance for newly registered users (₹10,000).
pub const INITIAL_BALANCE_PAISE: i64 = 10_000 * PAISE_PER_RUPEE;

/// Convert a rupee amount from a request into paise.
///
/// # Errors
///
/// `Validation` if the amount has more than two decimal places or does not
/// fit in an `i64` of paise. Sign is not checked here; callers apply their
/// own bounds.
pub fn to_paise(amount: Decimal) -> Result<i64, AppError> {
    let scaled = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| AppError::Validation("Amount is out of range".to_string()))?;

    if !scaled.fract().is_zero() {
        return Err(AppError::Validation(
            "Amount cannot have more than 2 decimal places".to_string(),
        ));
    }

    scaled
        .to_i64()
        .ok_or_else(|| AppError::Validation("Amount is out of range".to_string()))
}

/// Convert stored paise into a rupee decimal with two decimal places.
pub fn from_paise(paise: i64) -> Decimal {
    Decimal::new(paise, 2)
}

/// Human-readable amount for notification text, e.g. `₹1250.50`.
pub fn format_rupees(paise: i64) -> String {
    format!("₹{}", from_paise(paise))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn whole_and_fractional_rupees_convert() {
        assert_eq!(to_paise(dec!(500)).unwrap(), 50_000);
        assert_eq!(to_paise(dec!(1250.75)).unwrap(), 125_075);
        assert_eq!(to_paise(dec!(0.01)).unwrap(), 1);
        assert_eq!(to_paise(dec!(-3)).unwrap(), -300);
    }

    #[test]
    fn sub_paise_precision_is_rejected() {
        assert!(matches!(to_paise(dec!(10.001)), Err(AppError::Validation(_))));
    }

    #[test]
    fn trailing_zeros_are_not_extra_precision() {
        assert_eq!(to_paise(dec!(10.5000)).unwrap(), 1_050);
    }

    #[test]
    fn limits_are_in_paise() {
        assert_eq!(MAX_TRANSFER_PAISE, 20_000_000);
        assert_eq!(MAX_DEPOSIT_PAISE, 5_000_000);
        assert_eq!(from_paise(LOW_BALANCE_THRESHOLD_PAISE), dec!(1000.00));
    }

    #[test]
    fn formatting_keeps_two_decimals() {
        assert_eq!(format_rupees(50_000), "₹500.00");
        assert_eq!(format_rupees(95_050), "₹950.50");
    }
}
