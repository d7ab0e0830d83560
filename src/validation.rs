//! Format checks for user-supplied banking and contact details.

use std::sync::LazyLock;

use regex::Regex;

static IFSC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").expect("valid IFSC regex"));

static ACCOUNT_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{9,18}$").expect("valid account number regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

// Indian mobile numbers: ten digits starting with 6-9.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("valid phone regex"));

/// IFSC: four uppercase letters, a literal `0`, then six uppercase alphanumerics.
pub fn is_valid_ifsc(ifsc: &str) -> bool {
    IFSC_RE.is_match(ifsc)
}

/// Bank account numbers are 9 to 18 ASCII digits.
pub fn is_valid_account_number(account_number: &str) -> bool {
    ACCOUNT_NUMBER_RE.is_match(account_number)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Replace all but the last four characters with `X`.
///
/// Inputs of four characters or fewer are returned unchanged. The result has
/// the same length as the input, and masking a masked value is a no-op.
pub fn mask_account_number(account_number: &str) -> String {
    let len = account_number.chars().count();
    if len <= 4 {
        return account_number.to_string();
    }

    let last_four: String = account_number.chars().skip(len - 4).collect();
    format!("{}{}", "X".repeat(len - 4), last_four)
}

/// Treat absent and empty strings alike when checking required fields.
pub fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
