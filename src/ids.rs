//! Generators for externally visible identifiers.

use chrono::{DateTime, Utc};
use rand::{Rng, distr::Alphanumeric};

fn random_upper_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(len)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect()
}

/// Beneficiary reference: `BENE` followed by 8 uppercase alphanumerics.
pub fn generate_bene_id() -> String {
    format!("BENE{}", random_upper_alphanumeric(8))
}

/// Transfer id for add-money deposits: `DEP<unix millis><4 chars>`.
pub fn generate_deposit_transfer_id(now: DateTime<Utc>) -> String {
    format!(
        "DEP{}{}",
        now.timestamp_millis(),
        random_upper_alphanumeric(4)
    )
}

/// Settlement reference: `YYYYMMDD` followed by six random digits.
pub fn generate_utr(now: DateTime<Utc>) -> String {
    let suffix: u32 = rand::rng().random_range(0..1_000_000);
    format!("{}{:06}", now.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn bene_id_shape() {
        let id = generate_bene_id();
        assert_eq!(id.len(), 12);
        assert!(id.starts_with("BENE"));
        assert!(
            id[4..]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn utr_is_dated() {
        let now = Utc.with_ymd_and_hms(2025, 3, 7, 10, 0, 0).unwrap();
        let utr = generate_utr(now);
        assert_eq!(utr.len(), 14);
        assert!(utr.starts_with("20250307"));
        assert!(utr.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn deposit_id_embeds_timestamp() {
        let now = Utc.with_ymd_and_hms(2025, 3, 7, 10, 0, 0).unwrap();
        let id = generate_deposit_transfer_id(now);
        let expected_prefix = format!("DEP{}", now.timestamp_millis());
        assert!(id.starts_with(&expected_prefix));
        assert_eq!(id.len(), expected_prefix.len() + 4);
    }
}
