//! Static rates served when the live provider cannot be used.

use chrono::{DateTime, Utc};

use crate::core::currency::RateSnapshot;

pub const DEFAULT_FALLBACK_BASE: &str = "USD";

type RateTable = &'static [(&'static str, &'static [(&'static str, f64)])];

const FALLBACK_RATES: RateTable = &[
    (
        "USD",
        &[
            ("EUR", 0.92),
            ("GBP", 0.79),
            ("JPY", 153.43),
            ("CAD", 1.37),
            ("AUD", 1.52),
        ],
    ),
    (
        "EUR",
        &[
            ("USD", 1.09),
            ("GBP", 0.86),
            ("JPY", 166.69),
            ("CAD", 1.49),
            ("AUD", 1.65),
        ],
    ),
    (
        "GBP",
        &[
            ("USD", 1.27),
            ("EUR", 1.16),
            ("JPY", 194.21),
            ("CAD", 1.74),
            ("AUD", 1.93),
        ],
    ),
];

fn is_known_base(base: &str) -> bool {
    FALLBACK_RATES.iter().any(|(code, _)| *code == base)
}

/// Fallback snapshot for `base`, or for USD when `base` has no table entry.
/// The returned `base_code` names the table actually used.
pub fn fallback_rates(base: &str, now: DateTime<Utc>) -> RateSnapshot {
    let base = if is_known_base(base) {
        base
    } else {
        DEFAULT_FALLBACK_BASE
    };
    let (code, table) = FALLBACK_RATES
        .iter()
        .find(|(code, _)| *code == base)
        .copied()
        .unwrap_or((DEFAULT_FALLBACK_BASE, &[]));

    let rates = table
        .iter()
        .map(|(currency, rate)| (currency.to_string(), *rate))
        .collect();
    RateSnapshot::new(code, rates, now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_bases() {
        assert!(is_known_base("USD"));
        assert!(is_known_base("EUR"));
        assert!(is_known_base("GBP"));
        assert!(!is_known_base("JPY"));
        assert!(!is_known_base("usd"));
    }

    #[test]
    fn test_fallback_for_known_base() {
        let snapshot = fallback_rates("EUR", Utc::now());

        assert_eq!(snapshot.base_code, "EUR");
        assert_eq!(snapshot.rate("USD"), Some(1.09));
        assert_eq!(snapshot.rate("GBP"), Some(0.86));
        assert_eq!(snapshot.rate("JPY"), Some(166.69));
        assert_eq!(snapshot.rates.len(), 5);
    }

    #[test]
    fn test_fallback_for_unknown_base_uses_usd() {
        let snapshot = fallback_rates("CHF", Utc::now());

        assert_eq!(snapshot.base_code, "USD");
        assert_eq!(snapshot.rate("EUR"), Some(0.92));
    }

    #[test]
    fn test_fallback_rates_are_positive() {
        for (base, table) in FALLBACK_RATES {
            assert!(table.iter().all(|(_, rate)| *rate > 0.0), "base {base}");
            assert!(table.iter().all(|(currency, _)| currency != base));
        }
    }
}
