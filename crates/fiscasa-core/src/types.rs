use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// All monetary values, in euro. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.21 = 21%). Never as percentages.
pub type Rate = Decimal;

/// Rates expressed in per-mille (10.6 = 1.06%), as municipal IMU rates are published.
pub type PerMille = Decimal;

/// Round a monetary amount to cents, half away from zero.
pub fn round_cents(value: Money) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Largest amount accepted as input. Keeps every product and sum in the
/// calculators well inside `Decimal` range.
pub const MAX_AMOUNT: Money = dec!(1000000000000000);

/// The single entry point for turning an optional, possibly invalid amount
/// into a usable one. Absent, negative and implausibly large values become
/// zero.
pub fn normalize_amount(value: Option<Money>) -> Money {
    match value {
        Some(v) if v.is_sign_negative() && !v.is_zero() => {
            tracing::debug!(%v, "negative amount normalized to zero");
            Decimal::ZERO
        }
        Some(v) if v > MAX_AMOUNT => {
            tracing::debug!(%v, "out-of-range amount normalized to zero");
            Decimal::ZERO
        }
        Some(v) => v,
        None => Decimal::ZERO,
    }
}

/// Interpret an arbitrary JSON value as an amount. Numbers and numeric
/// strings are accepted; anything else is treated as absent.
pub fn amount_from_value(value: &Value) -> Money {
    let parsed = match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    if parsed.is_none() && !value.is_null() {
        tracing::debug!(%value, "unparseable amount normalized to zero");
    }
    normalize_amount(parsed)
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Interpret a date string, accepting plain `YYYY-MM-DD` as well as a full
/// ISO-8601 timestamp (only the calendar date is kept). Empty or
/// unparseable input yields `None`.
pub fn parse_date_lenient(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Serde adapters that never fail on bad data: they degrade to zero or `None`.
pub mod lenient {
    use super::*;

    pub fn amount<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(amount_from_value(&value))
    }

    pub fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) => parse_date_lenient(&s),
            _ => None,
        })
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit_cents".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_round_cents_half_up() {
        assert_eq!(round_cents(dec!(1780.805)), dec!(1780.81));
        assert_eq!(round_cents(dec!(1780.8)), dec!(1780.80));
        assert_eq!(round_cents(dec!(0.004)), dec!(0.00));
    }

    #[test]
    fn test_normalize_amount() {
        assert_eq!(normalize_amount(None), Decimal::ZERO);
        assert_eq!(normalize_amount(Some(dec!(-5))), Decimal::ZERO);
        assert_eq!(normalize_amount(Some(dec!(650))), dec!(650));
        assert_eq!(normalize_amount(Some(MAX_AMOUNT)), MAX_AMOUNT);
        assert_eq!(normalize_amount(Some(MAX_AMOUNT + dec!(0.01))), Decimal::ZERO);
    }

    #[test]
    fn test_huge_json_amounts_read_as_zero() {
        assert_eq!(amount_from_value(&json!(1e28)), Decimal::ZERO);
        assert_eq!(amount_from_value(&json!("7e28")), Decimal::ZERO);
        assert_eq!(amount_from_value(&json!("79228162514264337593543950335")), Decimal::ZERO);
    }

    #[test]
    fn test_amount_from_value_variants() {
        assert_eq!(amount_from_value(&json!(650)), dec!(650));
        assert_eq!(amount_from_value(&json!(10.6)), dec!(10.6));
        assert_eq!(amount_from_value(&json!("80.50")), dec!(80.50));
        assert_eq!(amount_from_value(&json!("")), Decimal::ZERO);
        assert_eq!(amount_from_value(&json!("abc")), Decimal::ZERO);
        assert_eq!(amount_from_value(&json!(null)), Decimal::ZERO);
        assert_eq!(amount_from_value(&json!(true)), Decimal::ZERO);
        assert_eq!(amount_from_value(&json!(-12)), Decimal::ZERO);
    }

    #[test]
    fn test_parse_date_lenient() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(parse_date_lenient("2025-03-01"), Some(d));
        assert_eq!(parse_date_lenient("2025-03-01T10:22:00.000Z"), Some(d));
        assert_eq!(parse_date_lenient(""), None);
        assert_eq!(parse_date_lenient("not a date"), None);
    }
}
