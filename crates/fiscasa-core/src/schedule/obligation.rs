use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FiscasaError;
use crate::types::Money;

/// The kinds of payment that make up the yearly fiscal calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObligationKind {
    ImuAdvance,
    ImuBalance,
    FlatRateFirstAdvance,
    FlatRateSecondAdvance,
    FlatRateBalance,
}

impl ObligationKind {
    fn tax(self) -> &'static str {
        match self {
            ObligationKind::ImuAdvance | ObligationKind::ImuBalance => "imu",
            ObligationKind::FlatRateFirstAdvance
            | ObligationKind::FlatRateSecondAdvance
            | ObligationKind::FlatRateBalance => "flatrate",
        }
    }

    fn qualifier(self) -> &'static str {
        match self {
            ObligationKind::ImuAdvance => "advance",
            ObligationKind::ImuBalance | ObligationKind::FlatRateBalance => "balance",
            ObligationKind::FlatRateFirstAdvance => "advance1",
            ObligationKind::FlatRateSecondAdvance => "advance2",
        }
    }

    fn from_parts(tax: &str, qualifier: &str) -> Option<Self> {
        // Italian spellings are accepted so ledgers written before the
        // English identifiers keep resolving.
        let kind = match (tax, qualifier) {
            ("imu", "advance" | "acconto") => ObligationKind::ImuAdvance,
            ("imu", "balance" | "saldo") => ObligationKind::ImuBalance,
            ("flatrate" | "cedolare", "advance1" | "acconto1") => {
                ObligationKind::FlatRateFirstAdvance
            }
            ("flatrate" | "cedolare", "advance2" | "acconto2") => {
                ObligationKind::FlatRateSecondAdvance
            }
            ("flatrate" | "cedolare", "balance" | "saldo") => ObligationKind::FlatRateBalance,
            _ => return None,
        };
        Some(kind)
    }
}

/// Stable key of a fiscal obligation: what is paid and for which fiscal
/// year. Its canonical text form is `{tax}_{qualifier}_{fiscal_year}`,
/// e.g. `imu_advance_2026` or `flatrate_balance_2025`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObligationId {
    pub kind: ObligationKind,
    pub fiscal_year: i32,
}

impl ObligationId {
    pub fn new(kind: ObligationKind, fiscal_year: i32) -> Self {
        Self { kind, fiscal_year }
    }
}

impl fmt::Display for ObligationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}",
            self.kind.tax(),
            self.kind.qualifier(),
            self.fiscal_year
        )
    }
}

impl FromStr for ObligationId {
    type Err = FiscasaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| FiscasaError::InvalidObligationId {
            id: s.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = s.trim().splitn(3, '_');
        let (Some(tax), Some(qualifier), Some(year)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid("expected {tax}_{qualifier}_{year}"));
        };
        let fiscal_year = year
            .parse::<i32>()
            .map_err(|_| invalid("fiscal year is not a number"))?;
        let kind = ObligationKind::from_parts(tax, qualifier)
            .ok_or_else(|| invalid("unknown obligation kind"))?;
        Ok(Self { kind, fiscal_year })
    }
}

impl Serialize for ObligationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObligationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A payable item in the fiscal calendar. Computed on every read and
/// never stored; whether it was paid lives in the payment ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalObligation {
    pub id: ObligationId,
    pub kind: ObligationKind,
    pub amount: Money,
    pub due_date: NaiveDate,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_format() {
        assert_eq!(
            ObligationId::new(ObligationKind::ImuAdvance, 2026).to_string(),
            "imu_advance_2026"
        );
        assert_eq!(
            ObligationId::new(ObligationKind::FlatRateBalance, 2025).to_string(),
            "flatrate_balance_2025"
        );
        assert_eq!(
            ObligationId::new(ObligationKind::FlatRateSecondAdvance, 2026).to_string(),
            "flatrate_advance2_2026"
        );
    }

    #[test]
    fn test_parse_canonical_and_legacy() {
        let id: ObligationId = "imu_balance_2026".parse().unwrap();
        assert_eq!(id, ObligationId::new(ObligationKind::ImuBalance, 2026));

        let legacy: ObligationId = "cedolare_saldo_2025".parse().unwrap();
        assert_eq!(legacy, ObligationId::new(ObligationKind::FlatRateBalance, 2025));
        assert_eq!(legacy.to_string(), "flatrate_balance_2025");

        let acconto: ObligationId = "imu_acconto_2024".parse().unwrap();
        assert_eq!(acconto.kind, ObligationKind::ImuAdvance);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "imu", "imu_advance", "imu_advance_x", "tari_saldo_2026", "imu_bonus_2026"] {
            assert!(bad.parse::<ObligationId>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_serde_as_string() {
        let id = ObligationId::new(ObligationKind::FlatRateFirstAdvance, 2026);
        let v = serde_json::to_value(id).unwrap();
        assert_eq!(v, serde_json::json!("flatrate_advance1_2026"));
        let back: ObligationId = serde_json::from_value(v).unwrap();
        assert_eq!(back, id);
    }
}
