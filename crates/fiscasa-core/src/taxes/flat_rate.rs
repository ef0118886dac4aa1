use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::due_date;
use crate::property::{FiscalProfile, LeaseTaxYear};
use crate::types::{normalize_amount, round_cents, Money, Rate};

/// Cedolare secca rate on residential rents at market terms.
pub const FLAT_RATE: Rate = dec!(0.21);

const FIRST_ADVANCE_SHARE: Rate = dec!(0.40);
const SECOND_ADVANCE_SHARE: Rate = dec!(0.60);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single flat-rate tax payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub amount: Money,
    pub due_date: NaiveDate,
    pub label: String,
}

/// Payment plan for the flat-rate tax as seen from `year`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRateTaxResult {
    pub regime: LeaseTaxYear,
    /// Calendar year the plan was computed for
    pub year: i32,
    pub annual_rent: Money,
    /// Annual rent × 21%, rounded to cents
    pub annual_tax: Money,
    /// Primo acconto (40%, June 30); steady-state regime only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_advance: Option<Installment>,
    /// Secondo acconto (60%, November 30); steady-state regime only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_advance: Option<Installment>,
    pub balance: Installment,
    /// Sum of the installments that fall due within `year`
    pub due_this_cycle: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the flat-rate tax plan for an annual rent under the declared regime.
///
/// - `FirstYear`: nothing is paid this year; the whole tax is a balance due
///   June 30 of next year.
/// - `SecondYear`: last year's tax is settled as a balance due June 30 of
///   this year.
/// - `ThirdYearOrLater`: two advances this year, 40% by June 30 and 60% by
///   November 30. The balance is carried at zero.
pub fn schedule_flat_rate_tax(
    annual_rent: Money,
    regime: LeaseTaxYear,
    year: i32,
) -> FlatRateTaxResult {
    let annual_rent = normalize_amount(Some(annual_rent));
    let annual_tax = round_cents(annual_rent * FLAT_RATE);

    match regime {
        LeaseTaxYear::FirstYear => FlatRateTaxResult {
            regime,
            year,
            annual_rent,
            annual_tax,
            first_advance: None,
            second_advance: None,
            balance: Installment {
                amount: annual_tax,
                due_date: due_date(year + 1, 6, 30),
                label: format!("Cedolare secca balance {year} (first year)"),
            },
            due_this_cycle: Decimal::ZERO,
        },
        LeaseTaxYear::SecondYear => FlatRateTaxResult {
            regime,
            year,
            annual_rent,
            annual_tax,
            first_advance: None,
            second_advance: None,
            balance: Installment {
                amount: annual_tax,
                due_date: due_date(year, 6, 30),
                label: format!("Cedolare secca balance {}", year - 1),
            },
            due_this_cycle: annual_tax,
        },
        LeaseTaxYear::ThirdYearOrLater => {
            let first = round_cents(annual_tax * FIRST_ADVANCE_SHARE);
            let second = round_cents(annual_tax * SECOND_ADVANCE_SHARE);
            // The true-up against last year's advances is not modelled; the
            // balance stays at zero until a prior-year variance is available.
            FlatRateTaxResult {
                regime,
                year,
                annual_rent,
                annual_tax,
                first_advance: Some(Installment {
                    amount: first,
                    due_date: due_date(year, 6, 30),
                    label: format!("Cedolare secca 1st advance {year} (40%)"),
                }),
                second_advance: Some(Installment {
                    amount: second,
                    due_date: due_date(year, 11, 30),
                    label: format!("Cedolare secca 2nd advance {year} (60%)"),
                }),
                balance: Installment {
                    amount: Decimal::ZERO,
                    due_date: due_date(year + 1, 6, 30),
                    label: format!("Cedolare secca possible balance {year}"),
                },
                due_this_cycle: first + second,
            }
        }
    }
}

pub fn flat_rate_for_profile(profile: &FiscalProfile, year: i32) -> FlatRateTaxResult {
    schedule_flat_rate_tax(profile.annual_rent(), profile.lease_tax_year, year)
}

/// Tax for a first-year lease that will fall due next year. Zero in the
/// other regimes.
pub fn set_aside_for_next_year(result: &FlatRateTaxResult) -> Money {
    match result.regime {
        LeaseTaxYear::FirstYear => result.balance.amount,
        LeaseTaxYear::SecondYear | LeaseTaxYear::ThirdYearOrLater => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: i32 = 2026;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_year_has_no_advances() {
        for rent in [dec!(0), dec!(7800), dec!(123456.78)] {
            let r = schedule_flat_rate_tax(rent, LeaseTaxYear::FirstYear, YEAR);
            assert!(r.first_advance.is_none());
            assert!(r.second_advance.is_none());
            assert_eq!(r.due_this_cycle, Decimal::ZERO);
        }
    }

    #[test]
    fn test_first_year_balance_next_june() {
        let r = schedule_flat_rate_tax(dec!(7800), LeaseTaxYear::FirstYear, YEAR);
        assert_eq!(r.annual_tax, dec!(1638));
        assert_eq!(r.balance.amount, dec!(1638));
        assert_eq!(r.balance.due_date, ymd(2027, 6, 30));
        assert_eq!(set_aside_for_next_year(&r), dec!(1638));
    }

    #[test]
    fn test_second_year_balance_this_june() {
        let r = schedule_flat_rate_tax(dec!(7800), LeaseTaxYear::SecondYear, YEAR);
        assert!(r.first_advance.is_none());
        assert_eq!(r.balance.amount, dec!(1638));
        assert_eq!(r.balance.due_date, ymd(2026, 6, 30));
        assert_eq!(r.balance.label, "Cedolare secca balance 2025");
        assert_eq!(r.due_this_cycle, dec!(1638));
    }

    #[test]
    fn test_steady_state_advances() {
        let r = schedule_flat_rate_tax(dec!(7800), LeaseTaxYear::ThirdYearOrLater, YEAR);
        let first = r.first_advance.clone().unwrap();
        let second = r.second_advance.clone().unwrap();
        assert_eq!(first.amount, dec!(655.20));
        assert_eq!(first.due_date, ymd(2026, 6, 30));
        assert_eq!(second.amount, dec!(982.80));
        assert_eq!(second.due_date, ymd(2026, 11, 30));
        assert_eq!(r.balance.amount, Decimal::ZERO);
        assert_eq!(r.due_this_cycle, dec!(1638));
    }

    #[test]
    fn test_advances_sum_to_annual_tax_within_a_cent() {
        for rent in [dec!(1), dec!(333.33), dec!(7777.77), dec!(12345.67), dec!(99999.99)] {
            let r = schedule_flat_rate_tax(rent, LeaseTaxYear::ThirdYearOrLater, YEAR);
            let sum = r.first_advance.unwrap().amount + r.second_advance.unwrap().amount;
            assert!((sum - r.annual_tax).abs() <= dec!(0.01), "rent {rent}: {sum} vs {}", r.annual_tax);
        }
    }
}
