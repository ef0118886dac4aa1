use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ledger::PaymentLedger;
use super::obligation::{FiscalObligation, ObligationId, ObligationKind};
use crate::property::{FiscalProfile, LeaseTaxYear};
use crate::taxes::flat_rate::{self, FlatRateTaxResult, Installment};
use crate::taxes::{due_date, imu};
use crate::types::{round_cents, Money};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// An obligation together with its paid state from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledObligation {
    #[serde(flatten)]
    pub obligation: FiscalObligation,
    pub paid: bool,
    pub paid_date: Option<DateTime<Utc>>,
}

/// The fiscal calendar for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalSchedule {
    pub year: i32,
    /// Ordered by due date
    pub obligations: Vec<ScheduledObligation>,
    /// Sum of unpaid obligations
    pub total_to_pay: Money,
    /// Sum of paid obligations
    pub total_paid: Money,
    /// First-year flat-rate tax that falls due next year, not listed above
    pub set_aside_next_year: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Obligations payable in `year`, without paid state.
///
/// IMU is always split into an advance (June 16) and a balance
/// (December 16). The flat-rate tax contributes whatever the declared
/// regime makes due this year: last year's balance in the second year,
/// the two advances from the third year on, nothing in the first year.
pub fn compute_obligations(profile: &FiscalProfile, year: i32) -> Vec<FiscalObligation> {
    let imu = imu::imu_split_for_profile(profile);
    let flat = flat_rate::flat_rate_for_profile(profile, year);

    let mut obligations = vec![
        FiscalObligation {
            id: ObligationId::new(ObligationKind::ImuAdvance, year),
            kind: ObligationKind::ImuAdvance,
            amount: imu.advance,
            due_date: due_date(year, 6, 16),
            label: format!("IMU advance {year}"),
        },
        FiscalObligation {
            id: ObligationId::new(ObligationKind::ImuBalance, year),
            kind: ObligationKind::ImuBalance,
            amount: imu.balance,
            due_date: due_date(year, 12, 16),
            label: format!("IMU balance {year}"),
        },
    ];
    obligations.extend(flat_rate_obligations(profile, &flat));

    obligations.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.id.cmp(&b.id)));
    obligations
}

/// Build the year's schedule, reading paid state from `ledger`. An
/// obligation the ledger does not know is unpaid.
pub fn build_schedule<L: PaymentLedger + ?Sized>(
    profile: &FiscalProfile,
    year: i32,
    ledger: &L,
) -> FiscalSchedule {
    let obligations: Vec<ScheduledObligation> = compute_obligations(profile, year)
        .into_iter()
        .map(|obligation| {
            let state = ledger.get(&obligation.id);
            ScheduledObligation {
                paid: state.is_some_and(|s| s.paid),
                paid_date: state.filter(|s| s.paid).and_then(|s| s.paid_date),
                obligation,
            }
        })
        .collect();

    let (paid, unpaid): (Vec<_>, Vec<_>) = obligations.iter().partition(|o| o.paid);
    let sum = |items: Vec<&ScheduledObligation>| -> Money {
        items.iter().map(|o| o.obligation.amount).sum()
    };

    FiscalSchedule {
        year,
        total_to_pay: round_cents(sum(unpaid)),
        total_paid: round_cents(sum(paid)),
        set_aside_next_year: flat_rate::set_aside_for_next_year(
            &flat_rate::flat_rate_for_profile(profile, year),
        ),
        obligations,
    }
}

/// Earliest unpaid obligation due on or after `today`.
pub fn next_due(schedule: &FiscalSchedule, today: NaiveDate) -> Option<&ScheduledObligation> {
    schedule
        .obligations
        .iter()
        .find(|o| !o.paid && o.obligation.due_date >= today)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn flat_rate_obligations(profile: &FiscalProfile, flat: &FlatRateTaxResult) -> Vec<FiscalObligation> {
    let year = flat.year;
    let to_obligation = |kind: ObligationKind, fiscal_year: i32, i: &Installment| FiscalObligation {
        id: ObligationId::new(kind, fiscal_year),
        kind,
        amount: i.amount,
        due_date: i.due_date,
        label: i.label.clone(),
    };

    match flat.regime {
        LeaseTaxYear::FirstYear => Vec::new(),
        LeaseTaxYear::SecondYear => {
            let fiscal_year = year - 1;
            // No balance for a fiscal year before the lease began.
            let leased_that_year = profile
                .lease_start_year()
                .map_or(true, |start| fiscal_year >= start);
            if leased_that_year {
                vec![to_obligation(ObligationKind::FlatRateBalance, fiscal_year, &flat.balance)]
            } else {
                Vec::new()
            }
        }
        LeaseTaxYear::ThirdYearOrLater => [
            (ObligationKind::FlatRateFirstAdvance, &flat.first_advance),
            (ObligationKind::FlatRateSecondAdvance, &flat.second_advance),
        ]
        .into_iter()
        .filter_map(|(kind, installment)| {
            installment.as_ref().map(|i| to_obligation(kind, year, i))
        })
        .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ledger::{toggle_paid, InMemoryLedger};
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn profile(regime: LeaseTaxYear) -> FiscalProfile {
        FiscalProfile {
            main_cadastral_value: dec!(1000),
            monthly_rent: dec!(650),
            lease_start: NaiveDate::from_ymd_opt(2024, 3, 1),
            lease_tax_year: regime,
            ..Default::default()
        }
    }

    fn ids(schedule: &FiscalSchedule) -> Vec<String> {
        schedule
            .obligations
            .iter()
            .map(|o| o.obligation.id.to_string())
            .collect()
    }

    #[test]
    fn test_first_year_lists_only_imu() {
        let s = build_schedule(&profile(LeaseTaxYear::FirstYear), 2026, &InMemoryLedger::new());
        assert_eq!(ids(&s), vec!["imu_advance_2026", "imu_balance_2026"]);
        assert_eq!(s.total_to_pay, dec!(1780.80));
        assert_eq!(s.set_aside_next_year, dec!(1638));
    }

    #[test]
    fn test_second_year_orders_by_due_date() {
        let s = build_schedule(&profile(LeaseTaxYear::SecondYear), 2026, &InMemoryLedger::new());
        assert_eq!(
            ids(&s),
            vec!["imu_advance_2026", "flatrate_balance_2025", "imu_balance_2026"]
        );
        assert_eq!(s.total_to_pay, dec!(3418.80));
        assert_eq!(s.set_aside_next_year, Decimal::ZERO);
    }

    #[test]
    fn test_second_year_skips_balance_before_lease_start() {
        let mut p = profile(LeaseTaxYear::SecondYear);
        p.lease_start = NaiveDate::from_ymd_opt(2026, 1, 1);
        let s = build_schedule(&p, 2026, &InMemoryLedger::new());
        assert_eq!(ids(&s), vec!["imu_advance_2026", "imu_balance_2026"]);
    }

    #[test]
    fn test_second_year_lists_balance_when_lease_start_unknown() {
        let profile = FiscalProfile {
            lease_start: None,
            ..profile(LeaseTaxYear::SecondYear)
        };
        let s = build_schedule(&profile, 2026, &InMemoryLedger::new());
        assert!(ids(&s).contains(&"flatrate_balance_2025".to_string()));
        assert_eq!(s.total_to_pay, dec!(3418.80));
    }

    #[test]
    fn test_steady_state_lists_both_advances() {
        let s = build_schedule(
            &profile(LeaseTaxYear::ThirdYearOrLater),
            2026,
            &InMemoryLedger::new(),
        );
        assert_eq!(
            ids(&s),
            vec![
                "imu_advance_2026",
                "flatrate_advance1_2026",
                "flatrate_advance2_2026",
                "imu_balance_2026"
            ]
        );
    }

    #[test]
    fn test_paid_state_flows_into_totals() {
        let p = profile(LeaseTaxYear::SecondYear);
        let now = Utc.with_ymd_and_hms(2026, 6, 16, 8, 0, 0).unwrap();
        let mut ledger = InMemoryLedger::new();
        toggle_paid(
            &mut ledger,
            ObligationId::new(ObligationKind::ImuAdvance, 2026),
            true,
            now,
        );

        let s = build_schedule(&p, 2026, &ledger);
        let advance = &s.obligations[0];
        assert!(advance.paid);
        assert_eq!(advance.paid_date, Some(now));
        assert_eq!(s.total_paid, dec!(890.40));
        assert_eq!(s.total_to_pay, dec!(2528.40));

        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let next = next_due(&s, today).unwrap();
        assert_eq!(next.obligation.id.to_string(), "flatrate_balance_2025");
    }
}
