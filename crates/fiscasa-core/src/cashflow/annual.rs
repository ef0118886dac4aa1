use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::monthly_net::{monthly_components, MonthlyNet, NetBasis};
use crate::property::records::find_record;
use crate::property::MonthlyRecord;
use crate::types::{round_cents, Money};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English name of a 1-based month, empty if out of range.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("")
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Component-wise totals over a run of months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalanceTotals {
    pub income: Money,
    pub recurring_fees: Money,
    pub extra_ordinary: Money,
    pub extra_extraordinary: Money,
    /// Recurring fees plus ordinary extras
    pub ordinary_expenses: Money,
    pub taxes: Money,
    pub net: Money,
    pub months_with_data: u32,
}

/// Net figure of one month inside a year-to-date view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: u32,
    pub month_name: String,
    pub net: Money,
    pub has_data: bool,
}

/// Full-year balance breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualBalance {
    pub year: i32,
    pub totals: BalanceTotals,
    pub months: Vec<MonthlyNet>,
}

/// Running net from January through the selected month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearToDate {
    pub year: i32,
    pub through_month: u32,
    pub total_net: Money,
    pub months: Vec<MonthSummary>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Sum the monthly net calculation for months `1..=through_month` of
/// `year`, clamped to 1..=12. Months without a record contribute zero.
/// Components are summed unrounded and rounded once at the end.
pub fn aggregate(
    year: i32,
    through_month: u32,
    records: &[MonthlyRecord],
    basis: &NetBasis,
) -> (BalanceTotals, Vec<MonthlyNet>) {
    let last = through_month.clamp(1, 12);
    let raw: Vec<MonthlyNet> = (1..=last)
        .map(|m| monthly_components(m, year, find_record(records, m, year), basis))
        .collect();

    let mut totals = BalanceTotals::default();
    for m in &raw {
        totals.income += m.income;
        totals.recurring_fees += m.recurring_fee;
        totals.extra_ordinary += m.extra_ordinary;
        totals.extra_extraordinary += m.extra_extraordinary;
        totals.taxes += m.taxes;
        totals.net += m.net;
        if m.has_data {
            totals.months_with_data += 1;
        }
    }

    let totals = BalanceTotals {
        income: round_cents(totals.income),
        recurring_fees: round_cents(totals.recurring_fees),
        extra_ordinary: round_cents(totals.extra_ordinary),
        extra_extraordinary: round_cents(totals.extra_extraordinary),
        ordinary_expenses: round_cents(totals.recurring_fees + totals.extra_ordinary),
        taxes: round_cents(totals.taxes),
        net: round_cents(totals.net),
        months_with_data: totals.months_with_data,
    };
    let months = raw.into_iter().map(MonthlyNet::rounded).collect();
    (totals, months)
}

/// Balance for the whole of `year`.
pub fn annual_balance(year: i32, records: &[MonthlyRecord], basis: &NetBasis) -> AnnualBalance {
    let (totals, months) = aggregate(year, 12, records, basis);
    AnnualBalance {
        year,
        totals,
        months,
    }
}

/// Running net from January to `selected_month` of `year`.
pub fn year_to_date(
    year: i32,
    selected_month: u32,
    records: &[MonthlyRecord],
    basis: &NetBasis,
) -> YearToDate {
    let (totals, months) = aggregate(year, selected_month, records, basis);
    YearToDate {
        year,
        through_month: selected_month.clamp(1, 12),
        total_net: totals.net,
        months: months
            .into_iter()
            .map(|m| MonthSummary {
                month: m.month,
                month_name: month_name(m.month).to_string(),
                net: m.net,
                has_data: m.has_data,
            })
            .collect(),
    }
}

impl BalanceTotals {
    pub fn is_empty(&self) -> bool {
        self.months_with_data == 0 && self.net == Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 12, 31).unwrap()
    }

    fn year_of_records(registered: &[(u32, Money)]) -> Vec<MonthlyRecord> {
        (1..=12)
            .map(|m| {
                let mut r = MonthlyRecord::awaited(m, 2026, dec!(80));
                if let Some((_, rent)) = registered.iter().find(|(month, _)| *month == m) {
                    r.register_income(Some(*rent), None, today());
                }
                r
            })
            .collect()
    }

    #[test]
    fn test_no_registered_months_nets_to_zero() {
        let basis = NetBasis::new(dec!(80), dec!(1200));
        let balance = annual_balance(2026, &year_of_records(&[]), &basis);
        assert_eq!(balance.totals.net, Decimal::ZERO);
        assert_eq!(balance.totals.months_with_data, 0);
        assert!(balance.totals.is_empty());
        let twelve_zeroes: Money = balance.months.iter().map(|m| m.net).sum();
        assert_eq!(balance.totals.net, twelve_zeroes);
    }

    #[test]
    fn test_empty_register_tolerated() {
        let basis = NetBasis::new(dec!(80), dec!(1200));
        let balance = annual_balance(2026, &[], &basis);
        assert_eq!(balance.months.len(), 12);
        assert_eq!(balance.totals, BalanceTotals::default());
    }

    #[test]
    fn test_cash_basis_only_charges_registered_months() {
        let basis = NetBasis::new(dec!(80), dec!(1200));
        let records = year_of_records(&[(1, dec!(650)), (2, dec!(650)), (4, dec!(650))]);
        let balance = annual_balance(2026, &records, &basis);
        assert_eq!(balance.totals.income, dec!(1950));
        assert_eq!(balance.totals.recurring_fees, dec!(240));
        assert_eq!(balance.totals.taxes, dec!(300));
        assert_eq!(balance.totals.net, dec!(1410));
        assert_eq!(balance.totals.months_with_data, 3);
        assert_eq!(balance.months.iter().filter(|m| m.has_data).count(), 3);
    }

    #[test]
    fn test_sums_unrounded_monthly_tax() {
        // 1000 / 12 = 83.333..; twelve months sum to exactly 1000.00
        let basis = NetBasis::new(dec!(0), dec!(1000));
        let all: Vec<(u32, Money)> = (1..=12).map(|m| (m, dec!(500))).collect();
        let balance = annual_balance(2026, &year_of_records(&all), &basis);
        assert_eq!(balance.totals.taxes, dec!(1000.00));
        assert_eq!(balance.months[0].taxes, dec!(83.33));
    }

    #[test]
    fn test_year_to_date_stops_at_selected_month() {
        let basis = NetBasis::new(dec!(80), dec!(1200));
        let records = year_of_records(&[(1, dec!(650)), (3, dec!(650)), (6, dec!(650))]);
        let ytd = year_to_date(2026, 3, &records, &basis);
        assert_eq!(ytd.through_month, 3);
        assert_eq!(ytd.months.len(), 3);
        assert_eq!(ytd.months[1].month_name, "February");
        assert!(!ytd.months[1].has_data);
        assert_eq!(ytd.total_net, dec!(940));
    }

    #[test]
    fn test_ytd_bound_is_clamped() {
        let basis = NetBasis::new(dec!(80), dec!(1200));
        assert_eq!(year_to_date(2026, 0, &[], &basis).months.len(), 1);
        assert_eq!(year_to_date(2026, 40, &[], &basis).months.len(), 12);
    }

    #[test]
    fn test_other_years_ignored() {
        let basis = NetBasis::new(dec!(80), dec!(1200));
        let records = year_of_records(&[(1, dec!(650))]);
        assert_eq!(annual_balance(2025, &records, &basis).totals.net, Decimal::ZERO);
    }
}
