use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::property::{ExpenseCategory, FiscalProfile, MonthlyRecord};
use crate::taxes::annual_tax_total;
use crate::types::{normalize_amount, round_cents, Money};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Constants shared by every month of a year's net calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetBasis {
    /// Condominium fee charged in each month with registered income
    pub recurring_fee: Money,
    /// Taxes payable over the year, prorated by twelve
    pub annual_tax_total: Money,
}

/// Cash-basis result for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyNet {
    pub month: u32,
    pub year: i32,
    pub income: Money,
    pub recurring_fee: Money,
    pub extra_ordinary: Money,
    pub extra_extraordinary: Money,
    pub taxes: Money,
    pub net: Money,
    /// False when nothing was entered for the month, as opposed to a month
    /// whose figures happen to net to zero
    pub has_data: bool,
}

impl NetBasis {
    pub fn new(recurring_fee: Money, annual_tax_total: Money) -> Self {
        Self {
            recurring_fee: normalize_amount(Some(recurring_fee)),
            annual_tax_total: normalize_amount(Some(annual_tax_total)),
        }
    }

    /// Basis for `year` from the profile's fee and that year's taxes.
    pub fn for_profile(profile: &FiscalProfile, year: i32) -> Self {
        Self::new(profile.condominium_fee, annual_tax_total(profile, year))
    }

    pub fn monthly_tax(&self) -> Money {
        self.annual_tax_total / Decimal::from(12)
    }
}

impl MonthlyNet {
    fn empty(month: u32, year: i32) -> Self {
        Self {
            month,
            year,
            income: Decimal::ZERO,
            recurring_fee: Decimal::ZERO,
            extra_ordinary: Decimal::ZERO,
            extra_extraordinary: Decimal::ZERO,
            taxes: Decimal::ZERO,
            net: Decimal::ZERO,
            has_data: false,
        }
    }

    pub(crate) fn rounded(self) -> Self {
        Self {
            income: round_cents(self.income),
            recurring_fee: round_cents(self.recurring_fee),
            extra_ordinary: round_cents(self.extra_ordinary),
            extra_extraordinary: round_cents(self.extra_extraordinary),
            taxes: round_cents(self.taxes),
            net: round_cents(self.net),
            ..self
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Net result for (`month`, `year`) on a cash basis, rounded to cents.
///
/// The recurring fee and the monthly share of taxes are charged only in
/// months where rent was actually registered: they follow cash receipts,
/// not the calendar. Expenses are charged whenever they were entered.
pub fn monthly_net(
    month: u32,
    year: i32,
    record: Option<&MonthlyRecord>,
    basis: &NetBasis,
) -> MonthlyNet {
    monthly_components(month, year, record, basis).rounded()
}

/// Same as [`monthly_net`] but unrounded, for summation across months.
pub(crate) fn monthly_components(
    month: u32,
    year: i32,
    record: Option<&MonthlyRecord>,
    basis: &NetBasis,
) -> MonthlyNet {
    let Some(record) = record.filter(|r| r.is_for(month, year) && (1..=12).contains(&month))
    else {
        return MonthlyNet::empty(month, year);
    };

    let registered = record.has_registered_income();
    if !registered && record.extra_expenses.is_empty() {
        return MonthlyNet::empty(month, year);
    }

    let (income, recurring_fee, taxes) = if registered {
        (record.rent_received, basis.recurring_fee, basis.monthly_tax())
    } else {
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    };
    let extra_ordinary = record.expenses_in(ExpenseCategory::Ordinary);
    let extra_extraordinary = record.expenses_in(ExpenseCategory::Extraordinary);

    MonthlyNet {
        month,
        year,
        income,
        recurring_fee,
        extra_ordinary,
        extra_extraordinary,
        taxes,
        net: income - recurring_fee - extra_ordinary - extra_extraordinary - taxes,
        has_data: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::NewExpense;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 3).unwrap()
    }

    fn registered(month: u32, rent: Money) -> MonthlyRecord {
        let mut r = MonthlyRecord::awaited(month, 2026, dec!(80));
        r.register_income(Some(rent), None, today());
        r
    }

    fn add(r: &mut MonthlyRecord, amount: Money, category: ExpenseCategory) {
        r.add_expense(NewExpense {
            description: "expense".into(),
            date: Some(today()),
            amount,
            category,
        });
    }

    #[test]
    fn test_worked_example() {
        let basis = NetBasis::new(dec!(80), dec!(1200));
        let record = registered(5, dec!(650));
        let m = monthly_net(5, 2026, Some(&record), &basis);
        assert!(m.has_data);
        assert_eq!(m.income, dec!(650));
        assert_eq!(m.recurring_fee, dec!(80));
        assert_eq!(m.taxes, dec!(100));
        assert_eq!(m.net, dec!(470));
    }

    #[test]
    fn test_month_without_record_has_no_data() {
        let m = monthly_net(7, 2026, None, &NetBasis::new(dec!(80), dec!(1200)));
        assert!(!m.has_data);
        assert_eq!(m.net, Decimal::ZERO);
    }

    #[test]
    fn test_awaited_month_without_expenses_has_no_data() {
        let record = MonthlyRecord::awaited(7, 2026, dec!(80));
        let m = monthly_net(7, 2026, Some(&record), &NetBasis::new(dec!(80), dec!(1200)));
        assert_eq!(m, MonthlyNet::empty(7, 2026));
    }

    #[test]
    fn test_expense_only_month_charges_no_fee_or_tax() {
        let mut record = MonthlyRecord::awaited(8, 2026, dec!(80));
        add(&mut record, dec!(150), ExpenseCategory::Extraordinary);
        add(&mut record, dec!(30), ExpenseCategory::Ordinary);
        let m = monthly_net(8, 2026, Some(&record), &NetBasis::new(dec!(80), dec!(1200)));
        assert!(m.has_data);
        assert_eq!(m.income, Decimal::ZERO);
        assert_eq!(m.recurring_fee, Decimal::ZERO);
        assert_eq!(m.taxes, Decimal::ZERO);
        assert_eq!(m.extra_ordinary, dec!(30));
        assert_eq!(m.extra_extraordinary, dec!(150));
        assert_eq!(m.net, dec!(-180));
    }

    #[test]
    fn test_registered_month_with_expenses() {
        let mut record = registered(9, dec!(650));
        add(&mut record, dec!(45.50), ExpenseCategory::Ordinary);
        let m = monthly_net(9, 2026, Some(&record), &NetBasis::new(dec!(80), dec!(3418.80)));
        // 3418.80 / 12 = 284.90
        assert_eq!(m.taxes, dec!(284.90));
        assert_eq!(m.net, dec!(239.60));
    }

    #[test]
    fn test_mismatched_or_invalid_month_has_no_data() {
        let record = registered(5, dec!(650));
        let basis = NetBasis::new(dec!(80), dec!(1200));
        assert!(!monthly_net(6, 2026, Some(&record), &basis).has_data);
        assert!(!monthly_net(13, 2026, Some(&record), &basis).has_data);
    }

    #[test]
    fn test_negative_basis_normalizes() {
        let basis = NetBasis::new(dec!(-80), dec!(-1200));
        assert_eq!(basis.recurring_fee, Decimal::ZERO);
        assert_eq!(basis.monthly_tax(), Decimal::ZERO);
    }
}
