use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{lenient, normalize_amount, Money};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Collection state of a month's rent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Value")]
pub enum IncomeStatus {
    #[default]
    Awaited,
    Registered,
    Late,
}

/// Non-string tags (numbers, objects) read as the default variant.
impl From<Value> for IncomeStatus {
    fn from(tag: Value) -> Self {
        Self::from(tag.as_str().map(str::to_owned))
    }
}

impl From<Option<String>> for IncomeStatus {
    fn from(tag: Option<String>) -> Self {
        match tag.as_deref().map(str::trim) {
            Some("registered") | Some("registrato") => IncomeStatus::Registered,
            Some("late") | Some("ritardo") => IncomeStatus::Late,
            _ => IncomeStatus::Awaited,
        }
    }
}

/// Expense category. Expenses recorded before categories existed carry no
/// tag and are read as extraordinary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Value")]
pub enum ExpenseCategory {
    Ordinary,
    #[default]
    Extraordinary,
}

/// Non-string tags (numbers, objects) read as the default variant.
impl From<Value> for ExpenseCategory {
    fn from(tag: Value) -> Self {
        Self::from(tag.as_str().map(str::to_owned))
    }
}

impl From<Option<String>> for ExpenseCategory {
    fn from(tag: Option<String>) -> Self {
        match tag.as_deref().map(str::trim) {
            Some("ordinary") | Some("ordinaria") => ExpenseCategory::Ordinary,
            _ => ExpenseCategory::Extraordinary,
        }
    }
}

/// A one-off expense booked against a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraExpense {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: Money,
    #[serde(default)]
    pub category: ExpenseCategory,
}

/// An expense to be added to a month; the id is assigned on insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub description: String,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: Money,
    #[serde(default)]
    pub category: ExpenseCategory,
}

/// Cash actually received and spent in one calendar month.
///
/// Invariant: `status == Registered` implies `rent_received > 0`. The
/// mutators below maintain it; deserialized data is not trusted to, so
/// readers go through [`MonthlyRecord::has_registered_income`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    pub month: u32,
    pub year: i32,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub rent_received: Money,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub condominium_fee: Money,
    #[serde(default, deserialize_with = "lenient::date")]
    pub received_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: IncomeStatus,
    #[serde(default)]
    pub extra_expenses: Vec<ExtraExpense>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Single-record operations
// ---------------------------------------------------------------------------

impl MonthlyRecord {
    /// A fresh month with no cash recorded.
    pub fn awaited(month: u32, year: i32, condominium_fee: Money) -> Self {
        Self {
            month,
            year,
            rent_received: Decimal::ZERO,
            condominium_fee: normalize_amount(Some(condominium_fee)),
            received_date: None,
            status: IncomeStatus::Awaited,
            extra_expenses: Vec::new(),
            notes: None,
        }
    }

    pub fn is_for(&self, month: u32, year: i32) -> bool {
        self.month == month && self.year == year
    }

    /// True only when rent was both marked registered and actually received.
    pub fn has_registered_income(&self) -> bool {
        self.status == IncomeStatus::Registered && self.rent_received > Decimal::ZERO
    }

    /// Record rent received. A positive amount marks the month registered,
    /// dated `received` or, failing that, `today`. A zero or invalid amount
    /// clears the month instead.
    pub fn register_income(
        &mut self,
        amount: Option<Money>,
        received: Option<NaiveDate>,
        today: NaiveDate,
    ) {
        let amount = normalize_amount(amount);
        if amount.is_zero() {
            self.clear_income();
            return;
        }
        self.rent_received = amount;
        self.status = IncomeStatus::Registered;
        self.received_date = Some(received.unwrap_or(today));
        tracing::debug!(month = self.month, year = self.year, %amount, "income registered");
    }

    /// Forget any rent recorded for this month.
    pub fn clear_income(&mut self) {
        self.rent_received = Decimal::ZERO;
        self.status = IncomeStatus::Awaited;
        self.received_date = None;
        tracing::debug!(month = self.month, year = self.year, "income cleared");
    }

    /// Flag the rent as overdue. Has no effect on a registered month.
    pub fn mark_late(&mut self) {
        if !self.has_registered_income() {
            self.status = IncomeStatus::Late;
        }
    }

    /// Append an expense, assigning it an id unique within this month.
    pub fn add_expense(&mut self, expense: NewExpense) -> &ExtraExpense {
        let next = self
            .extra_expenses
            .iter()
            .filter_map(|e| e.id.rsplit('-').next()?.parse::<u32>().ok())
            .max()
            .map_or(1, |n| n + 1);
        let id = format!("exp-{}{:02}-{}", self.year, self.month, next);
        self.extra_expenses.push(ExtraExpense {
            id,
            description: expense.description,
            date: expense.date,
            amount: normalize_amount(Some(expense.amount)),
            category: expense.category,
        });
        &self.extra_expenses[self.extra_expenses.len() - 1]
    }

    /// Remove an expense by id. Returns whether anything was removed.
    pub fn remove_expense(&mut self, id: &str) -> bool {
        let before = self.extra_expenses.len();
        self.extra_expenses.retain(|e| e.id != id);
        before != self.extra_expenses.len()
    }

    pub fn expenses_in(&self, category: ExpenseCategory) -> Money {
        self.extra_expenses
            .iter()
            .filter(|e| e.category == category)
            .map(|e| normalize_amount(Some(e.amount)))
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Register-wide lookups and totals
// ---------------------------------------------------------------------------

pub fn find_record(records: &[MonthlyRecord], month: u32, year: i32) -> Option<&MonthlyRecord> {
    records.iter().find(|r| r.is_for(month, year))
}

pub fn find_record_mut(
    records: &mut [MonthlyRecord],
    month: u32,
    year: i32,
) -> Option<&mut MonthlyRecord> {
    records.iter_mut().find(|r| r.is_for(month, year))
}

/// Rent received across all registered months.
pub fn total_registered_income(records: &[MonthlyRecord]) -> Money {
    records
        .iter()
        .filter(|r| r.has_registered_income())
        .map(|r| r.rent_received)
        .sum()
}

/// Extraordinary (or untagged) expenses across all months.
pub fn total_extraordinary_expenses(records: &[MonthlyRecord]) -> Money {
    records
        .iter()
        .map(|r| r.expenses_in(ExpenseCategory::Extraordinary))
        .sum()
}

/// Ordinary running costs: each registered month's condominium fee plus
/// every expense tagged ordinary.
pub fn total_ordinary_expenses(records: &[MonthlyRecord]) -> Money {
    let fees: Money = records
        .iter()
        .filter(|r| r.has_registered_income())
        .map(|r| r.condominium_fee)
        .sum();
    let extras: Money = records
        .iter()
        .map(|r| r.expenses_in(ExpenseCategory::Ordinary))
        .sum();
    fees + extras
}
