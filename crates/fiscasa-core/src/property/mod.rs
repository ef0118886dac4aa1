pub mod lease;
pub mod profile;
pub mod records;

pub use lease::{generate_monthly_records, lease_timeline, LeaseTimeline};
pub use profile::{FiscalProfile, LeaseTaxYear};
pub use records::{ExpenseCategory, ExtraExpense, IncomeStatus, MonthlyRecord, NewExpense};
