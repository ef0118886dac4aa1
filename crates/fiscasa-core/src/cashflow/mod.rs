pub mod annual;
pub mod monthly_net;

pub use annual::{annual_balance, year_to_date, AnnualBalance, BalanceTotals, MonthSummary, YearToDate};
pub use monthly_net::{monthly_net, MonthlyNet, NetBasis};
