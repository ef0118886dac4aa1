use clap::Args;
use serde_json::Value;

use fiscasa_core::report::{fiscal_report, ReportOptions};

use crate::commands::{check_month, date_or_today, load_dataset, load_ledger};

/// Arguments for the full overview
#[derive(Args)]
pub struct ReportArgs {
    /// Path to the property dataset
    #[arg(long)]
    pub input: Option<String>,

    /// Path to the payment ledger JSON
    #[arg(long)]
    pub ledger: Option<String>,

    /// Report date (YYYY-MM-DD, defaults to today); fixes the fiscal year
    #[arg(long)]
    pub as_of: Option<String>,

    /// Month under review (defaults to the month of --as-of)
    #[arg(long)]
    pub month: Option<u32>,

    /// Year under review (defaults to the year of --as-of)
    #[arg(long)]
    pub year: Option<i32>,
}

pub fn run_report(args: ReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let options = ReportOptions {
        as_of: date_or_today(args.as_of.as_deref())?,
        selected_month: args.month.map(check_month).transpose()?,
        selected_year: args.year,
    };
    let dataset = load_dataset(args.input.as_deref())?;
    let ledger = load_ledger(args.ledger.as_deref())?;

    let output = fiscal_report(&dataset, &options, &ledger);
    Ok(serde_json::to_value(output)?)
}
