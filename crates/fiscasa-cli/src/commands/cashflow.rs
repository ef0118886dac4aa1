use std::time::Instant;

use chrono::{Datelike, Local};
use clap::Args;
use serde_json::{json, Value};

use fiscasa_core::cashflow::{annual_balance, monthly_net, year_to_date, NetBasis};
use fiscasa_core::property::records::find_record;
use fiscasa_core::with_metadata;

use crate::commands::{check_month, load_dataset};

const METHODOLOGY: &str =
    "Cash basis: fee and taxes/12 charged only in months with registered rent";

/// Arguments for a single month's net
#[derive(Args)]
pub struct MonthlyNetArgs {
    /// Path to the property dataset
    #[arg(long)]
    pub input: Option<String>,

    /// Month (1-12)
    #[arg(long)]
    pub month: u32,

    /// Year (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,
}

/// Arguments for the full-year balance
#[derive(Args)]
pub struct AnnualArgs {
    /// Path to the property dataset
    #[arg(long)]
    pub input: Option<String>,

    /// Year (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,
}

/// Arguments for the year-to-date net
#[derive(Args)]
pub struct YtdArgs {
    /// Path to the property dataset
    #[arg(long)]
    pub input: Option<String>,

    /// Last month included (defaults to the current month)
    #[arg(long)]
    pub month: Option<u32>,

    /// Year (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,
}

pub fn run_monthly_net(args: MonthlyNetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let month = check_month(args.month)?;
    let year = args.year.unwrap_or_else(|| Local::now().year());
    let dataset = load_dataset(args.input.as_deref())?;

    let basis = NetBasis::for_profile(&dataset.profile, year);
    let net = monthly_net(month, year, find_record(&dataset.records, month, year), &basis);

    let mut warnings = Vec::new();
    if !net.has_data {
        warnings.push(format!("No data entered for {month:02}/{year}"));
    }

    let output = with_metadata(
        METHODOLOGY,
        &basis,
        warnings,
        start.elapsed().as_micros() as u64,
        net,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_annual(args: AnnualArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let year = args.year.unwrap_or_else(|| Local::now().year());
    let dataset = load_dataset(args.input.as_deref())?;

    let basis = NetBasis::for_profile(&dataset.profile, year);
    let balance = annual_balance(year, &dataset.records, &basis);

    let mut warnings = Vec::new();
    if balance.totals.is_empty() {
        warnings.push(format!("No income or expenses entered for {year}"));
    }

    let output = with_metadata(
        METHODOLOGY,
        &json!({ "year": year, "basis": basis }),
        warnings,
        start.elapsed().as_micros() as u64,
        balance,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_ytd(args: YtdArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let today = Local::now().date_naive();
    let month = check_month(args.month.unwrap_or_else(|| today.month()))?;
    let year = args.year.unwrap_or_else(|| today.year());
    let dataset = load_dataset(args.input.as_deref())?;

    let basis = NetBasis::for_profile(&dataset.profile, year);
    let ytd = year_to_date(year, month, &dataset.records, &basis);

    let output = with_metadata(
        METHODOLOGY,
        &json!({ "year": year, "through_month": month, "basis": basis }),
        Vec::new(),
        start.elapsed().as_micros() as u64,
        ytd,
    );
    Ok(serde_json::to_value(output)?)
}
