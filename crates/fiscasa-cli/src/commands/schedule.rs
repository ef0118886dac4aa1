use std::time::Instant;

use chrono::{Datelike, Local, Utc};
use clap::Args;
use serde_json::{json, Value};

use fiscasa_core::schedule::{build_schedule, next_due, toggle_paid, ObligationId};
use fiscasa_core::with_metadata;

use crate::commands::{load_dataset, load_ledger};
use crate::input;

/// Arguments for the fiscal calendar
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to the property dataset (profile and monthly records)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to the payment ledger JSON
    #[arg(long)]
    pub ledger: Option<String>,

    /// Fiscal year (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,
}

/// Arguments for marking an obligation paid or unpaid
#[derive(Args)]
pub struct TogglePaidArgs {
    /// Obligation identifier, e.g. imu_advance_2026 or flatrate_advance1_2026
    pub id: String,

    /// Path to the payment ledger JSON (created if missing)
    #[arg(long)]
    pub ledger: String,

    /// Mark the obligation unpaid instead of paid
    #[arg(long)]
    pub unpaid: bool,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let dataset = load_dataset(args.input.as_deref())?;
    let ledger = load_ledger(args.ledger.as_deref())?;
    let today = Local::now().date_naive();
    let year = args.year.unwrap_or_else(|| today.year());

    let schedule = build_schedule(&dataset.profile, year, &ledger);
    let next = next_due(&schedule, today).map(|o| o.obligation.id.to_string());

    let mut warnings = Vec::new();
    if schedule.obligations.iter().all(|o| o.obligation.amount.is_zero()) {
        warnings.push(format!("Every obligation for {year} is zero: check the profile"));
    }

    let recorded_paid: Vec<String> = ledger
        .iter()
        .filter(|(_, state)| state.paid)
        .map(|(id, _)| id.to_string())
        .collect();

    let output = with_metadata(
        "IMU June 16 / December 16; cedolare secca per lease tax year; paid state from ledger",
        &json!({ "year": year, "ledger_paid": recorded_paid }),
        warnings,
        start.elapsed().as_micros() as u64,
        json!({ "schedule": schedule, "next_due": next }),
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_toggle_paid(args: TogglePaidArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let id: ObligationId = args.id.parse()?;
    let mut ledger = load_ledger(Some(args.ledger.as_str()))?;

    let state = toggle_paid(&mut ledger, id, !args.unpaid, Utc::now());
    input::file::write_text(&args.ledger, &ledger.to_json()?)?;

    Ok(json!({
        "id": id,
        "paid": state.paid,
        "paid_date": state.paid_date,
        "ledger_entries": ledger.len(),
    }))
}
