use std::time::Instant;

use chrono::{Datelike, Local};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use fiscasa_core::property::LeaseTaxYear;
use fiscasa_core::taxes::flat_rate::{schedule_flat_rate_tax, set_aside_for_next_year};
use fiscasa_core::taxes::imu::{self, ImuInput, DEFAULT_IMU_RATE_PER_MILLE};
use fiscasa_core::{normalize_amount, with_metadata};

use crate::input;

/// Arguments for the IMU calculation
#[derive(Args)]
pub struct ImuArgs {
    /// Rendita catastale of the main unit
    #[arg(long)]
    pub main_cadastral_value: Option<Decimal>,

    /// Rendita catastale of the appurtenant unit (garage, cellar)
    #[arg(long, default_value = "0")]
    pub appurtenant_cadastral_value: Decimal,

    /// Municipal IMU rate in per-mille (e.g. 10.6)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the flat-rate (cedolare secca) plan
#[derive(Args)]
pub struct FlatRateArgs {
    /// Monthly rent under contract
    #[arg(long)]
    pub monthly_rent: Decimal,

    /// Lease tax year: first_year, second_year or third_year_or_later
    #[arg(long, default_value = "third_year_or_later")]
    pub regime: String,

    /// Calendar year of the plan (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,
}

pub fn run_imu(args: ImuArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let imu_input: ImuInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(text) = input::stdin::read_stdin()? {
        serde_json::from_str(&text)?
    } else {
        ImuInput {
            main_cadastral_value: args
                .main_cadastral_value
                .ok_or("--main-cadastral-value is required (or provide --input)")?,
            appurtenant_cadastral_value: args.appurtenant_cadastral_value,
            rate_per_mille: args.rate.unwrap_or(DEFAULT_IMU_RATE_PER_MILLE),
        }
    };

    let split = imu::split_imu(imu::imu_for(&imu_input));
    let mut warnings = Vec::new();
    if split.annual.is_zero() {
        warnings.push("Cadastral income or rate is zero: IMU computed as zero".to_string());
    }

    let output = with_metadata(
        "IMU: (main + appurtenant) × 1.05 × 160 × rate / 1000, half advance in June",
        &imu_input,
        warnings,
        start.elapsed().as_micros() as u64,
        split,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_flat_rate(args: FlatRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let regime = LeaseTaxYear::from(Some(args.regime.clone()));
    let year = args.year.unwrap_or_else(|| Local::now().year());
    let annual_rent = normalize_amount(Some(args.monthly_rent)) * Decimal::from(12);

    let plan = schedule_flat_rate_tax(annual_rent, regime, year);
    let set_aside = set_aside_for_next_year(&plan);

    let mut warnings = Vec::new();
    if regime == LeaseTaxYear::ThirdYearOrLater {
        warnings.push("Balance for prior-year variance is not computed; shown as zero".to_string());
    }

    let output = with_metadata(
        "Cedolare secca at 21% of annual rent; advances 40% June 30 and 60% November 30",
        &json!({ "monthly_rent": args.monthly_rent, "regime": regime, "year": year }),
        warnings,
        start.elapsed().as_micros() as u64,
        json!({ "plan": plan, "set_aside_next_year": set_aside }),
    );
    Ok(serde_json::to_value(output)?)
}
