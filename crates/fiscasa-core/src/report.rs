use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::cashflow::{annual_balance, monthly_net, year_to_date, AnnualBalance, MonthlyNet, NetBasis, YearToDate};
use crate::property::records::{
    find_record, total_extraordinary_expenses, total_ordinary_expenses, total_registered_income,
};
use crate::property::{lease_timeline, FiscalProfile, IncomeStatus, LeaseTaxYear, LeaseTimeline, MonthlyRecord};
use crate::schedule::{build_schedule, FiscalSchedule, PaymentLedger};
use crate::taxes::flat_rate::{flat_rate_for_profile, FlatRateTaxResult};
use crate::taxes::imu::{imu_split_for_profile, ImuSplit};
use crate::types::{round_cents, with_metadata, ComputationOutput, Money};
use crate::FiscasaResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The property's profile together with its monthly register.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDataset {
    #[serde(default)]
    pub profile: FiscalProfile,
    #[serde(default)]
    pub records: Vec<MonthlyRecord>,
}

impl PropertyDataset {
    /// Parse a dataset from JSON. Field values are read leniently; only
    /// structurally invalid JSON is an error.
    pub fn from_json(json: &str) -> FiscasaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Which day the report is drawn up on and which month is being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    pub as_of: NaiveDate,
    /// Month under review (1..=12); defaults to the month of `as_of`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_month: Option<u32>,
    /// Year under review; defaults to the year of `as_of`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_year: Option<i32>,
}

/// Totals over every record in the register, regardless of year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterTotals {
    pub registered_income: Money,
    pub ordinary_expenses: Money,
    pub extraordinary_expenses: Money,
}

/// Everything the owner's overview shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalReport {
    pub as_of: NaiveDate,
    pub imu: ImuSplit,
    pub flat_rate: FlatRateTaxResult,
    /// IMU plus the flat-rate tax falling due in the fiscal year
    pub annual_tax_total: Money,
    /// `annual_tax_total` / 12, charged in months with registered income
    pub monthly_tax: Money,
    pub schedule: FiscalSchedule,
    pub selected_month: MonthlyNet,
    pub year_to_date: YearToDate,
    pub annual_balance: AnnualBalance,
    pub lease: LeaseTimeline,
    pub register: RegisterTotals,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Assemble the full fiscal and cash-flow overview for a property.
///
/// Never fails: incomplete data produces zero figures plus a warning
/// describing what is missing.
pub fn fiscal_report<L: PaymentLedger + ?Sized>(
    dataset: &PropertyDataset,
    options: &ReportOptions,
    ledger: &L,
) -> ComputationOutput<FiscalReport> {
    let start = Instant::now();
    let profile = &dataset.profile;
    let records = dataset.records.as_slice();

    let fiscal_year = options.as_of.year();
    let view_year = options.selected_year.unwrap_or(fiscal_year);
    let view_month = options
        .selected_month
        .unwrap_or_else(|| options.as_of.month())
        .clamp(1, 12);

    let imu = imu_split_for_profile(profile);
    let flat_rate = flat_rate_for_profile(profile, fiscal_year);
    let basis = NetBasis::for_profile(profile, view_year);
    let schedule = build_schedule(profile, fiscal_year, ledger);

    let report = FiscalReport {
        as_of: options.as_of,
        annual_tax_total: round_cents(basis.annual_tax_total),
        monthly_tax: round_cents(basis.monthly_tax()),
        selected_month: monthly_net(
            view_month,
            view_year,
            find_record(records, view_month, view_year),
            &basis,
        ),
        year_to_date: year_to_date(view_year, view_month, records, &basis),
        annual_balance: annual_balance(view_year, records, &basis),
        lease: lease_timeline(profile, options.as_of),
        register: RegisterTotals {
            registered_income: round_cents(total_registered_income(records)),
            ordinary_expenses: round_cents(total_ordinary_expenses(records)),
            extraordinary_expenses: round_cents(total_extraordinary_expenses(records)),
        },
        imu,
        flat_rate,
        schedule,
    };

    let warnings = collect_warnings(dataset, &report);
    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "fiscal report built from incomplete data");
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "IMU (rendita × 1.05 × 160 × rate‰) with cedolare secca at 21%, cash-basis monthly net",
        options,
        warnings,
        elapsed,
        report,
    )
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn collect_warnings(dataset: &PropertyDataset, report: &FiscalReport) -> Vec<String> {
    let profile = &dataset.profile;
    let mut warnings = Vec::new();

    if profile.main_cadastral_value + profile.appurtenant_cadastral_value <= Decimal::ZERO {
        warnings.push("No cadastral income entered: IMU computed as zero".into());
    }
    if profile.monthly_rent.is_zero() {
        warnings.push("Monthly rent is zero: flat-rate tax computed as zero".into());
    }
    if profile.lease_start.is_none() || profile.lease_end.is_none() {
        warnings.push("Lease start or end date missing: lease timeline unavailable".into());
    }
    if profile.lease_tax_year == LeaseTaxYear::ThirdYearOrLater {
        warnings.push(
            "Cedolare secca balance for prior-year variance is not computed; shown as zero".into(),
        );
    }
    for r in &dataset.records {
        if r.status == IncomeStatus::Registered && r.rent_received.is_zero() {
            warnings.push(format!(
                "{:02}/{}: marked registered with no rent received; treated as no income",
                r.month, r.year
            ));
        }
        if !(1..=12).contains(&r.month) {
            warnings.push(format!("Record with invalid month {} in {} ignored", r.month, r.year));
        }
    }
    if report.annual_balance.totals.is_empty() {
        warnings.push(format!(
            "No income or expenses entered for {}",
            report.annual_balance.year
        ));
    }

    warnings
}
