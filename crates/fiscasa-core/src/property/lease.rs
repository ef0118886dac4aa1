use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::profile::FiscalProfile;
use super::records::MonthlyRecord;

/// Where today falls within the lease term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseTimeline {
    /// Whole days until the lease ends, never negative
    pub remaining_days: i64,
    /// Share of the lease term elapsed, 0..=100
    pub progress_pct: u32,
}

/// Days from `today` to `end`, floored at zero. Unknown end date gives 0.
pub fn remaining_days(end: Option<NaiveDate>, today: NaiveDate) -> i64 {
    match end {
        Some(end) => (end - today).num_days().max(0),
        None => 0,
    }
}

/// Percentage of the lease term elapsed at `today`, rounded and clamped to
/// 0..=100. Unknown dates or a non-positive term give 0.
pub fn progress(start: Option<NaiveDate>, end: Option<NaiveDate>, today: NaiveDate) -> u32 {
    let (Some(start), Some(end)) = (start, end) else {
        return 0;
    };
    let total = (end - start).num_days();
    if total <= 0 {
        return 0;
    }
    let elapsed = (today - start).num_days();
    let pct = (Decimal::from(elapsed) * Decimal::from(100) / Decimal::from(total))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    pct.clamp(Decimal::ZERO, Decimal::from(100))
        .to_u32()
        .unwrap_or(0)
}

pub fn lease_timeline(profile: &FiscalProfile, today: NaiveDate) -> LeaseTimeline {
    LeaseTimeline {
        remaining_days: remaining_days(profile.lease_end, today),
        progress_pct: progress(profile.lease_start, profile.lease_end, today),
    }
}

/// One `awaited` record for every calendar month touched by the lease,
/// from the start month to the end month inclusive. Empty if either date
/// is unknown or the lease ends before it starts.
pub fn generate_monthly_records(profile: &FiscalProfile) -> Vec<MonthlyRecord> {
    let (Some(start), Some(end)) = (profile.lease_start, profile.lease_end) else {
        return Vec::new();
    };

    let mut records = Vec::new();
    let (mut year, mut month) = (start.year(), start.month());
    let last = (end.year(), end.month());

    while (year, month) <= last {
        records.push(MonthlyRecord::awaited(month, year, profile.condominium_fee));
        if month == 12 {
            month = 1;
            year += 1;
        } else {
            month += 1;
        }
    }

    tracing::debug!(count = records.len(), %start, %end, "generated monthly records for lease");
    records
}
