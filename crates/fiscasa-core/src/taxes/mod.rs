pub mod flat_rate;
pub mod imu;

use chrono::NaiveDate;

use crate::property::FiscalProfile;
use crate::types::Money;

/// Calendar date of a statutory deadline. Deadlines are fixed month/day
/// pairs, so this only falls back for years outside chrono's range.
pub(crate) fn due_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Taxes actually payable in `year`: the annual IMU plus the part of the
/// flat-rate tax that falls due this year. This is the figure prorated
/// across registered months by the cash-basis net calculation.
pub fn annual_tax_total(profile: &FiscalProfile, year: i32) -> Money {
    let imu = imu::imu_split_for_profile(profile).annual;
    let flat = flat_rate::flat_rate_for_profile(profile, year);
    imu + flat.due_this_cycle
}
