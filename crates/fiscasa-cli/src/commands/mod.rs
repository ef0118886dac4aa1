pub mod cashflow;
pub mod records;
pub mod report;
pub mod schedule;
pub mod taxes;

use chrono::{Local, NaiveDate};
use fiscasa_core::report::PropertyDataset;
use fiscasa_core::schedule::InMemoryLedger;
use fiscasa_core::FiscasaError;

use crate::input;

/// Load the property dataset from `--input`, or from stdin when piped.
pub fn load_dataset(path: Option<&str>) -> Result<PropertyDataset, Box<dyn std::error::Error>> {
    let json = match path {
        Some(path) => input::file::read_text(path)?,
        None => input::stdin::read_stdin()?
            .ok_or("--input is required (or pipe a dataset on stdin)")?,
    };
    Ok(PropertyDataset::from_json(&json)?)
}

/// Load the payment ledger; no path or a missing file is an empty ledger.
pub fn load_ledger(path: Option<&str>) -> Result<InMemoryLedger, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(InMemoryLedger::from_json(&input::file::read_text_or_empty(path)?)?),
        None => Ok(InMemoryLedger::new()),
    }
}

/// Parse a `YYYY-MM-DD` argument, defaulting to today.
pub fn date_or_today(arg: Option<&str>) -> Result<NaiveDate, FiscasaError> {
    match arg {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|e| FiscasaError::DateError(format!("'{s}': {e}"))),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn check_month(month: u32) -> Result<u32, FiscasaError> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(FiscasaError::InvalidInput {
            field: "month".into(),
            reason: format!("{month} is not a calendar month (1-12)"),
        })
    }
}
