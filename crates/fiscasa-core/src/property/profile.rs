use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::taxes::imu::DEFAULT_IMU_RATE_PER_MILLE;
use crate::types::{lenient, normalize_amount, Money, PerMille};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which year of the flat-rate (cedolare secca) regime the owner declares.
///
/// This is set explicitly by the owner and never derived from the lease
/// dates. Unknown tags fall back to `ThirdYearOrLater`, the steady state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Value")]
pub enum LeaseTaxYear {
    /// No advances; the whole year is settled next June.
    FirstYear,
    /// No advances; last year's tax is settled this June.
    SecondYear,
    /// Two advances (40% June, 60% November) in the current year.
    #[default]
    ThirdYearOrLater,
}

/// Non-string tags (numbers, objects) read as the default variant.
impl From<Value> for LeaseTaxYear {
    fn from(tag: Value) -> Self {
        Self::from(tag.as_str().map(str::to_owned))
    }
}

impl From<Option<String>> for LeaseTaxYear {
    fn from(tag: Option<String>) -> Self {
        match tag.as_deref().map(str::trim) {
            Some("first_year") | Some("primo") => LeaseTaxYear::FirstYear,
            Some("second_year") | Some("secondo") => LeaseTaxYear::SecondYear,
            _ => LeaseTaxYear::ThirdYearOrLater,
        }
    }
}

fn default_imu_rate() -> PerMille {
    DEFAULT_IMU_RATE_PER_MILLE
}

/// Everything the fiscal calculators need to know about the property and
/// its lease. All amounts are normalized on input: missing, negative or
/// non-numeric values read as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiscalProfile {
    /// Rendita catastale of the main unit
    #[serde(default, deserialize_with = "lenient::amount")]
    pub main_cadastral_value: Money,
    /// Rendita catastale of the appurtenant unit (garage, cellar), zero if none
    #[serde(default, deserialize_with = "lenient::amount")]
    pub appurtenant_cadastral_value: Money,
    /// Municipal IMU rate in per-mille
    #[serde(default = "default_imu_rate", deserialize_with = "lenient::amount")]
    pub imu_rate_per_mille: PerMille,
    #[serde(default, deserialize_with = "lenient::date")]
    pub lease_start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub lease_end: Option<NaiveDate>,
    /// Contractual monthly rent
    #[serde(default, deserialize_with = "lenient::amount")]
    pub monthly_rent: Money,
    /// Recurring monthly condominium fee borne by the owner
    #[serde(default, deserialize_with = "lenient::amount")]
    pub condominium_fee: Money,
    #[serde(default)]
    pub lease_tax_year: LeaseTaxYear,
}

impl Default for FiscalProfile {
    fn default() -> Self {
        Self {
            main_cadastral_value: Decimal::ZERO,
            appurtenant_cadastral_value: Decimal::ZERO,
            imu_rate_per_mille: DEFAULT_IMU_RATE_PER_MILLE,
            lease_start: None,
            lease_end: None,
            monthly_rent: Decimal::ZERO,
            condominium_fee: Decimal::ZERO,
            lease_tax_year: LeaseTaxYear::default(),
        }
    }
}

impl FiscalProfile {
    /// Contractual rent over twelve months.
    pub fn annual_rent(&self) -> Money {
        normalize_amount(Some(self.monthly_rent)) * Decimal::from(12)
    }

    /// Calendar year in which the lease started, if the start date is known.
    pub fn lease_start_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.lease_start.map(|d| d.year())
    }
}
