use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::property::FiscalProfile;
use crate::types::{lenient, normalize_amount, round_cents, Money, PerMille};

/// Rate applied when the municipality's rate is not supplied.
pub const DEFAULT_IMU_RATE_PER_MILLE: PerMille = dec!(10.6);

/// Statutory revaluation of the cadastral income (5%).
const REVALUATION_FACTOR: Decimal = dec!(1.05);

/// Cadastral multiplier for residential units (categories A, C/2, C/6, C/7).
const RESIDENTIAL_MULTIPLIER: Decimal = dec!(160);

fn default_rate() -> PerMille {
    DEFAULT_IMU_RATE_PER_MILLE
}

/// Input parameters for an IMU computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImuInput {
    /// Rendita catastale of the main unit
    #[serde(default, deserialize_with = "lenient::amount")]
    pub main_cadastral_value: Money,
    /// Rendita catastale of the appurtenant unit
    #[serde(default, deserialize_with = "lenient::amount")]
    pub appurtenant_cadastral_value: Money,
    /// Municipal rate in per-mille; 10.6 when omitted
    #[serde(default = "default_rate", deserialize_with = "lenient::amount")]
    pub rate_per_mille: PerMille,
}

impl From<&FiscalProfile> for ImuInput {
    fn from(profile: &FiscalProfile) -> Self {
        Self {
            main_cadastral_value: profile.main_cadastral_value,
            appurtenant_cadastral_value: profile.appurtenant_cadastral_value,
            rate_per_mille: profile.imu_rate_per_mille,
        }
    }
}

/// The annual IMU and its two statutory installments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImuSplit {
    pub annual: Money,
    /// Acconto, due June 16
    pub advance: Money,
    /// Saldo, due December 16
    pub balance: Money,
}

/// Annual IMU for a property.
///
/// `base = (main + appurtenant) × 1.05 × 160`, `tax = base × rate / 1000`,
/// rounded to cents. Negative inputs count as zero and a zero cadastral
/// total yields zero tax, so the result is never negative.
pub fn calculate_imu(main: Money, appurtenant: Money, rate_per_mille: PerMille) -> Money {
    let total = normalize_amount(Some(main)) + normalize_amount(Some(appurtenant));
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let rate = normalize_amount(Some(rate_per_mille));
    let tax = (total * REVALUATION_FACTOR * RESIDENTIAL_MULTIPLIER)
        .checked_mul(rate)
        .map(|t| t / dec!(1000));
    match tax {
        Some(t) => round_cents(t),
        None => {
            tracing::debug!(%total, %rate, "IMU out of range, computed as zero");
            Decimal::ZERO
        }
    }
}

pub fn imu_for(input: &ImuInput) -> Money {
    calculate_imu(
        input.main_cadastral_value,
        input.appurtenant_cadastral_value,
        input.rate_per_mille,
    )
}

/// Split an annual IMU amount into advance and balance. The advance is
/// half rounded to cents; the balance takes the remainder so the two
/// always add back to `annual`.
pub fn split_imu(annual: Money) -> ImuSplit {
    let annual = normalize_amount(Some(annual));
    let advance = round_cents(annual / dec!(2));
    ImuSplit {
        annual,
        advance,
        balance: annual - advance,
    }
}

pub fn imu_split_for_profile(profile: &FiscalProfile) -> ImuSplit {
    split_imu(imu_for(&ImuInput::from(profile)))
}
