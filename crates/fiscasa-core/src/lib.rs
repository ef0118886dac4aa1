pub mod cashflow;
pub mod error;
pub mod property;
pub mod report;
pub mod schedule;
pub mod taxes;
pub mod types;

pub use error::FiscasaError;
pub use types::*;

/// Standard result type for fallible fiscasa operations (parsing and I/O
/// boundaries; the calculations themselves are total)
pub type FiscasaResult<T> = Result<T, FiscasaError>;
