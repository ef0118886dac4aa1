pub mod builder;
pub mod ledger;
pub mod obligation;

pub use builder::{build_schedule, compute_obligations, next_due, FiscalSchedule, ScheduledObligation};
pub use ledger::{toggle_paid, InMemoryLedger, PaymentLedger, PaymentState};
pub use obligation::{FiscalObligation, ObligationId, ObligationKind};
