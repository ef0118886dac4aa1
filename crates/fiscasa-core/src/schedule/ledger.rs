use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::obligation::ObligationId;
use crate::FiscasaResult;

/// Whether an obligation has been paid, and when the owner said so.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentState {
    pub paid: bool,
    #[serde(default)]
    pub paid_date: Option<DateTime<Utc>>,
}

/// Keyed store of payment states. Single writer, last write wins.
///
/// The ledger only knows identifiers and paid flags; amounts and labels
/// always come from the recomputed schedule.
pub trait PaymentLedger {
    fn get(&self, id: &ObligationId) -> Option<PaymentState>;
    fn upsert(&mut self, id: ObligationId, state: PaymentState);
}

/// Ledger held in memory, serializable as a JSON object keyed by the
/// canonical identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryLedger {
    entries: BTreeMap<ObligationId, PaymentState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ObligationId, &PaymentState)> {
        self.entries.iter()
    }

    /// Load a ledger saved with [`InMemoryLedger::to_json`]. Keys that are
    /// not valid obligation identifiers are an error.
    pub fn from_json(json: &str) -> FiscasaResult<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> FiscasaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl PaymentLedger for InMemoryLedger {
    fn get(&self, id: &ObligationId) -> Option<PaymentState> {
        self.entries.get(id).copied()
    }

    fn upsert(&mut self, id: ObligationId, state: PaymentState) {
        self.entries.insert(id, state);
    }
}

/// Set an obligation's paid flag.
///
/// An existing entry is overwritten, stamped with `now` when paid and
/// with no date when unpaid. A missing entry is created only when marking
/// paid; unmarking something never recorded leaves the ledger untouched.
/// Returns the state now in effect.
pub fn toggle_paid<L: PaymentLedger + ?Sized>(
    ledger: &mut L,
    id: ObligationId,
    paid: bool,
    now: DateTime<Utc>,
) -> PaymentState {
    let state = PaymentState {
        paid,
        paid_date: paid.then_some(now),
    };
    if !paid && ledger.get(&id).is_none() {
        tracing::debug!(%id, "unpaid toggle on unknown obligation ignored");
        return state;
    }
    ledger.upsert(id, state);
    tracing::info!(%id, paid, "fiscal obligation paid state updated");
    state
}
