//! Transaction requests awaiting confirmation
//!
//! A request is created by a signer with that signer as its first
//! confirmer, collects further confirmations, and is executed exactly once.

use crate::multisig::engine::Operation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a transaction request
///
/// Moves forward only. Reaching the threshold executes in the same call,
/// so a request goes `NotFullySigned` -> `Executed` unless that execution
/// fails. It then rests at `FullySigned` until `execute_tx` or a later
/// confirmation executes it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxStatus {
    NotFullySigned,
    FullySigned,
    Executed,
}

/// A typed operation request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TxRequest<T> {
    /// Sequential request ID, starting at 0
    pub id: u64,
    /// Caller-supplied description
    pub description: String,
    pub tx_type: T,
    pub status: TxStatus,
    /// Operation target (recipient, signer, new role holder)
    pub target: String,
    /// Operation amount in subunits, 0 when unused
    pub amount: u128,
    pub requestor: String,
    /// Confirming signers in signing order
    pub confirmations: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub executed_at: Option<DateTime<Utc>>,
}

impl<T> TxRequest<T> {
    /// Create a new request confirmed by its requestor
    pub fn new(
        id: u64,
        description: String,
        tx_type: T,
        target: String,
        amount: u128,
        requestor: String,
    ) -> Self {
        Self {
            id,
            description,
            tx_type,
            status: TxStatus::NotFullySigned,
            target,
            amount,
            confirmations: vec![requestor.clone()],
            requestor,
            created_at: Utc::now(),
            executed_at: None,
        }
    }

    pub fn is_executed(&self) -> bool {
        self.status == TxStatus::Executed
    }

    pub fn has_confirmed(&self, signer: &str) -> bool {
        self.confirmations.iter().any(|s| s == signer)
    }

    pub fn confirmation_count(&self) -> usize {
        self.confirmations.len()
    }

    /// Record a failed execution at quorum
    pub(crate) fn mark_fully_signed(&mut self) {
        if self.status == TxStatus::NotFullySigned {
            self.status = TxStatus::FullySigned;
        }
    }

    pub(crate) fn mark_executed(&mut self) {
        self.status = TxStatus::Executed;
        self.executed_at = Some(Utc::now());
    }
}

/// Record emitted when a request is submitted
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RequestedEvent<T> {
    pub id: u64,
    pub tx_type: T,
    pub requestor: String,
    pub timestamp: DateTime<Utc>,
}

impl<T: Operation> RequestedEvent<T> {
    /// Event name, e.g. "TransferRequested"
    pub fn name(&self) -> &'static str {
        self.tx_type.requested_event()
    }
}

/// Wallet event log entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum WalletEvent<T> {
    Requested(RequestedEvent<T>),
    Confirmed {
        id: u64,
        signer: String,
        timestamp: DateTime<Utc>,
    },
    Executed {
        id: u64,
        timestamp: DateTime<Utc>,
    },
}

impl<T> WalletEvent<T> {
    /// Request ID this event refers to
    pub fn id(&self) -> u64 {
        match self {
            WalletEvent::Requested(event) => event.id,
            WalletEvent::Confirmed { id, .. } | WalletEvent::Executed { id, .. } => *id,
        }
    }
}
