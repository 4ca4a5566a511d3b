//! Governed token ledger
//!
//! Provides a fungible token with:
//! - Balances, allowances and delegated transfers
//! - Per-holder reserves enforced on every outgoing transfer
//! - Owner / admin / vault roles and a capped minter set
//!
//! # Example
//!
//! ```rust
//! use petcoin_vault::ledger::{Ledger, LedgerConfig};
//!
//! let mut ledger = Ledger::new(LedgerConfig::new("owner", "admin", "vault")).unwrap();
//! let one = ledger.one_unit();
//!
//! ledger.transfer("vault", "alice", 10 * one).unwrap();
//! ledger.set_reserve("admin", "alice", 5 * one).unwrap();
//!
//! // alice may spend down to her reserve, not below it
//! assert!(ledger.transfer("alice", "bob", 6 * one).is_err());
//! assert!(ledger.transfer("alice", "bob", 5 * one).is_ok());
//! ```

pub mod ledger;

pub use ledger::{
    ApprovalEvent, Ledger, LedgerConfig, LedgerError, MintEvent, ReserveEvent, Role,
    RoleChangedEvent, TransferEvent,
};

use std::sync::{Arc, RwLock};

/// Ledger handle shared between the wallets that drive it
pub type SharedLedger = Arc<RwLock<Ledger>>;

/// Wrap a ledger for sharing
pub fn shared(ledger: Ledger) -> SharedLedger {
    Arc::new(RwLock::new(ledger))
}
