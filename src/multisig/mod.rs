//! N-of-M approval wallets
//!
//! Every privileged ledger operation goes through a request that a
//! threshold of signers must confirm. The request executes exactly once,
//! inside the call that supplies the last needed confirmation.
//!
//! # Example
//!
//! ```rust
//! use petcoin_vault::ledger::{self, Ledger, LedgerConfig};
//! use petcoin_vault::multisig::{MultisigConfig, MultisigWallet};
//!
//! let ledger = ledger::shared(Ledger::new(LedgerConfig::new("owner", "admin", "vault")).unwrap());
//! let signers = vec!["alice".to_string(), "bob".to_string(), "carol".to_string()];
//! let config = MultisigConfig::new(2, signers, Some("treasury".to_string())).unwrap();
//! let mut wallet = MultisigWallet::new(config, ledger.clone()).unwrap();
//!
//! // Fund the wallet, then move 1 unit out with two confirmations
//! ledger.write().unwrap().transfer("vault", wallet.address(), 1_000_000_000).unwrap();
//! let request = wallet.request_transfer("alice", "dave", 1, 0, "pay dave").unwrap();
//! wallet.sign_tx("bob", request.id).unwrap();
//!
//! assert_eq!(ledger.read().unwrap().balance_of("dave"), 1_000_000_000);
//! ```

pub mod config;
pub mod engine;
pub mod mint;
pub mod request;
pub mod wallet;

pub use config::{DuplicateSignerPolicy, MultisigConfig, MultisigError};
pub use engine::{
    ExecutionContext, ExecutionEffect, MultisigEngine, Operation, SignOutcome, SignerChange,
    WalletState,
};
pub use mint::{MintMultisigWallet, MintTxType};
pub use request::{RequestedEvent, TxRequest, TxStatus, WalletEvent};
pub use wallet::{MultisigWallet, TxType};
