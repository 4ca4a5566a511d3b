//! PetCoin vault: a governed token ledger behind N-of-M approval wallets
//!
//! This crate provides:
//! - A fungible token ledger with allowances and per-holder reserves
//! - Owner / admin / vault roles and a capped minter set
//! - A multisig wallet gating transfers, signer changes and role changes
//! - A mint multisig wallet gating supply increases
//! - JSON genesis configuration and snapshot persistence
//!
//! # Example
//!
//! ```rust
//! use petcoin_vault::config::DeploymentConfig;
//!
//! let genesis = r#"{
//!     "ledger": { "owner": "alice", "admin": "bob", "vault": "carol" },
//!     "wallet": { "threshold": 2, "signers": ["alice", "bob", "carol"] },
//!     "mint_wallet": { "threshold": 2, "signers": ["alice", "bob", "carol"], "label": "mint" }
//! }"#;
//! let mut deployment = DeploymentConfig::from_json(genesis).unwrap().deploy().unwrap();
//!
//! // Two of three signers mint 5 whole units to dave
//! let mint_wallet = deployment.mint_wallet.as_mut().unwrap();
//! let request = mint_wallet.request_mint("alice", "dave", 5, 0, "bounty").unwrap();
//! mint_wallet.sign_tx("bob", request.id).unwrap();
//!
//! let ledger = deployment.ledger.read().unwrap();
//! assert_eq!(ledger.balance_of("dave"), 5 * ledger.one_unit());
//! ```

pub mod cli;
pub mod config;
pub mod ledger;
pub mod multisig;
pub mod storage;

// Re-export commonly used types
pub use config::{ConfigError, Deployment, DeploymentConfig};
pub use ledger::{Ledger, LedgerConfig, LedgerError, SharedLedger};
pub use multisig::{
    MintMultisigWallet, MintTxType, MultisigConfig, MultisigError, MultisigWallet, TxStatus,
    TxType,
};
pub use storage::{Snapshot, Storage, StorageConfig, StorageError};
