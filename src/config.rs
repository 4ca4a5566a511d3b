//! Deployment configuration
//!
//! A genesis file describes the ledger and the wallets that govern it:
//!
//! ```json
//! {
//!   "ledger": { "owner": "alice", "admin": "bob", "vault": "carol" },
//!   "wallet": { "threshold": 2, "signers": ["alice", "bob", "carol"], "label": "vault" },
//!   "mint_wallet": { "threshold": 2, "signers": ["alice", "bob", "carol"], "label": "mint" }
//! }
//! ```
//!
//! Omitted ledger fields take their defaults. `mint_wallet` is optional.

use crate::ledger::{self, Ledger, LedgerConfig, LedgerError, SharedLedger};
use crate::multisig::{
    MintMultisigWallet, MintTxType, MultisigConfig, MultisigError, MultisigWallet, Operation,
    TxType,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("Multisig error: {0}")]
    Multisig(#[from] MultisigError),
    #[error("Wallets share the ledger address {0}")]
    AddressCollision(String),
}

/// Genesis parameters for a full deployment
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DeploymentConfig {
    pub ledger: LedgerConfig,
    /// The vault multisig wallet
    pub wallet: MultisigConfig,
    /// Optional mint wallet, registered as a minter by the ledger owner
    #[serde(default)]
    pub mint_wallet: Option<MultisigConfig>,
}

impl DeploymentConfig {
    /// Read a genesis file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ledger.validate()?;
        self.wallet.validate()?;
        if let Some(mint_wallet) = &self.mint_wallet {
            mint_wallet.validate()?;
            let address = self.wallet.derive_address(TxType::KIND);
            if address == mint_wallet.derive_address(MintTxType::KIND) {
                return Err(ConfigError::AddressCollision(address));
            }
        }
        Ok(())
    }

    /// Deploy the ledger and its wallets
    pub fn deploy(&self) -> Result<Deployment, ConfigError> {
        self.validate()?;
        let ledger = ledger::shared(Ledger::new(self.ledger.clone())?);
        let wallet = MultisigWallet::new(self.wallet.clone(), ledger.clone())?;

        let mint_wallet = match &self.mint_wallet {
            Some(config) => Some(MintMultisigWallet::deploy(
                config.clone(),
                ledger.clone(),
                &self.ledger.owner,
            )?),
            None => None,
        };

        log::info!(
            "Deployment ready: wallet {}{}",
            wallet.address(),
            mint_wallet
                .as_ref()
                .map(|w| format!(", mint wallet {}", w.address()))
                .unwrap_or_default()
        );

        Ok(Deployment {
            ledger,
            wallet,
            mint_wallet,
        })
    }
}

/// A ledger together with the wallets bound to it
#[derive(Debug)]
pub struct Deployment {
    pub ledger: SharedLedger,
    pub wallet: MultisigWallet,
    pub mint_wallet: Option<MintMultisigWallet>,
}
