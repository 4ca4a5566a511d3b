//! Multisig signer set and errors
//!
//! Holds the threshold-based signer configuration of a wallet and the
//! invariants it must keep: no duplicate signers and never fewer signers
//! than the threshold.

use crate::ledger::LedgerError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors related to multisig operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MultisigError {
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),
    #[error("Invalid signer count: need at least 2 signers")]
    InsufficientSigners,
    #[error("Duplicate signer: {0}")]
    DuplicateSigner(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Signer may not nominate itself: {0}")]
    SelfAddForbidden(String),
    #[error("Signer not found: {0}")]
    SignerNotFound(String),
    #[error("Below minimum signers: {remaining} would remain, threshold is {threshold}")]
    BelowMinimumSigners { threshold: u8, remaining: usize },
    #[error("Transaction not found: {0}")]
    NotFound(u64),
    #[error("Transaction {id} already confirmed by {signer}")]
    AlreadyConfirmed { id: u64, signer: String },
    #[error("Transaction already executed: {0}")]
    AlreadyExecuted(u64),
    #[error("Insufficient confirmations: have {have}, need {need}")]
    InsufficientConfirmations { have: usize, need: u8 },
    #[error("Nested execution rejected: ledger is already in use")]
    ReentrantExecution,
    #[error("Ledger lock poisoned")]
    LedgerPoisoned,
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("Transaction {id} recorded but not executed: {source}")]
    PendingAfterSubmit {
        id: u64,
        source: Box<MultisigError>,
    },
}

/// What a confirmed signer-add does when the target is already a signer
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateSignerPolicy {
    /// Fail execution with `DuplicateSigner`
    #[default]
    Reject,
    /// Execute as a no-op
    Ignore,
}

/// Configuration for a multisig wallet
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MultisigConfig {
    /// Minimum confirmations required (M in M-of-N)
    pub threshold: u8,
    /// Authorized signers, in insertion order
    pub signers: Vec<String>,
    /// Optional human-readable label
    pub label: Option<String>,
    #[serde(default)]
    pub duplicate_signer_policy: DuplicateSignerPolicy,
}

impl MultisigConfig {
    /// Create a new multisig configuration
    ///
    /// # Arguments
    /// * `threshold` - Minimum confirmations required (M)
    /// * `signers` - Addresses of authorized signers (N)
    /// * `label` - Optional label
    ///
    /// # Errors
    /// Returns error if threshold is invalid or signers list is invalid
    pub fn new(
        threshold: u8,
        signers: Vec<String>,
        label: Option<String>,
    ) -> Result<Self, MultisigError> {
        let config = Self {
            threshold,
            signers,
            label,
            duplicate_signer_policy: DuplicateSignerPolicy::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the duplicate signer policy
    pub fn with_duplicate_policy(mut self, policy: DuplicateSignerPolicy) -> Self {
        self.duplicate_signer_policy = policy;
        self
    }

    /// Check threshold and signer list, e.g. after loading from a file
    pub fn validate(&self) -> Result<(), MultisigError> {
        if self.threshold == 0 {
            return Err(MultisigError::InvalidThreshold(
                "threshold must be at least 1".to_string(),
            ));
        }

        if self.signers.len() < 2 {
            return Err(MultisigError::InsufficientSigners);
        }

        if self.threshold as usize > self.signers.len() {
            return Err(MultisigError::InvalidThreshold(format!(
                "threshold {} exceeds signer count {}",
                self.threshold,
                self.signers.len()
            )));
        }

        let mut sorted_signers = self.signers.clone();
        sorted_signers.sort();
        for pair in sorted_signers.windows(2) {
            if pair[0] == pair[1] {
                return Err(MultisigError::DuplicateSigner(pair[0].clone()));
            }
        }

        Ok(())
    }

    /// Get the threshold (M)
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Get the total signer count (N)
    pub fn signer_count(&self) -> usize {
        self.signers.len()
    }

    pub fn is_signer(&self, address: &str) -> bool {
        self.signers.iter().any(|s| s == address)
    }

    /// Whether one more signer can be removed without breaking the floor
    pub fn can_remove(&self) -> bool {
        self.signers.len() > self.threshold as usize
    }

    /// Get description like "2-of-3"
    pub fn description(&self) -> String {
        format!("{}-of-{}", self.threshold, self.signers.len())
    }

    /// Deterministic ledger address for a wallet of the given kind with
    /// this configuration
    ///
    /// Address = "0x" || hex(SHA256(kind || label || threshold || signers))[..40]
    pub fn derive_address(&self, kind: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(kind.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.label.as_deref().unwrap_or("").as_bytes());
        hasher.update([0u8]);
        hasher.update([self.threshold]);
        for signer in &self.signers {
            hasher.update(signer.as_bytes());
            hasher.update([0u8]);
        }
        let hash = hex::encode(hasher.finalize());
        format!("0x{}", &hash[..40])
    }

    /// Append a signer. Returns `false` when the address was already a
    /// signer and the policy says to ignore it.
    pub(crate) fn add_signer(&mut self, address: &str) -> Result<bool, MultisigError> {
        if self.is_signer(address) {
            return match self.duplicate_signer_policy {
                DuplicateSignerPolicy::Reject => {
                    Err(MultisigError::DuplicateSigner(address.to_string()))
                }
                DuplicateSignerPolicy::Ignore => Ok(false),
            };
        }

        self.signers.push(address.to_string());
        Ok(true)
    }

    /// Remove a signer, keeping at least `threshold` signers
    pub(crate) fn remove_signer(&mut self, address: &str) -> Result<(), MultisigError> {
        let position = self
            .signers
            .iter()
            .position(|s| s == address)
            .ok_or_else(|| MultisigError::SignerNotFound(address.to_string()))?;

        if !self.can_remove() {
            return Err(MultisigError::BelowMinimumSigners {
                threshold: self.threshold,
                remaining: self.signers.len() - 1,
            });
        }

        self.signers.remove(position);
        Ok(())
    }
}
