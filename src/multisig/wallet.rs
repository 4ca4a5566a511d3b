//! Vault multisig wallet
//!
//! The base operation set: transfers out of the wallet's own balance,
//! signer-set changes and ledger role changes.

use crate::multisig::config::MultisigError;
use crate::multisig::engine::{
    ExecutionContext, ExecutionEffect, MultisigEngine, Operation, SignerChange,
};
use crate::multisig::request::RequestedEvent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request types of the vault wallet
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxType {
    Transfer,
    SignerAdd,
    SignerRemove,
    AdminChange,
    VaultChange,
    OwnerChange,
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TxType::Transfer => "TRANSFER",
            TxType::SignerAdd => "SIGNER_ADD",
            TxType::SignerRemove => "SIGNER_REMOVE",
            TxType::AdminChange => "ADMIN_CHANGE",
            TxType::VaultChange => "VAULT_CHANGE",
            TxType::OwnerChange => "OWNER_CHANGE",
        };
        write!(f, "{}", name)
    }
}

impl Operation for TxType {
    const KIND: &'static str = "vault";

    fn for_signer_change(change: SignerChange) -> Self {
        match change {
            SignerChange::Add => TxType::SignerAdd,
            SignerChange::Remove => TxType::SignerRemove,
        }
    }

    fn signer_change(self) -> Option<SignerChange> {
        match self {
            TxType::SignerAdd => Some(SignerChange::Add),
            TxType::SignerRemove => Some(SignerChange::Remove),
            _ => None,
        }
    }

    fn requested_event(self) -> &'static str {
        match self {
            TxType::Transfer => "TransferRequested",
            TxType::SignerAdd => "SignerAddRequested",
            TxType::SignerRemove => "SignerRemoveRequested",
            TxType::AdminChange => "AdminChangeRequested",
            TxType::VaultChange => "VaultChangeRequested",
            TxType::OwnerChange => "OwnerChangeRequested",
        }
    }

    fn execute(
        self,
        target: &str,
        amount: u128,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<ExecutionEffect, MultisigError> {
        let effect = match self {
            TxType::Transfer => {
                ExecutionEffect::Transferred(ctx.ledger.transfer(ctx.wallet, target, amount)?)
            }
            TxType::SignerAdd => return ctx.add_signer(target),
            TxType::SignerRemove => return ctx.remove_signer(target),
            TxType::AdminChange => {
                ExecutionEffect::RoleChanged(ctx.ledger.set_admin(ctx.wallet, target)?)
            }
            TxType::VaultChange => {
                ExecutionEffect::RoleChanged(ctx.ledger.set_vault(ctx.wallet, target)?)
            }
            TxType::OwnerChange => {
                ExecutionEffect::RoleChanged(ctx.ledger.set_owner(ctx.wallet, target)?)
            }
        };
        Ok(effect)
    }
}

/// Multisig wallet holding coins and ledger roles
pub type MultisigWallet = MultisigEngine<TxType>;

impl MultisigEngine<TxType> {
    /// Request a transfer of `whole` units plus `subunit` subunits
    pub fn request_transfer(
        &mut self,
        caller: &str,
        to: &str,
        whole: u128,
        subunit: u128,
        description: &str,
    ) -> Result<RequestedEvent<TxType>, MultisigError> {
        self.require_signer(caller)?;
        let amount = self.to_subunits(whole, subunit)?;
        self.submit(caller, TxType::Transfer, to, amount, description)
    }

    /// Request a transfer given directly in subunits
    pub fn request_transfer_in_subunit(
        &mut self,
        caller: &str,
        to: &str,
        amount: u128,
        description: &str,
    ) -> Result<RequestedEvent<TxType>, MultisigError> {
        self.submit(caller, TxType::Transfer, to, amount, description)
    }

    pub fn request_admin_change(
        &mut self,
        caller: &str,
        new_admin: &str,
        description: &str,
    ) -> Result<RequestedEvent<TxType>, MultisigError> {
        self.submit(caller, TxType::AdminChange, new_admin, 0, description)
    }

    pub fn request_vault_change(
        &mut self,
        caller: &str,
        new_vault: &str,
        description: &str,
    ) -> Result<RequestedEvent<TxType>, MultisigError> {
        self.submit(caller, TxType::VaultChange, new_vault, 0, description)
    }

    pub fn request_owner_change(
        &mut self,
        caller: &str,
        new_owner: &str,
        description: &str,
    ) -> Result<RequestedEvent<TxType>, MultisigError> {
        self.submit(caller, TxType::OwnerChange, new_owner, 0, description)
    }
}
