//! Mint multisig wallet
//!
//! Same approval mechanics as the vault wallet with a different
//! operation set: signer changes, granting minter status and minting
//! new supply under the wallet's own identity.

use crate::ledger::SharedLedger;
use crate::multisig::config::{MultisigConfig, MultisigError};
use crate::multisig::engine::{
    ExecutionContext, ExecutionEffect, MultisigEngine, Operation, SignerChange,
};
use crate::multisig::request::RequestedEvent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request types of the mint wallet
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MintTxType {
    SignerAdd,
    SignerRemove,
    MinterAdd,
    Mint,
}

impl fmt::Display for MintTxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MintTxType::SignerAdd => "SIGNER_ADD",
            MintTxType::SignerRemove => "SIGNER_REMOVE",
            MintTxType::MinterAdd => "MINTER_ADD",
            MintTxType::Mint => "MINT",
        };
        write!(f, "{}", name)
    }
}

impl Operation for MintTxType {
    const KIND: &'static str = "mint";

    fn for_signer_change(change: SignerChange) -> Self {
        match change {
            SignerChange::Add => MintTxType::SignerAdd,
            SignerChange::Remove => MintTxType::SignerRemove,
        }
    }

    fn signer_change(self) -> Option<SignerChange> {
        match self {
            MintTxType::SignerAdd => Some(SignerChange::Add),
            MintTxType::SignerRemove => Some(SignerChange::Remove),
            MintTxType::MinterAdd | MintTxType::Mint => None,
        }
    }

    fn requested_event(self) -> &'static str {
        match self {
            MintTxType::SignerAdd => "SignerAddRequested",
            MintTxType::SignerRemove => "SignerRemoveRequested",
            MintTxType::MinterAdd => "MinterAddRequested",
            MintTxType::Mint => "MintRequested",
        }
    }

    fn execute(
        self,
        target: &str,
        amount: u128,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<ExecutionEffect, MultisigError> {
        match self {
            MintTxType::SignerAdd => ctx.add_signer(target),
            MintTxType::SignerRemove => ctx.remove_signer(target),
            MintTxType::MinterAdd => {
                ctx.ledger.add_minter(ctx.wallet, target)?;
                Ok(ExecutionEffect::MinterAdded(target.to_string()))
            }
            MintTxType::Mint => Ok(ExecutionEffect::Minted(
                ctx.ledger.mint(ctx.wallet, target, amount)?,
            )),
        }
    }
}

/// Multisig wallet gating supply increases
pub type MintMultisigWallet = MultisigEngine<MintTxType>;

impl MultisigEngine<MintTxType> {
    /// Create the wallet and grant it minter status with the ledger
    /// owner's authority
    pub fn deploy(
        config: MultisigConfig,
        ledger: SharedLedger,
        owner: &str,
    ) -> Result<Self, MultisigError> {
        let wallet = Self::new(config, ledger)?;
        wallet
            .ledger()
            .write()
            .map_err(|_| MultisigError::LedgerPoisoned)?
            .add_minter(owner, wallet.address())?;

        log::info!("Mint wallet {} registered as minter", wallet.address());
        Ok(wallet)
    }

    /// Request minting `whole` units plus `subunit` subunits to `to`
    pub fn request_mint(
        &mut self,
        caller: &str,
        to: &str,
        whole: u128,
        subunit: u128,
        description: &str,
    ) -> Result<RequestedEvent<MintTxType>, MultisigError> {
        self.require_signer(caller)?;
        let amount = self.to_subunits(whole, subunit)?;
        self.submit(caller, MintTxType::Mint, to, amount, description)
    }

    pub fn request_mint_in_subunit(
        &mut self,
        caller: &str,
        to: &str,
        amount: u128,
        description: &str,
    ) -> Result<RequestedEvent<MintTxType>, MultisigError> {
        self.submit(caller, MintTxType::Mint, to, amount, description)
    }

    /// Request granting minter status to `minter`
    pub fn request_minter_add(
        &mut self,
        caller: &str,
        minter: &str,
        description: &str,
    ) -> Result<RequestedEvent<MintTxType>, MultisigError> {
        self.submit(caller, MintTxType::MinterAdd, minter, 0, description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{self, Ledger, LedgerConfig, LedgerError};
    use crate::multisig::request::TxStatus;

    const OWNER: &str = "owner";
    const ADMIN: &str = "admin";
    const VAULT: &str = "vault";
    const SIGNER: &str = "signer";
    const USER1: &str = "user1";
    const USER2: &str = "user2";

    fn signers() -> Vec<String> {
        vec![SIGNER.to_string(), ADMIN.to_string(), VAULT.to_string()]
    }

    fn create_test_wallet() -> (MintMultisigWallet, SharedLedger) {
        let ledger = ledger::shared(Ledger::new(LedgerConfig::new(OWNER, ADMIN, VAULT)).unwrap());
        let config = MultisigConfig::new(2, signers(), Some("mint".to_string())).unwrap();
        let wallet = MintMultisigWallet::deploy(config, ledger.clone(), OWNER).unwrap();
        (wallet, ledger)
    }

    #[test]
    fn test_deploy_registers_minter() {
        let (wallet, ledger) = create_test_wallet();
        let ledger = ledger.read().unwrap();

        assert!(ledger.is_minter(wallet.address()));
        assert!(ledger.is_minter(OWNER));
        assert_eq!(wallet.get_tx_count(), 0);
    }

    #[test]
    fn test_deploy_requires_owner() {
        let ledger = ledger::shared(Ledger::new(LedgerConfig::new(OWNER, ADMIN, VAULT)).unwrap());
        let config = MultisigConfig::new(2, signers(), None).unwrap();

        let result = MintMultisigWallet::deploy(config, ledger, ADMIN);
        assert!(matches!(
            result,
            Err(MultisigError::Ledger(LedgerError::Unauthorized { .. }))
        ));
    }

    #[test]
    fn test_only_signers_can_request() {
        let (mut wallet, _) = create_test_wallet();

        for caller in [USER1, OWNER] {
            assert!(wallet.request_mint(caller, USER1, 1, 0, "m1").is_err());
            assert!(wallet.request_mint_in_subunit(caller, USER1, 1, "m2").is_err());
            assert!(wallet.request_minter_add(caller, USER2, "m3").is_err());
            assert!(wallet.request_signer_add(caller, USER2, "m4").is_err());
            assert!(wallet.request_signer_remove(caller, VAULT, "m5").is_err());
        }
        assert_eq!(wallet.get_tx_count(), 0);
    }

    #[test]
    fn test_mint_using_multisig_wallet() {
        let (mut wallet, ledger) = create_test_wallet();
        let one = ledger.read().unwrap().one_unit();
        let supply = ledger.read().unwrap().total_supply();

        let event = wallet.request_mint(SIGNER, USER1, 1, 1, "mint 1 unit and 1 subunit").unwrap();
        assert_eq!(event.name(), "MintRequested");
        assert_eq!(ledger.read().unwrap().balance_of(USER1), 0);

        let outcome = wallet.sign_tx(ADMIN, event.id).unwrap();
        assert_eq!(outcome.status, TxStatus::Executed);
        match outcome.effect {
            Some(ExecutionEffect::Minted(minted)) => {
                assert_eq!(minted.minter, wallet.address());
                assert_eq!(minted.amount, one + 1);
            }
            other => panic!("unexpected effect: {:?}", other),
        }

        let ledger = ledger.read().unwrap();
        assert_eq!(ledger.balance_of(USER1), one + 1);
        assert_eq!(ledger.total_supply(), supply + one + 1);
    }

    #[test]
    fn test_mint_over_cap_stays_pending() {
        let (mut wallet, ledger) = create_test_wallet();
        let supply = ledger.read().unwrap().total_supply();

        let id = wallet
            .request_mint(SIGNER, USER1, 100_000_000_000, 0, "too much")
            .unwrap()
            .id;
        let result = wallet.sign_tx(VAULT, id);

        assert!(matches!(
            result,
            Err(MultisigError::Ledger(LedgerError::MintCapExceeded { .. }))
        ));
        assert_eq!(ledger.read().unwrap().total_supply(), supply);
        assert_eq!(
            wallet.view_tx(SIGNER, id).unwrap().status,
            TxStatus::FullySigned
        );
    }

    #[test]
    fn test_mint_after_minter_renounced() {
        let (mut wallet, ledger) = create_test_wallet();
        let address = wallet.address().to_string();
        ledger.write().unwrap().renounce_minter(&address);

        let id = wallet.request_mint_in_subunit(SIGNER, USER1, 5, "mint").unwrap().id;
        let result = wallet.sign_tx(ADMIN, id);
        assert!(matches!(
            result,
            Err(MultisigError::Ledger(LedgerError::Unauthorized { .. }))
        ));

        ledger.write().unwrap().add_minter(OWNER, &address).unwrap();
        wallet.execute_tx(VAULT, id).unwrap();
        assert_eq!(ledger.read().unwrap().balance_of(USER1), 5);
    }

    #[test]
    fn test_add_minter_as_owner() {
        let (mut wallet, ledger) = create_test_wallet();
        ledger
            .write()
            .unwrap()
            .set_owner(VAULT, wallet.address())
            .unwrap();

        let event = wallet.request_minter_add(SIGNER, USER1, "new minter").unwrap();
        assert_eq!(event.name(), "MinterAddRequested");
        let outcome = wallet.sign_tx(ADMIN, event.id).unwrap();

        assert!(matches!(
            outcome.effect,
            Some(ExecutionEffect::MinterAdded(ref minter)) if minter == USER1
        ));
        assert!(ledger.read().unwrap().is_minter(USER1));
    }

    #[test]
    fn test_add_minter_without_ownership() {
        let (mut wallet, ledger) = create_test_wallet();
        assert_eq!(ledger.read().unwrap().owner(), OWNER);

        // minter status alone is enough to grant it
        let id = wallet.request_minter_add(SIGNER, USER1, "new minter").unwrap().id;
        let outcome = wallet.sign_tx(ADMIN, id).unwrap();
        assert_eq!(outcome.status, TxStatus::Executed);
        assert!(ledger.read().unwrap().is_minter(USER1));

        ledger.write().unwrap().mint(USER1, USER2, 25).unwrap();
        assert_eq!(ledger.read().unwrap().balance_of(USER2), 25);
    }

    #[test]
    fn test_add_minter_after_renouncing() {
        let (mut wallet, ledger) = create_test_wallet();
        let address = wallet.address().to_string();
        ledger.write().unwrap().renounce_minter(&address);

        let id = wallet.request_minter_add(SIGNER, USER1, "new minter").unwrap().id;
        assert!(matches!(
            wallet.sign_tx(ADMIN, id),
            Err(MultisigError::Ledger(LedgerError::Unauthorized { .. }))
        ));
        assert!(!ledger.read().unwrap().is_minter(USER1));
    }

    #[test]
    fn test_signer_management() {
        let (mut wallet, _) = create_test_wallet();

        assert!(matches!(
            wallet.request_signer_add(SIGNER, SIGNER, "self"),
            Err(MultisigError::SelfAddForbidden(_))
        ));

        let event = wallet.request_signer_add(SIGNER, USER1, "add user1").unwrap();
        assert_eq!(event.name(), "SignerAddRequested");
        wallet.sign_tx(VAULT, event.id).unwrap();
        assert_eq!(
            wallet.get_signers(USER1).unwrap(),
            [SIGNER, ADMIN, VAULT, USER1]
        );

        let id = wallet.request_signer_remove(USER1, SIGNER, "drop signer").unwrap().id;
        wallet.sign_tx(ADMIN, id).unwrap();
        let id = wallet.request_signer_remove(USER1, ADMIN, "drop admin").unwrap().id;
        wallet.sign_tx(VAULT, id).unwrap();
        assert_eq!(wallet.get_signers(USER1).unwrap(), [VAULT, USER1]);

        assert!(matches!(
            wallet.request_signer_remove(USER1, VAULT, "drop vault"),
            Err(MultisigError::BelowMinimumSigners { .. })
        ));
    }

    #[test]
    fn test_direct_signer_changes_rejected() {
        let (mut wallet, _) = create_test_wallet();
        let address = wallet.address().to_string();

        for caller in [SIGNER, OWNER, address.as_str()] {
            assert!(matches!(
                wallet.add_signer(caller, USER1),
                Err(MultisigError::Unauthorized(_))
            ));
            assert!(matches!(
                wallet.remove_signer(caller, VAULT),
                Err(MultisigError::Unauthorized(_))
            ));
        }
        assert!(!wallet.is_signer(USER1));
        assert_eq!(wallet.get_signers(SIGNER).unwrap(), [SIGNER, ADMIN, VAULT]);
    }
}
