//! Multisig approval engine
//!
//! Drives typed requests from submission through confirmation to a
//! single execution against the shared ledger or the wallet's own
//! signer set. The operation set is supplied by an [`Operation`] type;
//! the base wallet and the mint wallet share everything else.

use crate::ledger::{Ledger, MintEvent, RoleChangedEvent, SharedLedger, TransferEvent};
use crate::multisig::config::{MultisigConfig, MultisigError};
use crate::multisig::request::{RequestedEvent, TxRequest, TxStatus, WalletEvent};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::TryLockError;

/// Kind of signer-set change an operation performs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignerChange {
    Add,
    Remove,
}

/// An enumerated request type with its execution rule
pub trait Operation:
    Copy + Eq + fmt::Debug + fmt::Display + Serialize + DeserializeOwned
{
    /// Wallet kind, mixed into the wallet address
    const KIND: &'static str;

    /// The operation that performs a signer-set change
    fn for_signer_change(change: SignerChange) -> Self;

    /// Signer-set change performed by this operation, if any
    fn signer_change(self) -> Option<SignerChange>;

    /// Name of the record emitted on submission
    fn requested_event(self) -> &'static str;

    /// Apply the operation. Implementations must fail before mutating.
    fn execute(
        self,
        target: &str,
        amount: u128,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<ExecutionEffect, MultisigError>;
}

/// State an executing operation may touch
pub struct ExecutionContext<'a> {
    /// The wallet's own ledger address
    pub wallet: &'a str,
    pub ledger: &'a mut Ledger,
    signers: &'a mut MultisigConfig,
}

impl ExecutionContext<'_> {
    pub fn add_signer(&mut self, target: &str) -> Result<ExecutionEffect, MultisigError> {
        if self.signers.add_signer(target)? {
            Ok(ExecutionEffect::SignerAdded(target.to_string()))
        } else {
            Ok(ExecutionEffect::SignerUnchanged(target.to_string()))
        }
    }

    pub fn remove_signer(&mut self, target: &str) -> Result<ExecutionEffect, MultisigError> {
        self.signers.remove_signer(target)?;
        Ok(ExecutionEffect::SignerRemoved(target.to_string()))
    }
}

/// Outcome of an executed request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ExecutionEffect {
    Transferred(TransferEvent),
    SignerAdded(String),
    /// Signer-add of an existing signer under the ignore policy
    SignerUnchanged(String),
    SignerRemoved(String),
    RoleChanged(RoleChangedEvent),
    MinterAdded(String),
    Minted(MintEvent),
}

/// Result of a confirmation
#[derive(Clone, Debug)]
pub struct SignOutcome {
    pub id: u64,
    pub status: TxStatus,
    /// Confirmations from current signers
    pub confirmations: usize,
    /// Set when this call executed the request
    pub effect: Option<ExecutionEffect>,
}

/// Persistable wallet state, everything except the ledger handle
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletState<T> {
    address: String,
    config: MultisigConfig,
    requests: Vec<TxRequest<T>>,
    events: Vec<WalletEvent<T>>,
}

impl<T> WalletState<T> {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn config(&self) -> &MultisigConfig {
        &self.config
    }
}

/// N-of-M approval wallet over a shared ledger
#[derive(Debug)]
pub struct MultisigEngine<T: Operation> {
    state: WalletState<T>,
    ledger: SharedLedger,
}

impl<T: Operation> MultisigEngine<T> {
    /// Create a wallet with the given signer configuration
    pub fn new(config: MultisigConfig, ledger: SharedLedger) -> Result<Self, MultisigError> {
        config.validate()?;
        let address = config.derive_address(T::KIND);

        log::info!(
            "Multisig wallet {} created ({}, {} signers)",
            address,
            config.description(),
            config.signer_count()
        );

        Ok(Self {
            state: WalletState {
                address,
                config,
                requests: Vec::new(),
                events: Vec::new(),
            },
            ledger,
        })
    }

    /// Rebuild a wallet from saved state
    pub fn from_state(state: WalletState<T>, ledger: SharedLedger) -> Self {
        Self { state, ledger }
    }

    pub fn state(&self) -> &WalletState<T> {
        &self.state
    }

    /// The wallet's own ledger address
    pub fn address(&self) -> &str {
        &self.state.address
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    pub fn threshold(&self) -> u8 {
        self.state.config.threshold()
    }

    pub fn is_signer(&self, address: &str) -> bool {
        self.state.config.is_signer(address)
    }

    pub fn description(&self) -> String {
        self.state.config.description()
    }

    /// Wallet event log, oldest first
    pub fn events(&self) -> &[WalletEvent<T>] {
        &self.state.events
    }

    // =========================================================================
    // Signer-only views
    // =========================================================================

    pub fn get_signers(&self, caller: &str) -> Result<&[String], MultisigError> {
        self.require_signer(caller)?;
        Ok(&self.state.config.signers)
    }

    pub fn view_tx(&self, caller: &str, id: u64) -> Result<&TxRequest<T>, MultisigError> {
        self.require_signer(caller)?;
        self.request(id)
    }

    pub fn view_who_signed_tx(&self, caller: &str, id: u64) -> Result<&[String], MultisigError> {
        self.require_signer(caller)?;
        Ok(&self.request(id)?.confirmations)
    }

    /// Number of requests ever submitted. Open to anyone.
    pub fn get_tx_count(&self) -> u64 {
        self.state.requests.len() as u64
    }

    // =========================================================================
    // Signer management
    // =========================================================================

    /// Always fails. The signer set only changes through a confirmed
    /// `request_signer_add`.
    pub fn add_signer(&mut self, caller: &str, address: &str) -> Result<(), MultisigError> {
        Err(direct_signer_change(caller, "add", address))
    }

    /// Always fails. The signer set only changes through a confirmed
    /// `request_signer_remove`.
    pub fn remove_signer(&mut self, caller: &str, address: &str) -> Result<(), MultisigError> {
        Err(direct_signer_change(caller, "remove", address))
    }

    /// Request adding `address` as a signer. A signer may not nominate
    /// itself.
    pub fn request_signer_add(
        &mut self,
        caller: &str,
        address: &str,
        description: &str,
    ) -> Result<RequestedEvent<T>, MultisigError> {
        self.submit(
            caller,
            T::for_signer_change(SignerChange::Add),
            address,
            0,
            description,
        )
    }

    /// Request removing `address` from the signers
    pub fn request_signer_remove(
        &mut self,
        caller: &str,
        address: &str,
        description: &str,
    ) -> Result<RequestedEvent<T>, MultisigError> {
        self.submit(
            caller,
            T::for_signer_change(SignerChange::Remove),
            address,
            0,
            description,
        )
    }

    // =========================================================================
    // Request lifecycle
    // =========================================================================

    /// Record a new request confirmed by its requestor
    ///
    /// Fails with `PendingAfterSubmit` when the request was recorded but
    /// executing it right away failed.
    pub(crate) fn submit(
        &mut self,
        caller: &str,
        tx_type: T,
        target: &str,
        amount: u128,
        description: &str,
    ) -> Result<RequestedEvent<T>, MultisigError> {
        self.require_signer(caller)?;

        match tx_type.signer_change() {
            Some(SignerChange::Add) if target == caller => {
                return Err(MultisigError::SelfAddForbidden(caller.to_string()));
            }
            Some(SignerChange::Remove) if !self.state.config.can_remove() => {
                return Err(MultisigError::BelowMinimumSigners {
                    threshold: self.threshold(),
                    remaining: self.state.config.signer_count().saturating_sub(1),
                });
            }
            _ => {}
        }

        let id = self.get_tx_count();
        let request = TxRequest::new(
            id,
            description.to_string(),
            tx_type,
            target.to_string(),
            amount,
            caller.to_string(),
        );
        self.state.requests.push(request);

        let event = RequestedEvent {
            id,
            tx_type,
            requestor: caller.to_string(),
            timestamp: Utc::now(),
        };
        self.state.events.push(WalletEvent::Requested(event.clone()));

        log::info!(
            "{}: id {} by {} (target {}, amount {})",
            event.name(),
            id,
            caller,
            target,
            amount
        );

        // A 1-of-N wallet executes on submission. The request stays
        // recorded when that fails and `execute_tx` retries it.
        if let Err(err) = self.execute_if_ready(id) {
            return Err(MultisigError::PendingAfterSubmit {
                id,
                source: Box::new(err),
            });
        }

        Ok(event)
    }

    /// Confirm a request. Executes it when the threshold is reached.
    ///
    /// If execution fails the confirmation is kept and the request rests at
    /// `FullySigned`; `execute_tx` retries once the blocking condition is
    /// gone.
    pub fn sign_tx(&mut self, caller: &str, id: u64) -> Result<SignOutcome, MultisigError> {
        self.require_signer(caller)?;

        let request = self.request_mut(id)?;
        if request.is_executed() {
            return Err(MultisigError::AlreadyExecuted(id));
        }
        if request.has_confirmed(caller) {
            return Err(MultisigError::AlreadyConfirmed {
                id,
                signer: caller.to_string(),
            });
        }
        request.confirmations.push(caller.to_string());

        self.state.events.push(WalletEvent::Confirmed {
            id,
            signer: caller.to_string(),
            timestamp: Utc::now(),
        });
        log::debug!("Transaction {} confirmed by {}", id, caller);

        self.execute_if_ready(id)
    }

    /// Retry execution of a request that already holds enough
    /// confirmations
    pub fn execute_tx(&mut self, caller: &str, id: u64) -> Result<SignOutcome, MultisigError> {
        self.require_signer(caller)?;

        let request = self.request(id)?;
        if request.is_executed() {
            return Err(MultisigError::AlreadyExecuted(id));
        }

        let have = self.quorum(request);
        if have < self.threshold() as usize {
            return Err(MultisigError::InsufficientConfirmations {
                have,
                need: self.threshold(),
            });
        }

        self.execute_if_ready(id)
    }

    fn execute_if_ready(&mut self, id: u64) -> Result<SignOutcome, MultisigError> {
        let have = self.quorum(self.request(id)?);

        if have < self.threshold() as usize {
            return Ok(SignOutcome {
                id,
                status: TxStatus::NotFullySigned,
                confirmations: have,
                effect: None,
            });
        }

        let effect = self.execute(id)?;

        Ok(SignOutcome {
            id,
            status: TxStatus::Executed,
            confirmations: have,
            effect: Some(effect),
        })
    }

    /// Apply the request and mark it executed, or change nothing
    fn execute(&mut self, id: u64) -> Result<ExecutionEffect, MultisigError> {
        let index = self.index_of(id)?;

        let mut ledger = self.ledger.try_write().map_err(|err| match err {
            TryLockError::WouldBlock => MultisigError::ReentrantExecution,
            TryLockError::Poisoned(_) => MultisigError::LedgerPoisoned,
        })?;

        let request = &mut self.state.requests[index];
        let mut ctx = ExecutionContext {
            wallet: &self.state.address,
            ledger: &mut *ledger,
            signers: &mut self.state.config,
        };

        let effect = match request
            .tx_type
            .execute(&request.target, request.amount, &mut ctx)
        {
            Ok(effect) => effect,
            Err(err) => {
                request.mark_fully_signed();
                log::warn!(
                    "Transaction {} ({}) not executed: {}",
                    id,
                    request.tx_type,
                    err
                );
                return Err(err);
            }
        };
        request.mark_executed();

        self.state.events.push(WalletEvent::Executed {
            id,
            timestamp: Utc::now(),
        });
        log::info!("Transaction {} executed: {:?}", id, effect);

        Ok(effect)
    }

    /// Confirmations that count toward the threshold
    fn quorum(&self, request: &TxRequest<T>) -> usize {
        request
            .confirmations
            .iter()
            .filter(|signer| self.state.config.is_signer(signer))
            .count()
    }

    /// Normalize a whole-plus-subunit amount using the ledger's unit
    pub(crate) fn to_subunits(&self, whole: u128, subunit: u128) -> Result<u128, MultisigError> {
        let ledger = self
            .ledger
            .read()
            .map_err(|_| MultisigError::LedgerPoisoned)?;
        Ok(ledger.to_subunits(whole, subunit)?)
    }

    fn request(&self, id: u64) -> Result<&TxRequest<T>, MultisigError> {
        let index = self.index_of(id)?;
        Ok(&self.state.requests[index])
    }

    fn request_mut(&mut self, id: u64) -> Result<&mut TxRequest<T>, MultisigError> {
        let index = self.index_of(id)?;
        Ok(&mut self.state.requests[index])
    }

    fn index_of(&self, id: u64) -> Result<usize, MultisigError> {
        usize::try_from(id)
            .ok()
            .filter(|&index| index < self.state.requests.len())
            .ok_or(MultisigError::NotFound(id))
    }

    pub(crate) fn require_signer(&self, caller: &str) -> Result<(), MultisigError> {
        if self.is_signer(caller) {
            Ok(())
        } else {
            Err(MultisigError::Unauthorized(format!(
                "{} is not a signer",
                caller
            )))
        }
    }
}

fn direct_signer_change(caller: &str, action: &str, address: &str) -> MultisigError {
    MultisigError::Unauthorized(format!(
        "{} may not {} signer {} outside a confirmed request",
        caller, action, address
    ))
}
