//! Governed ERC-20 style ledger
//!
//! Tracks balances, allowances and per-holder reserves. Privileged
//! operations are gated by three singleton roles (owner, admin, vault)
//! and a minter set. The ledger knows nothing about the wallets that
//! drive it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;

/// Number of transfer events kept in history
const HISTORY_LIMIT: usize = 100;

/// Ledger-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Unauthorized: {caller} may not {action}")]
    Unauthorized {
        caller: String,
        action: &'static str,
    },
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },
    #[error("Reserve violation: balance {balance} minus {amount} would fall below reserve {reserve}")]
    ReserveViolation {
        balance: u128,
        amount: u128,
        reserve: u128,
    },
    #[error("Allowance exceeded: have {have}, need {need}")]
    AllowanceExceeded { have: u128, need: u128 },
    #[error("Mint cap exceeded: supply {supply} plus {amount} is above cap {cap}")]
    MintCapExceeded { supply: u128, amount: u128, cap: u128 },
    #[error("Arithmetic overflow")]
    Overflow,
    #[error("Invalid ledger config: {0}")]
    InvalidConfig(String),
}

/// Singleton roles held on the ledger
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Owner,
    Admin,
    Vault,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Owner => write!(f, "owner"),
            Role::Admin => write!(f, "admin"),
            Role::Vault => write!(f, "vault"),
        }
    }
}

/// Deployment parameters for a ledger
///
/// Supply and cap are given in whole units; the ledger converts them to
/// subunits using `decimals`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LedgerConfig {
    /// Token name (e.g., "RunningPetCoin")
    pub name: String,
    /// Token symbol (e.g., "RunningPet")
    pub symbol: String,
    /// Decimal places of one whole unit
    pub decimals: u8,
    /// Supply minted to the vault at construction, in whole units
    pub initial_supply: u128,
    /// Upper bound for total supply, in whole units
    pub mint_cap: u128,
    pub owner: String,
    pub admin: String,
    pub vault: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            name: "RunningPetCoin".to_string(),
            symbol: "RunningPet".to_string(),
            decimals: 9,
            initial_supply: 3_300_000_000,
            mint_cap: 10_000_000_000,
            owner: String::new(),
            admin: String::new(),
            vault: String::new(),
        }
    }
}

impl LedgerConfig {
    /// Default token parameters with the given role holders
    pub fn new(owner: &str, admin: &str, vault: &str) -> Self {
        Self {
            owner: owner.to_string(),
            admin: admin.to_string(),
            vault: vault.to_string(),
            ..Default::default()
        }
    }

    /// Check the config is deployable
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.name.is_empty() || self.name.len() > 50 {
            return Err(LedgerError::InvalidConfig(
                "name must be 1-50 characters".to_string(),
            ));
        }

        if self.symbol.is_empty() || self.symbol.len() > 10 {
            return Err(LedgerError::InvalidConfig(
                "symbol must be 1-10 characters".to_string(),
            ));
        }

        if self.decimals > 18 {
            return Err(LedgerError::InvalidConfig(
                "decimals must be 0-18".to_string(),
            ));
        }

        if self.initial_supply > self.mint_cap {
            return Err(LedgerError::InvalidConfig(format!(
                "initial supply {} exceeds mint cap {}",
                self.initial_supply, self.mint_cap
            )));
        }

        for (role, holder) in [
            (Role::Owner, &self.owner),
            (Role::Admin, &self.admin),
            (Role::Vault, &self.vault),
        ] {
            if holder.is_empty() {
                return Err(LedgerError::InvalidConfig(format!("{} is not set", role)));
            }
        }

        Ok(())
    }

    /// Subunits in one whole unit
    pub fn one_unit(&self) -> u128 {
        unit_for(self.decimals)
    }
}

/// Subunits in one whole unit at the given precision
fn unit_for(decimals: u8) -> u128 {
    10u128.pow(decimals as u32)
}

/// Transfer event (emitted when units move between holders)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransferEvent {
    pub from: String,
    pub to: String,
    pub amount: u128,
    pub timestamp: DateTime<Utc>,
}

/// Approval event (emitted when an allowance is set)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApprovalEvent {
    pub owner: String,
    pub spender: String,
    pub amount: u128,
    pub timestamp: DateTime<Utc>,
}

/// Mint event
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MintEvent {
    pub minter: String,
    pub to: String,
    pub amount: u128,
    pub total_supply: u128,
    pub timestamp: DateTime<Utc>,
}

/// Reserve event (emitted when the admin sets a holder's floor)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReserveEvent {
    pub holder: String,
    pub amount: u128,
    pub timestamp: DateTime<Utc>,
}

/// Role change event
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoleChangedEvent {
    pub role: Role,
    pub previous: String,
    pub current: String,
    pub timestamp: DateTime<Utc>,
}

/// The governed token ledger
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ledger {
    name: String,
    symbol: String,
    decimals: u8,
    /// Total supply in subunits
    total_supply: u128,
    /// Mint cap in subunits
    mint_cap: u128,
    owner: String,
    admin: String,
    vault: String,
    minters: BTreeSet<String>,
    /// Balances: address -> amount
    balances: HashMap<String, u128>,
    /// Reserves: address -> minimum balance after outgoing transfers
    reserves: HashMap<String, u128>,
    /// Allowances: owner -> (spender -> amount)
    allowances: HashMap<String, HashMap<String, u128>>,
    /// Transfer history (last 100)
    history: Vec<TransferEvent>,
}

impl Ledger {
    /// Deploy a ledger with the whole initial supply held by the vault.
    /// The initial owner is a minter.
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        config.validate()?;

        let one_unit = config.one_unit();
        let total_supply = config
            .initial_supply
            .checked_mul(one_unit)
            .ok_or(LedgerError::Overflow)?;
        let mint_cap = config
            .mint_cap
            .checked_mul(one_unit)
            .ok_or(LedgerError::Overflow)?;

        let mut balances = HashMap::new();
        if total_supply > 0 {
            balances.insert(config.vault.clone(), total_supply);
        }

        let mut minters = BTreeSet::new();
        minters.insert(config.owner.clone());

        log::info!(
            "Ledger deployed: {} ({}) supply {} to vault {}",
            config.name,
            config.symbol,
            total_supply,
            config.vault
        );

        Ok(Self {
            name: config.name,
            symbol: config.symbol,
            decimals: config.decimals,
            total_supply,
            mint_cap,
            owner: config.owner,
            admin: config.admin,
            vault: config.vault,
            minters,
            balances,
            reserves: HashMap::new(),
            allowances: HashMap::new(),
            history: Vec::new(),
        })
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Subunits in one whole unit
    pub fn one_unit(&self) -> u128 {
        unit_for(self.decimals)
    }

    /// Normalize a whole-plus-subunit amount to subunits
    pub fn to_subunits(&self, whole: u128, subunit: u128) -> Result<u128, LedgerError> {
        whole
            .checked_mul(self.one_unit())
            .and_then(|units| units.checked_add(subunit))
            .ok_or(LedgerError::Overflow)
    }

    /// Total supply in subunits
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Mint cap in subunits
    pub fn mint_cap(&self) -> u128 {
        self.mint_cap
    }

    pub fn balance_of(&self, address: &str) -> u128 {
        *self.balances.get(address).unwrap_or(&0)
    }

    pub fn reserve_of(&self, address: &str) -> u128 {
        *self.reserves.get(address).unwrap_or(&0)
    }

    /// Get allowance for a spender
    pub fn allowance(&self, owner: &str, spender: &str) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn admin(&self) -> &str {
        &self.admin
    }

    pub fn vault(&self) -> &str {
        &self.vault
    }

    pub fn is_minter(&self, address: &str) -> bool {
        self.minters.contains(address)
    }

    pub fn minters(&self) -> Vec<&str> {
        self.minters.iter().map(String::as_str).collect()
    }

    /// Get all holders with balances
    pub fn holders(&self) -> Vec<(&String, &u128)> {
        self.balances.iter().filter(|(_, b)| **b > 0).collect()
    }

    /// Get holder count
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|&&b| b > 0).count()
    }

    /// Recent transfers, oldest first
    pub fn history(&self) -> &[TransferEvent] {
        &self.history
    }

    // =========================================================================
    // Transfers
    // =========================================================================

    /// Transfer units from the caller to `to`
    ///
    /// The caller must keep at least its reserve after the transfer.
    /// Zero-amount transfers always succeed and change nothing.
    pub fn transfer(
        &mut self,
        caller: &str,
        to: &str,
        amount: u128,
    ) -> Result<TransferEvent, LedgerError> {
        self.check_outgoing(caller, amount)?;
        Ok(self.move_funds(caller, to, amount))
    }

    /// Approve a spender to transfer units on behalf of the caller.
    /// Overwrites any previous allowance.
    pub fn approve(&mut self, caller: &str, spender: &str, amount: u128) -> ApprovalEvent {
        self.allowances
            .entry(caller.to_string())
            .or_default()
            .insert(spender.to_string(), amount);

        log::debug!("Approval: {} -> {} = {}", caller, spender, amount);

        ApprovalEvent {
            owner: caller.to_string(),
            spender: spender.to_string(),
            amount,
            timestamp: Utc::now(),
        }
    }

    /// Transfer units from `from` to `to` using the caller's allowance
    ///
    /// The reserve and balance rules of `from` apply exactly as for a
    /// direct transfer. The reserve itself is left untouched.
    pub fn transfer_from(
        &mut self,
        caller: &str,
        from: &str,
        to: &str,
        amount: u128,
    ) -> Result<TransferEvent, LedgerError> {
        let current_allowance = self.allowance(from, caller);
        if current_allowance < amount {
            return Err(LedgerError::AllowanceExceeded {
                have: current_allowance,
                need: amount,
            });
        }

        self.check_outgoing(from, amount)?;

        if amount > 0 {
            if let Some(allowance) = self
                .allowances
                .get_mut(from)
                .and_then(|spenders| spenders.get_mut(caller))
            {
                *allowance -= amount;
            }
        }

        Ok(self.move_funds(from, to, amount))
    }

    fn check_outgoing(&self, from: &str, amount: u128) -> Result<(), LedgerError> {
        if amount == 0 {
            return Ok(());
        }

        let balance = self.balance_of(from);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                have: balance,
                need: amount,
            });
        }

        let reserve = self.reserve_of(from);
        if balance - amount < reserve {
            return Err(LedgerError::ReserveViolation {
                balance,
                amount,
                reserve,
            });
        }

        Ok(())
    }

    /// Move already-checked funds and record the event
    fn move_funds(&mut self, from: &str, to: &str, amount: u128) -> TransferEvent {
        let event = TransferEvent {
            from: from.to_string(),
            to: to.to_string(),
            amount,
            timestamp: Utc::now(),
        };

        if amount == 0 {
            return event;
        }

        if from != to {
            *self.balances.entry(from.to_string()).or_insert(0) -= amount;
            *self.balances.entry(to.to_string()).or_insert(0) += amount;
        }

        log::info!("Transfer: {} -> {} amount {}", from, to, amount);

        self.history.push(event.clone());
        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
        }

        event
    }

    // =========================================================================
    // Reserve and roles
    // =========================================================================

    /// Set the minimum balance `who` must retain. Admin only.
    /// The reserve may exceed the current balance.
    pub fn set_reserve(
        &mut self,
        caller: &str,
        who: &str,
        amount: u128,
    ) -> Result<ReserveEvent, LedgerError> {
        if caller != self.admin {
            return Err(unauthorized(caller, "set reserve"));
        }

        if amount == 0 {
            self.reserves.remove(who);
        } else {
            self.reserves.insert(who.to_string(), amount);
        }

        log::info!("Reserve of {} set to {}", who, amount);

        Ok(ReserveEvent {
            holder: who.to_string(),
            amount,
            timestamp: Utc::now(),
        })
    }

    /// Replace the owner. Vault only.
    pub fn set_owner(&mut self, caller: &str, new: &str) -> Result<RoleChangedEvent, LedgerError> {
        if caller != self.vault {
            return Err(unauthorized(caller, "set owner"));
        }
        Ok(self.replace_role(Role::Owner, new))
    }

    /// Replace the admin. Owner or vault.
    pub fn set_admin(&mut self, caller: &str, new: &str) -> Result<RoleChangedEvent, LedgerError> {
        if caller != self.owner && caller != self.vault {
            return Err(unauthorized(caller, "set admin"));
        }
        Ok(self.replace_role(Role::Admin, new))
    }

    /// Replace the vault. Owner only.
    pub fn set_vault(&mut self, caller: &str, new: &str) -> Result<RoleChangedEvent, LedgerError> {
        if caller != self.owner {
            return Err(unauthorized(caller, "set vault"));
        }
        Ok(self.replace_role(Role::Vault, new))
    }

    fn replace_role(&mut self, role: Role, new: &str) -> RoleChangedEvent {
        let slot = match role {
            Role::Owner => &mut self.owner,
            Role::Admin => &mut self.admin,
            Role::Vault => &mut self.vault,
        };
        let previous = std::mem::replace(slot, new.to_string());

        log::info!("Role {} changed: {} -> {}", role, previous, new);

        RoleChangedEvent {
            role,
            previous,
            current: new.to_string(),
            timestamp: Utc::now(),
        }
    }

    // =========================================================================
    // Minting
    // =========================================================================

    /// Mint new units to `to`. Minters only, bounded by the mint cap.
    pub fn mint(&mut self, caller: &str, to: &str, amount: u128) -> Result<MintEvent, LedgerError> {
        if !self.minters.contains(caller) {
            return Err(unauthorized(caller, "mint"));
        }

        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        if new_supply > self.mint_cap {
            return Err(LedgerError::MintCapExceeded {
                supply: self.total_supply,
                amount,
                cap: self.mint_cap,
            });
        }

        self.total_supply = new_supply;
        if amount > 0 {
            *self.balances.entry(to.to_string()).or_insert(0) += amount;
        }

        log::info!("Minted {} to {} by {}", amount, to, caller);

        Ok(MintEvent {
            minter: caller.to_string(),
            to: to.to_string(),
            amount,
            total_supply: new_supply,
            timestamp: Utc::now(),
        })
    }

    /// Grant minter status. The owner or any current minter may grant it.
    pub fn add_minter(&mut self, caller: &str, address: &str) -> Result<(), LedgerError> {
        if caller != self.owner && !self.is_minter(caller) {
            return Err(unauthorized(caller, "add minter"));
        }

        if self.minters.insert(address.to_string()) {
            log::info!("Minter added: {}", address);
        }
        Ok(())
    }

    /// Drop the caller's own minter status. Returns whether it was a minter.
    pub fn renounce_minter(&mut self, caller: &str) -> bool {
        let removed = self.minters.remove(caller);
        if removed {
            log::info!("Minter renounced: {}", caller);
        }
        removed
    }
}

fn unauthorized(caller: &str, action: &'static str) -> LedgerError {
    LedgerError::Unauthorized {
        caller: caller.to_string(),
        action,
    }
}
