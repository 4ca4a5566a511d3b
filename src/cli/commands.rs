//! CLI commands for the ledger and its wallets
//!
//! Implements all command handlers for the CLI interface. Every command
//! that changes state persists the snapshot before returning.

use crate::config::{Deployment, DeploymentConfig};
use crate::ledger::Ledger;
use crate::multisig::{MultisigEngine, MultisigError, Operation, SignOutcome, TxStatus};
use crate::storage::{Snapshot, Storage, StorageConfig};
use std::path::{Path, PathBuf};
use std::sync::{RwLockReadGuard, RwLockWriteGuard};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Which multisig wallet a command targets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalletKind {
    Vault,
    Mint,
}

/// Application state
pub struct AppState {
    pub deployment: Deployment,
    pub storage: Storage,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load the saved deployment
    pub fn new(data_dir: PathBuf) -> CliResult<Self> {
        let storage = Storage::new(storage_config(&data_dir))?;

        if !storage.exists() {
            return Err(format!(
                "No deployment found in {:?}. Run: petcoin init --config <genesis.json>",
                data_dir
            )
            .into());
        }

        let deployment = storage.load()?.restore();
        log::debug!("Loaded deployment from {:?}", data_dir);

        Ok(Self {
            deployment,
            storage,
            data_dir,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&Snapshot::capture(&self.deployment)?)?;
        Ok(())
    }

    fn ledger(&self) -> CliResult<RwLockReadGuard<'_, Ledger>> {
        self.deployment
            .ledger
            .read()
            .map_err(|_| "ledger lock poisoned".into())
    }

    fn ledger_mut(&self) -> CliResult<RwLockWriteGuard<'_, Ledger>> {
        self.deployment
            .ledger
            .write()
            .map_err(|_| "ledger lock poisoned".into())
    }
}

fn storage_config(data_dir: &Path) -> StorageConfig {
    StorageConfig {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    }
}

/// Render subunits as a decimal amount of whole units
pub fn format_amount(amount: u128, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    let one = 10u128.pow(decimals as u32);
    format!(
        "{}.{:0width$}",
        amount / one,
        amount % one,
        width = decimals as usize
    )
}

// =============================================================================
// Deployment
// =============================================================================

/// Deploy a ledger and its wallets from a genesis file
pub fn cmd_init(data_dir: &Path, config_path: &Path) -> CliResult<()> {
    let storage = Storage::new(storage_config(data_dir))?;

    if storage.exists() {
        println!("⚠️  Deployment already exists at {:?}", data_dir);
        println!("   Remove the data directory to start over");
        return Ok(());
    }

    let config = DeploymentConfig::load(config_path)?;
    let deployment = config.deploy()?;
    storage.save(&Snapshot::capture(&deployment)?)?;

    println!("✅ Deployment initialized!");
    println!("   📁 Data directory: {:?}", data_dir);
    println!(
        "   🪙 Token: {} ({})",
        config.ledger.name, config.ledger.symbol
    );
    println!("   🏦 Vault wallet: {}", deployment.wallet.address());
    println!("      └─ {}", deployment.wallet.description());
    if let Some(mint_wallet) = &deployment.mint_wallet {
        println!("   🏭 Mint wallet: {}", mint_wallet.address());
        println!("      └─ {}", mint_wallet.description());
    }

    Ok(())
}

/// Export the current snapshot to a file
pub fn cmd_export(state: &AppState, path: &Path) -> CliResult<()> {
    crate::storage::save_to_file(&Snapshot::capture(&state.deployment)?, path)?;
    println!("📦 Snapshot exported to {:?}", path);
    Ok(())
}

/// Replace the current state with a snapshot file
pub fn cmd_import(state: &mut AppState, path: &Path) -> CliResult<()> {
    state.deployment = crate::storage::load_from_file(path)?.restore();
    state.save()?;

    println!("📥 Snapshot imported from {:?}", path);
    println!("   🏦 Vault wallet: {}", state.deployment.wallet.address());
    Ok(())
}

// =============================================================================
// Coin
// =============================================================================

/// Display token info
pub fn cmd_coin_info(state: &AppState) -> CliResult<()> {
    let ledger = state.ledger()?;
    let decimals = ledger.decimals();

    println!("🪙 {} ({})", ledger.name(), ledger.symbol());
    println!("   ├─ Decimals: {}", decimals);
    println!(
        "   ├─ Total supply: {}",
        format_amount(ledger.total_supply(), decimals)
    );
    println!("   ├─ Mint cap: {}", format_amount(ledger.mint_cap(), decimals));
    println!("   ├─ Holders: {}", ledger.holder_count());
    println!("   ├─ Owner: {}", ledger.owner());
    println!("   ├─ Admin: {}", ledger.admin());
    println!("   ├─ Vault: {}", ledger.vault());
    println!("   └─ Minters: {}", ledger.minters().join(", "));

    Ok(())
}

pub fn cmd_coin_balance(state: &AppState, address: &str) -> CliResult<()> {
    let ledger = state.ledger()?;
    let decimals = ledger.decimals();

    println!("💰 Balance for {}", address);
    println!(
        "   Total: {} {}",
        format_amount(ledger.balance_of(address), decimals),
        ledger.symbol()
    );
    println!(
        "   Reserve: {} {}",
        format_amount(ledger.reserve_of(address), decimals),
        ledger.symbol()
    );

    Ok(())
}

pub fn cmd_coin_reserve(state: &AppState, address: &str) -> CliResult<()> {
    let ledger = state.ledger()?;
    println!(
        "🔒 Reserve of {}: {} subunits",
        address,
        ledger.reserve_of(address)
    );
    Ok(())
}

/// List holders with a non-zero balance
pub fn cmd_coin_holders(state: &AppState) -> CliResult<()> {
    let ledger = state.ledger()?;
    let mut holders = ledger.holders();
    holders.sort_by(|a, b| b.1.cmp(a.1));

    println!("👥 {} holder(s):", holders.len());
    for (address, balance) in holders {
        println!(
            "   └─ {} = {}",
            address,
            format_amount(*balance, ledger.decimals())
        );
    }
    Ok(())
}

pub fn cmd_coin_allowance(state: &AppState, owner: &str, spender: &str) -> CliResult<()> {
    let ledger = state.ledger()?;
    println!(
        "🎫 Allowance {} -> {}: {} subunits",
        owner,
        spender,
        ledger.allowance(owner, spender)
    );
    Ok(())
}

/// List recent transfers
pub fn cmd_coin_history(state: &AppState, count: usize) -> CliResult<()> {
    let ledger = state.ledger()?;
    let history = ledger.history();

    if history.is_empty() {
        println!("📭 No transfers yet");
        return Ok(());
    }

    println!("📜 Recent transfers:");
    for event in history.iter().rev().take(count) {
        println!(
            "   {} | {} -> {} | {}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S"),
            event.from,
            event.to,
            format_amount(event.amount, ledger.decimals())
        );
    }

    Ok(())
}

pub fn cmd_coin_transfer(state: &mut AppState, caller: &str, to: &str, amount: u128) -> CliResult<()> {
    state.ledger_mut()?.transfer(caller, to, amount)?;
    state.save()?;

    println!("📤 Transferred {} subunits from {} to {}", amount, caller, to);
    Ok(())
}

pub fn cmd_coin_approve(
    state: &mut AppState,
    caller: &str,
    spender: &str,
    amount: u128,
) -> CliResult<()> {
    state.ledger_mut()?.approve(caller, spender, amount);
    state.save()?;

    println!("🎫 {} may spend {} subunits of {}", spender, amount, caller);
    Ok(())
}

pub fn cmd_coin_transfer_from(
    state: &mut AppState,
    caller: &str,
    from: &str,
    to: &str,
    amount: u128,
) -> CliResult<()> {
    state.ledger_mut()?.transfer_from(caller, from, to, amount)?;
    state.save()?;

    println!(
        "📤 {} transferred {} subunits from {} to {}",
        caller, amount, from, to
    );
    Ok(())
}

pub fn cmd_coin_set_reserve(
    state: &mut AppState,
    caller: &str,
    holder: &str,
    amount: u128,
) -> CliResult<()> {
    state.ledger_mut()?.set_reserve(caller, holder, amount)?;
    state.save()?;

    println!("🔒 Reserve of {} set to {} subunits", holder, amount);
    Ok(())
}

pub fn cmd_coin_set_owner(state: &mut AppState, caller: &str, address: &str) -> CliResult<()> {
    let event = state.ledger_mut()?.set_owner(caller, address)?;
    state.save()?;

    println!("👑 Owner changed: {} -> {}", event.previous, event.current);
    Ok(())
}

pub fn cmd_coin_set_admin(state: &mut AppState, caller: &str, address: &str) -> CliResult<()> {
    let event = state.ledger_mut()?.set_admin(caller, address)?;
    state.save()?;

    println!("🛠️  Admin changed: {} -> {}", event.previous, event.current);
    Ok(())
}

pub fn cmd_coin_set_vault(state: &mut AppState, caller: &str, address: &str) -> CliResult<()> {
    let event = state.ledger_mut()?.set_vault(caller, address)?;
    state.save()?;

    println!("🏦 Vault changed: {} -> {}", event.previous, event.current);
    Ok(())
}

pub fn cmd_coin_mint(state: &mut AppState, caller: &str, to: &str, amount: u128) -> CliResult<()> {
    let event = state.ledger_mut()?.mint(caller, to, amount)?;
    state.save()?;

    println!("🏭 Minted {} subunits to {}", amount, to);
    println!("   Total supply: {}", event.total_supply);
    Ok(())
}

pub fn cmd_coin_add_minter(state: &mut AppState, caller: &str, address: &str) -> CliResult<()> {
    state.ledger_mut()?.add_minter(caller, address)?;
    state.save()?;

    println!("✅ {} is now a minter", address);
    Ok(())
}

pub fn cmd_coin_renounce_minter(state: &mut AppState, caller: &str) -> CliResult<()> {
    let removed = state.ledger_mut()?.renounce_minter(caller);

    if removed {
        state.save()?;
        println!("👋 {} is no longer a minter", caller);
    } else {
        println!("ℹ️  {} was not a minter", caller);
    }
    Ok(())
}

// =============================================================================
// Wallets
// =============================================================================

/// Parameters of a wallet request, as given on the command line
#[derive(Debug)]
pub enum WalletRequest {
    Transfer { to: String, whole: u128, subunit: u128 },
    TransferInSubunit { to: String, amount: u128 },
    SignerAdd { address: String },
    SignerRemove { address: String },
    AdminChange { address: String },
    VaultChange { address: String },
    OwnerChange { address: String },
    Mint { to: String, whole: u128, subunit: u128 },
    MintInSubunit { to: String, amount: u128 },
    MinterAdd { address: String },
}

/// Submit a request to one of the wallets
pub fn cmd_wallet_request(
    state: &mut AppState,
    kind: WalletKind,
    caller: &str,
    request: WalletRequest,
    description: &str,
) -> CliResult<()> {
    let result = submit_request(&mut state.deployment, kind, caller, request, description);

    // Recorded even though executing it right away failed
    if let Err(err) = &result {
        if let Some(MultisigError::PendingAfterSubmit { id, .. }) =
            err.downcast_ref::<MultisigError>()
        {
            state.save()?;
            println!("📝 Transaction {} submitted but not executed", id);
        }
    }
    let (id, name) = result?;

    state.save()?;

    println!("📝 {} submitted", name);
    println!("   ID: {}", id);
    println!("   Requestor: {}", caller);
    Ok(())
}

fn submit_request(
    deployment: &mut Deployment,
    kind: WalletKind,
    caller: &str,
    request: WalletRequest,
    description: &str,
) -> CliResult<(u64, &'static str)> {
    let submitted = match kind {
        WalletKind::Vault => {
            let wallet = &mut deployment.wallet;
            let event = match request {
                WalletRequest::Transfer { to, whole, subunit } => {
                    wallet.request_transfer(caller, &to, whole, subunit, description)?
                }
                WalletRequest::TransferInSubunit { to, amount } => {
                    wallet.request_transfer_in_subunit(caller, &to, amount, description)?
                }
                WalletRequest::SignerAdd { address } => {
                    wallet.request_signer_add(caller, &address, description)?
                }
                WalletRequest::SignerRemove { address } => {
                    wallet.request_signer_remove(caller, &address, description)?
                }
                WalletRequest::AdminChange { address } => {
                    wallet.request_admin_change(caller, &address, description)?
                }
                WalletRequest::VaultChange { address } => {
                    wallet.request_vault_change(caller, &address, description)?
                }
                WalletRequest::OwnerChange { address } => {
                    wallet.request_owner_change(caller, &address, description)?
                }
                other => {
                    return Err(format!("{:?} is not a vault wallet request", other).into());
                }
            };
            (event.id, event.name())
        }
        WalletKind::Mint => {
            let wallet = deployment
                .mint_wallet
                .as_mut()
                .ok_or("No mint wallet deployed")?;
            let event = match request {
                WalletRequest::Mint { to, whole, subunit } => {
                    wallet.request_mint(caller, &to, whole, subunit, description)?
                }
                WalletRequest::MintInSubunit { to, amount } => {
                    wallet.request_mint_in_subunit(caller, &to, amount, description)?
                }
                WalletRequest::MinterAdd { address } => {
                    wallet.request_minter_add(caller, &address, description)?
                }
                WalletRequest::SignerAdd { address } => {
                    wallet.request_signer_add(caller, &address, description)?
                }
                WalletRequest::SignerRemove { address } => {
                    wallet.request_signer_remove(caller, &address, description)?
                }
                other => {
                    return Err(format!("{:?} is not a mint wallet request", other).into());
                }
            };
            (event.id, event.name())
        }
    };

    Ok(submitted)
}

/// Confirm a request
pub fn cmd_wallet_sign(state: &mut AppState, kind: WalletKind, caller: &str, id: u64) -> CliResult<()> {
    let result = match kind {
        WalletKind::Vault => state.deployment.wallet.sign_tx(caller, id),
        WalletKind::Mint => mint_wallet_mut(state)?.sign_tx(caller, id),
    };
    finish_signing(state, result)
}

/// Retry execution of a request that holds enough confirmations
pub fn cmd_wallet_execute(
    state: &mut AppState,
    kind: WalletKind,
    caller: &str,
    id: u64,
) -> CliResult<()> {
    let result = match kind {
        WalletKind::Vault => state.deployment.wallet.execute_tx(caller, id),
        WalletKind::Mint => mint_wallet_mut(state)?.execute_tx(caller, id),
    };
    finish_signing(state, result)
}

/// Confirmations are kept even when the execution they trigger fails,
/// so the snapshot is saved either way.
fn finish_signing(
    state: &AppState,
    result: Result<SignOutcome, MultisigError>,
) -> CliResult<()> {
    state.save()?;
    let outcome = result?;

    match outcome.status {
        TxStatus::Executed => {
            println!("✅ Transaction {} executed", outcome.id);
            if let Some(effect) = &outcome.effect {
                println!("   Effect: {:?}", effect);
            }
        }
        _ => {
            println!("✍️  Transaction {} confirmed", outcome.id);
            println!("   Confirmations: {}", outcome.confirmations);
        }
    }
    Ok(())
}

/// Show a request
pub fn cmd_wallet_show(state: &AppState, kind: WalletKind, caller: &str, id: u64) -> CliResult<()> {
    match kind {
        WalletKind::Vault => show_request(&state.deployment.wallet, caller, id),
        WalletKind::Mint => show_request(mint_wallet(state)?, caller, id),
    }
}

/// List the signers of a wallet
pub fn cmd_wallet_signers(state: &AppState, kind: WalletKind, caller: &str) -> CliResult<()> {
    match kind {
        WalletKind::Vault => show_signers(&state.deployment.wallet, caller),
        WalletKind::Mint => show_signers(mint_wallet(state)?, caller),
    }
}

/// Number of requests ever submitted
pub fn cmd_wallet_count(state: &AppState, kind: WalletKind) -> CliResult<()> {
    let (address, count) = match kind {
        WalletKind::Vault => (
            state.deployment.wallet.address(),
            state.deployment.wallet.get_tx_count(),
        ),
        WalletKind::Mint => {
            let wallet = mint_wallet(state)?;
            (wallet.address(), wallet.get_tx_count())
        }
    };

    println!("📋 Wallet {}: {} request(s)", address, count);
    Ok(())
}

fn mint_wallet(state: &AppState) -> CliResult<&crate::multisig::MintMultisigWallet> {
    state
        .deployment
        .mint_wallet
        .as_ref()
        .ok_or_else(|| "No mint wallet deployed".into())
}

fn mint_wallet_mut(state: &mut AppState) -> CliResult<&mut crate::multisig::MintMultisigWallet> {
    state
        .deployment
        .mint_wallet
        .as_mut()
        .ok_or_else(|| "No mint wallet deployed".into())
}

fn show_request<T: Operation>(wallet: &MultisigEngine<T>, caller: &str, id: u64) -> CliResult<()> {
    let request = wallet.view_tx(caller, id)?;

    println!("📄 Transaction {}", request.id);
    println!("   ├─ Type: {}", request.tx_type);
    println!("   ├─ Description: {}", request.description);
    println!("   ├─ Status: {:?}", request.status);
    println!("   ├─ Target: {}", request.target);
    println!("   ├─ Amount: {} subunits", request.amount);
    println!("   ├─ Requestor: {}", request.requestor);
    println!(
        "   ├─ Created: {}",
        request.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "   └─ Confirmed by ({} of {} needed): {}",
        request.confirmation_count(),
        wallet.threshold(),
        request.confirmations.join(", ")
    );

    Ok(())
}

fn show_signers<T: Operation>(wallet: &MultisigEngine<T>, caller: &str) -> CliResult<()> {
    let signers = wallet.get_signers(caller)?;

    println!("🔐 Wallet {} ({})", wallet.address(), wallet.description());
    for signer in signers {
        println!("   └─ {}", signer);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const GENESIS: &str = r#"{
        "ledger": { "owner": "alice", "admin": "bob", "vault": "carol" },
        "wallet": { "threshold": 2, "signers": ["alice", "bob", "carol"], "label": "vault" },
        "mint_wallet": { "threshold": 2, "signers": ["alice", "bob", "carol"], "label": "mint" }
    }"#;

    fn create_test_state(temp_dir: &tempfile::TempDir) -> AppState {
        let genesis = temp_dir.path().join("genesis.json");
        fs::write(&genesis, GENESIS).unwrap();

        let data_dir = temp_dir.path().join("data");
        cmd_init(&data_dir, &genesis).unwrap();
        AppState::new(data_dir).unwrap()
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1_000_000_001, 9), "1.000000001");
        assert_eq!(format_amount(5, 9), "0.000000005");
        assert_eq!(format_amount(42, 0), "42");
    }

    #[test]
    fn test_export_import() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut state = create_test_state(&temp_dir);
        let export = temp_dir.path().join("export.json");

        cmd_export(&state, &export).unwrap();
        cmd_coin_transfer(&mut state, "carol", "dave", 100).unwrap();
        assert_eq!(state.ledger().unwrap().balance_of("dave"), 100);

        cmd_import(&mut state, &export).unwrap();
        assert_eq!(state.ledger().unwrap().balance_of("dave"), 0);

        let reloaded = AppState::new(state.data_dir.clone()).unwrap();
        assert_eq!(reloaded.ledger().unwrap().balance_of("dave"), 0);
    }

    #[test]
    fn test_state_requires_init() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(AppState::new(temp_dir.path().to_path_buf()).is_err());
    }

    #[test]
    fn test_coin_commands_persist() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut state = create_test_state(&temp_dir);

        cmd_coin_transfer(&mut state, "carol", "dave", 100).unwrap();
        cmd_coin_set_reserve(&mut state, "bob", "dave", 60).unwrap();
        assert!(cmd_coin_transfer(&mut state, "dave", "erin", 50).is_err());

        let reloaded = AppState::new(state.data_dir.clone()).unwrap();
        let ledger = reloaded.ledger().unwrap();
        assert_eq!(ledger.balance_of("dave"), 100);
        assert_eq!(ledger.reserve_of("dave"), 60);
    }

    #[test]
    fn test_wallet_flow_persists() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut state = create_test_state(&temp_dir);
        let wallet = state.deployment.wallet.address().to_string();

        cmd_coin_transfer(&mut state, "carol", &wallet, 100).unwrap();
        cmd_wallet_request(
            &mut state,
            WalletKind::Vault,
            "alice",
            WalletRequest::TransferInSubunit {
                to: "dave".to_string(),
                amount: 40,
            },
            "pay dave",
        )
        .unwrap();

        let mut state = AppState::new(state.data_dir.clone()).unwrap();
        cmd_wallet_sign(&mut state, WalletKind::Vault, "bob", 0).unwrap();

        let reloaded = AppState::new(state.data_dir.clone()).unwrap();
        assert_eq!(reloaded.ledger().unwrap().balance_of("dave"), 40);
        assert!(cmd_wallet_show(&reloaded, WalletKind::Vault, "alice", 0).is_ok());
        assert!(cmd_wallet_show(&reloaded, WalletKind::Vault, "dave", 0).is_err());
    }

    #[test]
    fn test_failed_execution_keeps_confirmation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut state = create_test_state(&temp_dir);

        cmd_wallet_request(
            &mut state,
            WalletKind::Vault,
            "alice",
            WalletRequest::TransferInSubunit {
                to: "dave".to_string(),
                amount: 40,
            },
            "unfunded",
        )
        .unwrap();
        assert!(cmd_wallet_sign(&mut state, WalletKind::Vault, "bob", 0).is_err());

        let mut state = AppState::new(state.data_dir.clone()).unwrap();
        let wallet = state.deployment.wallet.address().to_string();
        assert_eq!(
            state
                .deployment
                .wallet
                .view_who_signed_tx("alice", 0)
                .unwrap()
                .len(),
            2
        );

        cmd_coin_transfer(&mut state, "carol", &wallet, 40).unwrap();
        cmd_wallet_execute(&mut state, WalletKind::Vault, "carol", 0).unwrap();
        assert_eq!(state.ledger().unwrap().balance_of("dave"), 40);
    }

    #[test]
    fn test_failed_submit_is_saved() {
        let temp_dir = tempfile::tempdir().unwrap();
        let genesis = temp_dir.path().join("genesis.json");
        fs::write(
            &genesis,
            r#"{
                "ledger": { "owner": "alice", "admin": "bob", "vault": "carol" },
                "wallet": { "threshold": 1, "signers": ["alice", "bob"] }
            }"#,
        )
        .unwrap();
        let data_dir = temp_dir.path().join("data");
        cmd_init(&data_dir, &genesis).unwrap();
        let mut state = AppState::new(data_dir).unwrap();

        let result = cmd_wallet_request(
            &mut state,
            WalletKind::Vault,
            "alice",
            WalletRequest::TransferInSubunit {
                to: "dave".to_string(),
                amount: 40,
            },
            "unfunded",
        );
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MultisigError>(),
            Some(MultisigError::PendingAfterSubmit { id: 0, .. })
        ));

        let mut state = AppState::new(state.data_dir.clone()).unwrap();
        assert_eq!(state.deployment.wallet.get_tx_count(), 1);
        let wallet = state.deployment.wallet.address().to_string();
        cmd_coin_transfer(&mut state, "carol", &wallet, 40).unwrap();
        cmd_wallet_execute(&mut state, WalletKind::Vault, "bob", 0).unwrap();
        assert_eq!(state.ledger().unwrap().balance_of("dave"), 40);
    }

    #[test]
    fn test_mint_wallet_requests() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut state = create_test_state(&temp_dir);

        cmd_wallet_request(
            &mut state,
            WalletKind::Mint,
            "alice",
            WalletRequest::Mint {
                to: "dave".to_string(),
                whole: 2,
                subunit: 0,
            },
            "mint",
        )
        .unwrap();
        cmd_wallet_sign(&mut state, WalletKind::Mint, "carol", 0).unwrap();
        assert_eq!(
            state.ledger().unwrap().balance_of("dave"),
            2_000_000_000
        );

        let wrong_wallet = cmd_wallet_request(
            &mut state,
            WalletKind::Vault,
            "alice",
            WalletRequest::MinterAdd {
                address: "dave".to_string(),
            },
            "wrong wallet",
        );
        assert!(wrong_wallet.is_err());
        assert_eq!(state.deployment.wallet.get_tx_count(), 0);
    }
}
