//! PetCoin vault CLI application
//!
//! A command-line interface for the governed ledger and its multisig
//! wallets. `--caller` is the identity every command acts as.

use clap::{Parser, Subcommand};
use petcoin_vault::cli::{self, AppState, WalletKind, WalletRequest};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "petcoin")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "A governed token ledger with multisig vault wallets", long_about = None)]
struct Cli {
    /// Data directory for snapshot storage
    #[arg(short, long, default_value = ".petcoin_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the ledger and wallets from a genesis file
    Init {
        /// Genesis file (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Ledger operations
    Coin {
        #[command(subcommand)]
        action: CoinCommands,
    },

    /// Vault multisig wallet operations
    Wallet {
        #[command(subcommand)]
        action: WalletCommands,
    },

    /// Mint multisig wallet operations
    MintWallet {
        #[command(subcommand)]
        action: MintWalletCommands,
    },

    /// Export the snapshot to a file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import a snapshot from a file
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Subcommand)]
enum CoinCommands {
    /// Show token info
    Info,

    /// Show balance and reserve of an address
    Balance {
        #[arg(short, long)]
        address: String,
    },

    /// Show the reserve of an address
    Reserve {
        #[arg(short, long)]
        address: String,
    },

    /// Show an allowance
    Allowance {
        #[arg(short, long)]
        owner: String,

        #[arg(short, long)]
        spender: String,
    },

    /// List holders
    Holders,

    /// List recent transfers
    History {
        #[arg(short, long, default_value = "10")]
        count: usize,
    },

    /// Transfer subunits
    Transfer {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        to: String,

        /// Amount in subunits
        #[arg(short, long)]
        amount: u128,
    },

    /// Approve a spender
    Approve {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        spender: String,

        /// Amount in subunits
        #[arg(short, long)]
        amount: u128,
    },

    /// Transfer on behalf of another holder
    TransferFrom {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        from: String,

        #[arg(short, long)]
        to: String,

        /// Amount in subunits
        #[arg(short, long)]
        amount: u128,
    },

    /// Set the reserve of a holder (admin only)
    SetReserve {
        #[arg(short, long)]
        caller: String,

        #[arg(long)]
        holder: String,

        /// Amount in subunits
        #[arg(short, long)]
        amount: u128,
    },

    /// Replace the owner (vault only)
    SetOwner {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        address: String,
    },

    /// Replace the admin (owner or vault)
    SetAdmin {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        address: String,
    },

    /// Replace the vault (owner only)
    SetVault {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        address: String,
    },

    /// Mint subunits (minters only)
    Mint {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        to: String,

        /// Amount in subunits
        #[arg(short, long)]
        amount: u128,
    },

    /// Grant minter status (owner or minter)
    AddMinter {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        address: String,
    },

    /// Drop the caller's own minter status
    RenounceMinter {
        #[arg(short, long)]
        caller: String,
    },
}

#[derive(Subcommand)]
enum WalletCommands {
    /// Request a transfer in whole units plus subunits
    RequestTransfer {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        to: String,

        #[arg(short, long)]
        whole: u128,

        #[arg(short, long, default_value = "0")]
        subunit: u128,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Request a transfer in subunits
    RequestTransferSubunit {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        to: String,

        #[arg(short, long)]
        amount: u128,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Request adding a signer
    RequestSignerAdd {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        address: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Request removing a signer
    RequestSignerRemove {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        address: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Request a new ledger admin
    RequestAdminChange {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        address: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Request a new ledger vault
    RequestVaultChange {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        address: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Request a new ledger owner
    RequestOwnerChange {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        address: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    #[command(flatten)]
    Common(CommonWalletCommands),
}

#[derive(Subcommand)]
enum MintWalletCommands {
    /// Request a mint in whole units plus subunits
    RequestMint {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        to: String,

        #[arg(short, long)]
        whole: u128,

        #[arg(short, long, default_value = "0")]
        subunit: u128,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Request a mint in subunits
    RequestMintSubunit {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        to: String,

        #[arg(short, long)]
        amount: u128,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Request granting minter status
    RequestMinterAdd {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        address: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Request adding a signer
    RequestSignerAdd {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        address: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Request removing a signer
    RequestSignerRemove {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        address: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    #[command(flatten)]
    Common(CommonWalletCommands),
}

/// Commands shared by both wallets
#[derive(Subcommand)]
enum CommonWalletCommands {
    /// Confirm a request
    Sign {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        id: u64,
    },

    /// Retry execution of a fully confirmed request
    Execute {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        id: u64,
    },

    /// Show a request
    Show {
        #[arg(short, long)]
        caller: String,

        #[arg(short, long)]
        id: u64,
    },

    /// List signers
    Signers {
        #[arg(short, long)]
        caller: String,
    },

    /// Number of submitted requests
    Count,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Handle init command separately (doesn't need loaded state)
    if let Commands::Init { config } = &cli.command {
        return cli::cmd_init(&cli.data_dir, config);
    }

    let mut state = AppState::new(cli.data_dir.clone())?;

    match cli.command {
        Commands::Init { .. } => unreachable!(),

        Commands::Coin { action } => run_coin_command(&mut state, action)?,

        Commands::Export { output } => cli::cmd_export(&state, &output)?,

        Commands::Import { input } => cli::cmd_import(&mut state, &input)?,

        Commands::Wallet { action } => {
            let kind = WalletKind::Vault;
            let (caller, request, description) = match action {
                WalletCommands::RequestTransfer {
                    caller,
                    to,
                    whole,
                    subunit,
                    description,
                } => (caller, WalletRequest::Transfer { to, whole, subunit }, description),
                WalletCommands::RequestTransferSubunit {
                    caller,
                    to,
                    amount,
                    description,
                } => (caller, WalletRequest::TransferInSubunit { to, amount }, description),
                WalletCommands::RequestSignerAdd {
                    caller,
                    address,
                    description,
                } => (caller, WalletRequest::SignerAdd { address }, description),
                WalletCommands::RequestSignerRemove {
                    caller,
                    address,
                    description,
                } => (caller, WalletRequest::SignerRemove { address }, description),
                WalletCommands::RequestAdminChange {
                    caller,
                    address,
                    description,
                } => (caller, WalletRequest::AdminChange { address }, description),
                WalletCommands::RequestVaultChange {
                    caller,
                    address,
                    description,
                } => (caller, WalletRequest::VaultChange { address }, description),
                WalletCommands::RequestOwnerChange {
                    caller,
                    address,
                    description,
                } => (caller, WalletRequest::OwnerChange { address }, description),
                WalletCommands::Common(common) => {
                    return run_common_wallet_command(&mut state, kind, common);
                }
            };
            cli::cmd_wallet_request(&mut state, kind, &caller, request, &description)?;
        }

        Commands::MintWallet { action } => {
            let kind = WalletKind::Mint;
            let (caller, request, description) = match action {
                MintWalletCommands::RequestMint {
                    caller,
                    to,
                    whole,
                    subunit,
                    description,
                } => (caller, WalletRequest::Mint { to, whole, subunit }, description),
                MintWalletCommands::RequestMintSubunit {
                    caller,
                    to,
                    amount,
                    description,
                } => (caller, WalletRequest::MintInSubunit { to, amount }, description),
                MintWalletCommands::RequestMinterAdd {
                    caller,
                    address,
                    description,
                } => (caller, WalletRequest::MinterAdd { address }, description),
                MintWalletCommands::RequestSignerAdd {
                    caller,
                    address,
                    description,
                } => (caller, WalletRequest::SignerAdd { address }, description),
                MintWalletCommands::RequestSignerRemove {
                    caller,
                    address,
                    description,
                } => (caller, WalletRequest::SignerRemove { address }, description),
                MintWalletCommands::Common(common) => {
                    return run_common_wallet_command(&mut state, kind, common);
                }
            };
            cli::cmd_wallet_request(&mut state, kind, &caller, request, &description)?;
        }
    }

    Ok(())
}

fn run_coin_command(
    state: &mut AppState,
    action: CoinCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CoinCommands::Info => cli::cmd_coin_info(state),
        CoinCommands::Balance { address } => cli::cmd_coin_balance(state, &address),
        CoinCommands::Reserve { address } => cli::cmd_coin_reserve(state, &address),
        CoinCommands::Allowance { owner, spender } => {
            cli::cmd_coin_allowance(state, &owner, &spender)
        }
        CoinCommands::Holders => cli::cmd_coin_holders(state),
        CoinCommands::History { count } => cli::cmd_coin_history(state, count),
        CoinCommands::Transfer { caller, to, amount } => {
            cli::cmd_coin_transfer(state, &caller, &to, amount)
        }
        CoinCommands::Approve {
            caller,
            spender,
            amount,
        } => cli::cmd_coin_approve(state, &caller, &spender, amount),
        CoinCommands::TransferFrom {
            caller,
            from,
            to,
            amount,
        } => cli::cmd_coin_transfer_from(state, &caller, &from, &to, amount),
        CoinCommands::SetReserve {
            caller,
            holder,
            amount,
        } => cli::cmd_coin_set_reserve(state, &caller, &holder, amount),
        CoinCommands::SetOwner { caller, address } => {
            cli::cmd_coin_set_owner(state, &caller, &address)
        }
        CoinCommands::SetAdmin { caller, address } => {
            cli::cmd_coin_set_admin(state, &caller, &address)
        }
        CoinCommands::SetVault { caller, address } => {
            cli::cmd_coin_set_vault(state, &caller, &address)
        }
        CoinCommands::Mint { caller, to, amount } => {
            cli::cmd_coin_mint(state, &caller, &to, amount)
        }
        CoinCommands::AddMinter { caller, address } => {
            cli::cmd_coin_add_minter(state, &caller, &address)
        }
        CoinCommands::RenounceMinter { caller } => cli::cmd_coin_renounce_minter(state, &caller),
    }
}

fn run_common_wallet_command(
    state: &mut AppState,
    kind: WalletKind,
    action: CommonWalletCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CommonWalletCommands::Sign { caller, id } => cli::cmd_wallet_sign(state, kind, &caller, id),
        CommonWalletCommands::Execute { caller, id } => {
            cli::cmd_wallet_execute(state, kind, &caller, id)
        }
        CommonWalletCommands::Show { caller, id } => cli::cmd_wallet_show(state, kind, &caller, id),
        CommonWalletCommands::Signers { caller } => cli::cmd_wallet_signers(state, kind, &caller),
        CommonWalletCommands::Count => cli::cmd_wallet_count(state, kind),
    }
}
