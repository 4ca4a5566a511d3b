//! Snapshot persistence layer
//!
//! Saves and loads the ledger together with the state of its wallets.

use crate::config::Deployment;
use crate::ledger::{self, Ledger};
use crate::multisig::{MintMultisigWallet, MintTxType, MultisigWallet, TxType, WalletState};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub snapshot_file: String,
    pub backup_enabled: bool,
    pub max_backups: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".petcoin_data"),
            snapshot_file: "snapshot.json".to_string(),
            backup_enabled: true,
            max_backups: 5,
        }
    }
}

/// Serialisable image of a deployment
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub ledger: Ledger,
    pub wallet: WalletState<TxType>,
    pub mint_wallet: Option<WalletState<MintTxType>>,
}

impl Snapshot {
    /// Copy the current state of a deployment
    pub fn capture(deployment: &Deployment) -> Result<Self, StorageError> {
        let ledger = deployment
            .ledger
            .read()
            .map_err(|_| StorageError::InvalidData("ledger lock poisoned".to_string()))?
            .clone();

        Ok(Self {
            ledger,
            wallet: deployment.wallet.state().clone(),
            mint_wallet: deployment.mint_wallet.as_ref().map(|w| w.state().clone()),
        })
    }

    /// Rebuild the deployment, rebinding every wallet to one shared ledger
    pub fn restore(self) -> Deployment {
        let ledger = ledger::shared(self.ledger);
        Deployment {
            wallet: MultisigWallet::from_state(self.wallet, ledger.clone()),
            mint_wallet: self
                .mint_wallet
                .map(|state| MintMultisigWallet::from_state(state, ledger.clone())),
            ledger,
        }
    }
}

/// Snapshot storage manager
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    /// Create a new storage manager
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    fn snapshot_path(&self) -> PathBuf {
        self.config.data_dir.join(&self.config.snapshot_file)
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}.backup.{}", self.config.snapshot_file, index))
    }

    /// Save a snapshot to disk
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let path = self.snapshot_path();

        if self.config.backup_enabled && self.config.max_backups > 0 && path.exists() {
            self.rotate_backups()?;
            fs::copy(&path, self.backup_path(0))?;
        }

        // Write to temporary file first
        let temp_path = self.config.data_dir.join("snapshot.tmp");
        let file = fs::File::create(&temp_path)?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, snapshot)?;

        // Atomic rename
        fs::rename(&temp_path, &path)?;

        log::debug!("Snapshot saved to {}", path.display());
        Ok(())
    }

    /// Load the snapshot from disk
    pub fn load(&self) -> Result<Snapshot, StorageError> {
        let path = self.snapshot_path();

        if !path.exists() {
            return Err(StorageError::InvalidData(
                "Snapshot file not found".to_string(),
            ));
        }

        load_from_file(&path)
    }

    /// Check if a saved snapshot exists
    pub fn exists(&self) -> bool {
        self.snapshot_path().exists()
    }

    fn rotate_backups(&self) -> Result<(), StorageError> {
        // Delete oldest backup
        let oldest = self.backup_path(self.config.max_backups - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        // Shift existing backups
        for i in (0..self.config.max_backups - 1).rev() {
            let current = self.backup_path(i);
            if current.exists() {
                fs::rename(&current, self.backup_path(i + 1))?;
            }
        }

        Ok(())
    }

    /// Load a backup, 0 being the most recent
    pub fn restore_backup(&self, backup_index: usize) -> Result<Snapshot, StorageError> {
        let backup_path = self.backup_path(backup_index);

        if !backup_path.exists() {
            return Err(StorageError::InvalidData(format!(
                "Backup {} not found",
                backup_index
            )));
        }

        load_from_file(&backup_path)
    }

    /// List available backups
    pub fn list_backups(&self) -> Vec<usize> {
        (0..self.config.max_backups)
            .filter(|&i| self.backup_path(i).exists())
            .collect()
    }
}

/// Save a snapshot to a specific file path
pub fn save_to_file(snapshot: &Snapshot, path: &Path) -> Result<(), StorageError> {
    let file = fs::File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, snapshot)?;
    Ok(())
}

/// Load a snapshot from a specific file path
pub fn load_from_file(path: &Path) -> Result<Snapshot, StorageError> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}
