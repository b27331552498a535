use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::domain::Transaction;

/// On-disk layout of the ledger file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerDocument {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Repository persisting the ledger as a single JSON document.
///
/// Nothing is cached: every call goes back to the file.
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    /// Create a repository backed by the file at `path`. The file isn't touched.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a repository and make sure its file exists.
    pub async fn init(path: impl Into<PathBuf>) -> Result<Self> {
        let repo = Self::new(path);
        repo.ensure_exists().await?;
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seed an empty ledger document if none exists yet. Safe to call repeatedly.
    pub async fn ensure_exists(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to create ledger file {}", self.path.display())
                });
            }
        };

        let contents = serde_json::to_vec_pretty(&LedgerDocument::default())?;
        file.write_all(&contents)
            .await
            .context("Failed to seed ledger file")?;
        file.flush().await.context("Failed to seed ledger file")?;

        log::info!("Created ledger file {}", self.path.display());
        Ok(())
    }

    /// Read the whole document. A missing file reads as an empty ledger.
    pub async fn load(&self) -> Result<LedgerDocument> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LedgerDocument::default()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };

        serde_json::from_slice(&raw)
            .with_context(|| format!("Malformed ledger file {}", self.path.display()))
    }

    /// Rewrite the whole document.
    /// Writes a temporary sibling file first and renames it over the ledger file.
    pub async fn save(&self, document: &LedgerDocument) -> Result<()> {
        let contents = serde_json::to_vec_pretty(document)?;

        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(format!(".{}.tmp", Uuid::new_v4().simple()));
        let tmp_path = PathBuf::from(tmp_path);

        fs::write(&tmp_path, &contents)
            .await
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;

        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e).with_context(|| format!("Failed to replace {}", self.path.display()));
        }
        Ok(())
    }

    // ========================
    // Transaction operations
    // ========================

    /// All transactions in insertion order.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.load().await?.transactions)
    }

    /// Append one transaction (read, push, rewrite).
    pub async fn append_transaction(&self, transaction: &Transaction) -> Result<()> {
        let mut document = self.load().await?;
        document.transactions.push(transaction.clone());
        self.save(&document)
            .await
            .context("Failed to save transaction")
    }
}
