//! JSON file-based store for the account and matrix.
//!
//! Directory structure:
//! ```text
//! data/
//!   account.json
//!   matrix.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::models::{Account, Matrix};

use super::{AccountStore, MatrixStore};

/// JSON file-based implementation of both stores.
pub struct JsonFileStore {
    base_path: PathBuf,
}

/// On-disk shape of the account file.
///
/// The password is stored as a plain string here; it is wrapped in
/// `SecretString` the moment it is loaded.
#[derive(Serialize, Deserialize)]
struct StoredAccount {
    id: String,
    password: String,
}

impl JsonFileStore {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn account_file(&self) -> PathBuf {
        self.base_path.join("account.json")
    }

    fn matrix_file(&self) -> PathBuf {
        self.base_path.join("matrix.json")
    }

    async fn ensure_base_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)
            .await
            .with_context(|| format!("Failed to create data dir: {:?}", self.base_path))?;
        Ok(())
    }

    async fn read_json<T: for<'de> Deserialize<'de>>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {path:?}"))?;

        let value =
            serde_json::from_str(&content).with_context(|| format!("Failed to parse {path:?}"))?;

        Ok(Some(value))
    }

    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        self.ensure_base_dir().await?;

        let content = serde_json::to_string_pretty(value).context("Failed to serialize value")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write {path:?}"))?;

        Ok(())
    }
}

#[async_trait]
impl AccountStore for JsonFileStore {
    async fn get(&self) -> Result<Option<Account>> {
        let stored: Option<StoredAccount> = self.read_json(&self.account_file()).await?;
        Ok(stored.map(|s| Account::new(s.id, s.password)))
    }

    async fn set(&self, account: &Account) -> Result<()> {
        let stored = StoredAccount {
            id: account.id.clone(),
            password: account.password.expose_secret().to_string(),
        };
        self.write_json(&self.account_file(), &stored).await
    }
}

#[async_trait]
impl MatrixStore for JsonFileStore {
    async fn get(&self) -> Result<Option<Matrix>> {
        self.read_json(&self.matrix_file()).await
    }

    async fn set(&self, matrix: &Matrix) -> Result<()> {
        self.write_json(&self.matrix_file(), matrix).await
    }
}
