//! In-memory store implementation for testing.

use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Account, Matrix};

use super::{AccountStore, MatrixStore};

/// In-memory store for testing purposes.
///
/// `failing()` builds a store whose reads error, for exercising the
/// `LOAD_FAILURE` path.
pub struct MemoryStore {
    account: Mutex<Option<Account>>,
    matrix: Mutex<Option<Matrix>>,
    fail_reads: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            account: Mutex::new(None),
            matrix: Mutex::new(None),
            fail_reads: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            ..Self::new()
        }
    }

    pub fn with_account(self, account: Account) -> Self {
        *self.account.lock().expect("account lock poisoned") = Some(account);
        self
    }

    pub fn with_matrix(self, matrix: Matrix) -> Self {
        *self.matrix.lock().expect("matrix lock poisoned") = Some(matrix);
        self
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn get(&self) -> Result<Option<Account>> {
        if self.fail_reads {
            anyhow::bail!("simulated store failure");
        }
        Ok(self.account.lock().expect("account lock poisoned").clone())
    }

    async fn set(&self, account: &Account) -> Result<()> {
        *self.account.lock().expect("account lock poisoned") = Some(account.clone());
        Ok(())
    }
}

#[async_trait]
impl MatrixStore for MemoryStore {
    async fn get(&self) -> Result<Option<Matrix>> {
        if self.fail_reads {
            anyhow::bail!("simulated store failure");
        }
        Ok(self.matrix.lock().expect("matrix lock poisoned").clone())
    }

    async fn set(&self, matrix: &Matrix) -> Result<()> {
        *self.matrix.lock().expect("matrix lock poisoned") = Some(matrix.clone());
        Ok(())
    }
}
