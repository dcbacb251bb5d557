//! Storage abstraction for the stored account and answer matrix.
//!
//! The login flow only ever reads these once per attempt; the `configure`
//! flow writes them. Backends are intentionally simple key-less stores since
//! the portal only supports a single account/matrix pair.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Account, Matrix};

/// Store for the portal account.
///
/// Returns `Ok(None)` when nothing has been configured yet and `Err` when the
/// backend itself failed; the login flow maps the two differently
/// (`ACCOUNT_NOT_SET` vs `LOAD_FAILURE`).
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn get(&self) -> Result<Option<Account>>;
    async fn set(&self, account: &Account) -> Result<()>;
}

/// Store for the answer matrix.
///
/// The returned matrix is not shape-checked by the store; callers validate
/// with [`Matrix::is_complete`](crate::models::Matrix::is_complete).
#[async_trait]
pub trait MatrixStore: Send + Sync {
    async fn get(&self) -> Result<Option<Matrix>>;
    async fn set(&self, matrix: &Matrix) -> Result<()>;
}
