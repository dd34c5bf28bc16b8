//! Balance store and transfer ledger
//!
//! [`Store`] is the durable side of the service: users with a non-negative
//! balance constraint and an append-only ledger of transfers. Writes that must
//! be atomic go through a [`UnitOfWork`] obtained from [`Store::begin`].
//!
//! Two implementations:
//! - [`PgStore`]: PostgreSQL via sqlx, `CHECK (balance >= 0)` enforced by the server
//! - [`MemoryStore`]: in-process tables with the same constraints, one unit of work at a time

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::StoreError;
pub use memory::{FailPoint, MemoryStore};
pub use postgres::PgStore;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::account::{User, UserId};
use crate::transfer::{Transfer, TransferView};

/// Durable storage for users and transfers
#[async_trait]
pub trait Store: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Open a unit of work. Nothing done through it is visible to others
    /// until [`UnitOfWork::commit`].
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::CheckViolation`] for a negative balance
    async fn create_user(&self, name: &str, balance: Decimal) -> Result<User, StoreError>;

    /// Returns `None` if the user does not exist
    async fn update_user(
        &self,
        id: UserId,
        name: &str,
        balance: Decimal,
    ) -> Result<Option<User>, StoreError>;

    /// Returns `false` if the user does not exist. Fails with
    /// [`StoreError::ForeignKeyViolation`] while transfers reference the user.
    async fn delete_user(&self, id: UserId) -> Result<bool, StoreError>;

    /// All transfers with participant names, ordered by timestamp then id
    async fn list_transfers(&self) -> Result<Vec<TransferView>, StoreError>;
}

/// An open, exclusive unit of work
///
/// Effects become durable only through [`commit`](UnitOfWork::commit).
/// [`rollback`](UnitOfWork::rollback) or simply dropping the handle discards
/// every effect made through it.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Lock the given users for the rest of the unit of work, in ascending id
    /// order. Missing ids are absent from the result.
    async fn lock_users(&mut self, ids: &[UserId]) -> Result<Vec<User>, StoreError>;

    /// Add `delta` to a balance and return the new balance.
    ///
    /// Fails with [`StoreError::NotFound`] for an unknown user and with
    /// [`StoreError::CheckViolation`] if the balance would become negative.
    async fn adjust_balance(&mut self, id: UserId, delta: Decimal) -> Result<Decimal, StoreError>;

    /// Append a ledger row; the store assigns id and timestamp
    async fn append_transfer(
        &mut self,
        sender: UserId,
        receiver: UserId,
        amount: Decimal,
    ) -> Result<Transfer, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}
