//! In-memory store
//!
//! Simulates the PostgreSQL contract: the balance CHECK constraint, the ledger
//! foreign keys, and store-assigned ids and timestamps. A unit of work holds
//! the table lock for its whole lifetime and works on a staged copy, so units
//! of work are serializable and an abandoned one leaves nothing behind.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{Store, StoreError, UnitOfWork};
use crate::account::{User, UserId};
use crate::money::{self, MoneyError};
use crate::transfer::{Transfer, TransferView};

const BALANCE_CHECK: &str = "usuarios_balance_check";
const EMISOR_FKEY: &str = "transferencias_emisor_fkey";
const RECEPTOR_FKEY: &str = "transferencias_receptor_fkey";

/// Step at which the next unit of work fails with [`StoreError::Unavailable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Begin,
    Lock,
    /// First balance adjustment
    Debit,
    /// Second balance adjustment
    Credit,
    Record,
    Commit,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    transfers: Vec<Transfer>,
    last_user_id: UserId,
    last_transfer_id: i32,
    fail_next: Option<FailPoint>,
}

impl Tables {
    /// Column type first, then the CHECK constraint, as PostgreSQL does
    fn check_balance(balance: Decimal) -> Result<(), StoreError> {
        if money::check_money(balance) == Err(MoneyError::Overflow) {
            return Err(StoreError::OutOfRange(format!("balance {}", balance)));
        }
        if balance < Decimal::ZERO {
            return Err(StoreError::CheckViolation(BALANCE_CHECK.to_string()));
        }
        Ok(())
    }

    fn is_referenced(&self, id: UserId) -> bool {
        self.transfers
            .iter()
            .any(|t| t.sender == id || t.receiver == id)
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next unit of work fail at `point`. One-shot.
    pub async fn fail_next(&self, point: FailPoint) {
        self.tables.lock().await.fail_next = Some(point);
    }

    /// Number of ledger rows
    pub async fn transfer_count(&self) -> usize {
        self.tables.lock().await.transfers.len()
    }
}

fn injected(point: FailPoint) -> StoreError {
    StoreError::Unavailable(format!("injected failure at {:?}", point))
}

#[async_trait]
impl Store for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let mut guard = self.tables.clone().lock_owned().await;
        let fail_at = guard.fail_next.take();
        if fail_at == Some(FailPoint::Begin) {
            return Err(injected(FailPoint::Begin));
        }
        let staged = (*guard).clone();
        Ok(Box::new(MemoryUnitOfWork {
            guard,
            staged,
            fail_at,
            adjustments: 0,
        }))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables.lock().await.users.values().cloned().collect())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn create_user(&self, name: &str, balance: Decimal) -> Result<User, StoreError> {
        Tables::check_balance(balance)?;
        let mut tables = self.tables.lock().await;
        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            name: name.to_string(),
            balance,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(
        &self,
        id: UserId,
        name: &str,
        balance: Decimal,
    ) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.lock().await;
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        Tables::check_balance(balance)?;
        user.name = name.to_string();
        user.balance = balance;
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&id) {
            return Ok(false);
        }
        if tables.is_referenced(id) {
            return Err(StoreError::ForeignKeyViolation(EMISOR_FKEY.to_string()));
        }
        tables.users.remove(&id);
        Ok(true)
    }

    async fn list_transfers(&self) -> Result<Vec<TransferView>, StoreError> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<TransferView> = tables
            .transfers
            .iter()
            .filter_map(|t| {
                // inner join: rows whose participants are gone are skipped
                let sender = tables.users.get(&t.sender)?;
                let receiver = tables.users.get(&t.receiver)?;
                Some(TransferView {
                    id: t.id,
                    sender_name: sender.name.clone(),
                    receiver_name: receiver.name.clone(),
                    amount: t.amount,
                    timestamp: t.timestamp,
                })
            })
            .collect();
        rows.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Ok(rows)
    }
}

/// Exclusive unit of work over a staged copy of the tables
pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
    fail_at: Option<FailPoint>,
    adjustments: usize,
}

impl MemoryUnitOfWork {
    fn fail_if(&self, point: FailPoint) -> Result<(), StoreError> {
        if self.fail_at == Some(point) {
            return Err(injected(point));
        }
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn lock_users(&mut self, ids: &[UserId]) -> Result<Vec<User>, StoreError> {
        self.fail_if(FailPoint::Lock)?;
        // the whole table is already held; this only reports what exists
        let mut users: Vec<User> = ids
            .iter()
            .filter_map(|id| self.staged.users.get(id).cloned())
            .collect();
        users.sort_by_key(|u| u.id);
        users.dedup_by_key(|u| u.id);
        Ok(users)
    }

    async fn adjust_balance(&mut self, id: UserId, delta: Decimal) -> Result<Decimal, StoreError> {
        let point = if self.adjustments == 0 {
            FailPoint::Debit
        } else {
            FailPoint::Credit
        };
        self.adjustments += 1;
        self.fail_if(point)?;

        let user = self
            .staged
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("usuario {}", id)))?;
        let balance = user.balance.checked_add(delta).ok_or_else(|| {
            StoreError::OutOfRange(format!("balance {} + {}", user.balance, delta))
        })?;
        Tables::check_balance(balance)?;
        user.balance = balance;
        Ok(balance)
    }

    async fn append_transfer(
        &mut self,
        sender: UserId,
        receiver: UserId,
        amount: Decimal,
    ) -> Result<Transfer, StoreError> {
        self.fail_if(FailPoint::Record)?;
        if !self.staged.users.contains_key(&sender) {
            return Err(StoreError::ForeignKeyViolation(EMISOR_FKEY.to_string()));
        }
        if !self.staged.users.contains_key(&receiver) {
            return Err(StoreError::ForeignKeyViolation(RECEPTOR_FKEY.to_string()));
        }

        self.staged.last_transfer_id += 1;
        let transfer = Transfer {
            id: self.staged.last_transfer_id,
            sender,
            receiver,
            amount,
            timestamp: Utc::now(),
        };
        self.staged.transfers.push(transfer.clone());
        Ok(transfer)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.fail_if(FailPoint::Commit)?;
        let MemoryUnitOfWork {
            mut guard, staged, ..
        } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}
