//! PostgreSQL store
//!
//! The non-negative balance invariant lives in the `usuarios` CHECK
//! constraint. Participants are locked with `SELECT ... FOR UPDATE` in id
//! order so concurrent transfers touching the same user serialize instead of
//! deadlocking.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};

use super::{Store, StoreError, UnitOfWork};
use crate::account::{User, UserId};
use crate::db::Database;
use crate::transfer::{Transfer, TransferView};

pub struct PgStore {
    db: Arc<Database>,
}

impl PgStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for PgStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let tx = self.db.pool().begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.db.health_check().await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let users: Vec<User> =
            sqlx::query_as("SELECT id, nombre, balance FROM usuarios ORDER BY id")
                .fetch_all(self.db.pool())
                .await?;
        Ok(users)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let user: Option<User> =
            sqlx::query_as("SELECT id, nombre, balance FROM usuarios WHERE id = $1")
                .bind(id)
                .fetch_optional(self.db.pool())
                .await?;
        Ok(user)
    }

    async fn create_user(&self, name: &str, balance: Decimal) -> Result<User, StoreError> {
        let user: User = sqlx::query_as(
            "INSERT INTO usuarios (nombre, balance) VALUES ($1, $2) RETURNING id, nombre, balance",
        )
        .bind(name)
        .bind(balance)
        .fetch_one(self.db.pool())
        .await?;
        Ok(user)
    }

    async fn update_user(
        &self,
        id: UserId,
        name: &str,
        balance: Decimal,
    ) -> Result<Option<User>, StoreError> {
        let user: Option<User> = sqlx::query_as(
            "UPDATE usuarios SET nombre = $1, balance = $2 WHERE id = $3 \
             RETURNING id, nombre, balance",
        )
        .bind(name)
        .bind(balance)
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_transfers(&self) -> Result<Vec<TransferView>, StoreError> {
        let rows: Vec<TransferView> = sqlx::query_as(
            r#"
            SELECT t.id, e.nombre AS emisor, r.nombre AS receptor, t.monto, t.fecha
            FROM transferencias AS t
            INNER JOIN usuarios AS e ON t.emisor = e.id
            INNER JOIN usuarios AS r ON t.receptor = r.id
            ORDER BY t.fecha, t.id
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows)
    }
}

/// A PostgreSQL transaction. sqlx rolls it back if dropped uncommitted.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn lock_users(&mut self, ids: &[UserId]) -> Result<Vec<User>, StoreError> {
        let users: Vec<User> = sqlx::query_as(
            "SELECT id, nombre, balance FROM usuarios WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(ids.to_vec())
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(users)
    }

    async fn adjust_balance(&mut self, id: UserId, delta: Decimal) -> Result<Decimal, StoreError> {
        let balance: Option<Decimal> = sqlx::query_scalar(
            "UPDATE usuarios SET balance = balance + $1 WHERE id = $2 RETURNING balance",
        )
        .bind(delta)
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        balance.ok_or_else(|| StoreError::NotFound(format!("usuario {}", id)))
    }

    async fn append_transfer(
        &mut self,
        sender: UserId,
        receiver: UserId,
        amount: Decimal,
    ) -> Result<Transfer, StoreError> {
        let transfer: Transfer = sqlx::query_as(
            "INSERT INTO transferencias (emisor, receptor, monto, fecha) \
             VALUES ($1, $2, $3, NOW()) \
             RETURNING id, emisor, receptor, monto, fecha",
        )
        .bind(sender)
        .bind(receiver)
        .bind(amount)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(transfer)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
