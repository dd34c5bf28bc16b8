//! User CRUD over the balance store

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use super::models::{User, UserId};
use crate::money;
use crate::store::{Store, StoreError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Usuario no encontrado")]
    NotFound(UserId),

    #[error("El nombre no puede estar vacío")]
    InvalidName,

    #[error("El balance no puede ser negativo")]
    NegativeBalance,

    #[error("El balance debe tener como máximo dos decimales y no superar 9999999999999999.99")]
    InvalidBalance,

    #[error("El usuario tiene transferencias registradas")]
    InUse(UserId),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CheckViolation(_) => AccountError::NegativeBalance,
            StoreError::OutOfRange(_) => AccountError::InvalidBalance,
            other => AccountError::Internal(other.to_string()),
        }
    }
}

/// Validated pass-through to the store for user records
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<User>, AccountError> {
        Ok(self.store.list_users().await?)
    }

    pub async fn create(&self, name: &str, balance: Decimal) -> Result<User, AccountError> {
        let name = validate(name, balance)?;
        let user = self.store.create_user(name, balance).await?;
        tracing::info!(user_id = user.id, %balance, "User created");
        Ok(user)
    }

    pub async fn update(
        &self,
        id: UserId,
        name: &str,
        balance: Decimal,
    ) -> Result<User, AccountError> {
        let name = validate(name, balance)?;
        let user = self
            .store
            .update_user(id, name, balance)
            .await?
            .ok_or(AccountError::NotFound(id))?;
        tracing::info!(user_id = id, %balance, "User updated");
        Ok(user)
    }

    pub async fn delete(&self, id: UserId) -> Result<(), AccountError> {
        match self.store.delete_user(id).await {
            Ok(true) => {
                tracing::info!(user_id = id, "User deleted");
                Ok(())
            }
            Ok(false) => Err(AccountError::NotFound(id)),
            Err(StoreError::ForeignKeyViolation(_)) => Err(AccountError::InUse(id)),
            Err(e) => Err(e.into()),
        }
    }
}

fn validate(name: &str, balance: Decimal) -> Result<&str, AccountError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AccountError::InvalidName);
    }
    if balance < Decimal::ZERO {
        return Err(AccountError::NegativeBalance);
    }
    money::check_money(balance).map_err(|_| AccountError::InvalidBalance)?;
    Ok(name)
}
