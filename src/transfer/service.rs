use std::sync::Arc;

use super::error::TransferError;
use super::state::TransferState;
use super::types::{PositiveAmount, Transfer, TransferView};
use crate::account::UserId;
use crate::store::{Store, StoreError, UnitOfWork};

/// Moves money between two users as one unit of work
#[derive(Clone)]
pub struct TransferService {
    store: Arc<dyn Store>,
}

impl TransferService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Debit `sender`, credit `receiver` and append a ledger row, all or nothing.
    ///
    /// The overdraft check is the store's `balance >= 0` constraint; a
    /// rejected debit is reported as [`TransferError::InsufficientFunds`].
    /// Whatever the failure, the unit of work is discarded before the error
    /// is returned. No retries.
    pub async fn execute(
        &self,
        sender: UserId,
        receiver: UserId,
        amount: PositiveAmount,
    ) -> Result<Transfer, TransferError> {
        let (_, result) = self.attempt(sender, receiver, amount).await;
        result
    }

    /// Same as [`execute`](Self::execute), also reporting the terminal state
    /// the attempt ended in: [`TransferState::Committed`] on success,
    /// [`TransferState::Aborted`] otherwise.
    pub async fn attempt(
        &self,
        sender: UserId,
        receiver: UserId,
        amount: PositiveAmount,
    ) -> (TransferState, Result<Transfer, TransferError>) {
        let mut state = TransferState::Started;

        if sender == receiver {
            return (Self::abort(state), Err(TransferError::SameParticipant));
        }

        let mut uow = match self.store.begin().await {
            Ok(uow) => uow,
            Err(e) => {
                tracing::error!(store = self.store.name(), error = %e, "Failed to open unit of work");
                return (Self::abort(state), Err(e.into()));
            }
        };

        let result = Self::apply(uow.as_mut(), &mut state, sender, receiver, amount).await;

        match result {
            Ok(transfer) => {
                if let Err(e) = uow.commit().await {
                    let reached = state;
                    state = Self::abort(state);
                    tracing::error!(
                        sender, receiver, %amount, %reached, %state, error = %e,
                        "Transfer commit failed"
                    );
                    return (state, Err(e.into()));
                }
                state = match state.transition(TransferState::Committed) {
                    Ok(next) => next,
                    Err(e) => return (state, Err(e)),
                };
                tracing::info!(
                    transfer_id = transfer.id, sender, receiver, %amount, %state,
                    "Transfer committed"
                );
                (state, Ok(transfer))
            }
            Err(err) => {
                let reached = state;
                if let Err(e) = uow.rollback().await {
                    // the handle is gone either way; the store discards uncommitted work
                    tracing::warn!(error = %e, "Rollback reported an error");
                }
                state = Self::abort(state);
                if err.is_client_error() {
                    tracing::warn!(
                        sender, receiver, %amount, %reached, %state, code = err.code(),
                        "Transfer aborted"
                    );
                } else {
                    tracing::error!(
                        sender, receiver, %amount, %reached, %state, error = %err,
                        "Transfer aborted"
                    );
                }
                (state, Err(err))
            }
        }
    }

    /// Every state before `Committed` may abort
    fn abort(state: TransferState) -> TransferState {
        state.transition(TransferState::Aborted).unwrap_or(state)
    }

    async fn apply(
        uow: &mut dyn UnitOfWork,
        state: &mut TransferState,
        sender: UserId,
        receiver: UserId,
        amount: PositiveAmount,
    ) -> Result<Transfer, TransferError> {
        // Lock both rows up front, lowest id first
        let locked = uow.lock_users(&[sender, receiver]).await?;
        for id in [sender, receiver] {
            if !locked.iter().any(|u| u.id == id) {
                return Err(TransferError::InvalidReference(id));
            }
        }

        uow.adjust_balance(sender, -amount.get())
            .await
            .map_err(|e| match e {
                StoreError::CheckViolation(_) => TransferError::InsufficientFunds,
                StoreError::NotFound(_) => TransferError::InvalidReference(sender),
                other => other.into(),
            })?;
        *state = state.transition(TransferState::Debited)?;

        uow.adjust_balance(receiver, amount.get())
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => TransferError::InvalidReference(receiver),
                other => other.into(),
            })?;
        *state = state.transition(TransferState::Credited)?;

        let transfer = uow.append_transfer(sender, receiver, amount.get()).await?;
        *state = state.transition(TransferState::Recorded)?;

        Ok(transfer)
    }

    /// Ledger with participant names, oldest first
    pub async fn list(&self) -> Result<Vec<TransferView>, TransferError> {
        self.store.list_transfers().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to list transfers");
            TransferError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FailPoint, MemoryStore};
    use rust_decimal::Decimal;

    async fn setup(balances: &[i64]) -> (MemoryStore, TransferService) {
        let store = MemoryStore::new();
        for (i, b) in balances.iter().enumerate() {
            store
                .create_user(&format!("user{}", i + 1), Decimal::from(*b))
                .await
                .unwrap();
        }
        let service = TransferService::new(Arc::new(store.clone()));
        (store, service)
    }

    fn amount(v: i64) -> PositiveAmount {
        PositiveAmount::try_from(Decimal::from(v)).unwrap()
    }

    async fn balance(store: &MemoryStore, id: UserId) -> Decimal {
        store.get_user(id).await.unwrap().unwrap().balance
    }

    #[tokio::test]
    async fn test_transfer_moves_funds_and_records_row() {
        let (store, service) = setup(&[100, 0]).await;

        let transfer = service.execute(1, 2, amount(40)).await.unwrap();

        assert_eq!(transfer.sender, 1);
        assert_eq!(transfer.receiver, 2);
        assert_eq!(transfer.amount, Decimal::from(40));
        assert_eq!(balance(&store, 1).await, Decimal::from(60));
        assert_eq!(balance(&store, 2).await, Decimal::from(40));
        assert_eq!(store.transfer_count().await, 1);
    }

    #[tokio::test]
    async fn test_exact_balance_can_be_sent() {
        let (store, service) = setup(&[25, 0]).await;
        service.execute(1, 2, amount(25)).await.unwrap();
        assert_eq!(balance(&store, 1).await, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_same_participant_rejected_before_store() {
        let (store, service) = setup(&[100]).await;
        // a broken store would fail begin(); the check must come first
        store.fail_next(FailPoint::Begin).await;
        let err = service.execute(1, 1, amount(5)).await.unwrap_err();
        assert_eq!(err, TransferError::SameParticipant);
    }

    #[tokio::test]
    async fn test_unknown_receiver_is_invalid_reference() {
        let (store, service) = setup(&[100]).await;
        let err = service.execute(1, 9, amount(5)).await.unwrap_err();
        assert_eq!(err, TransferError::InvalidReference(9));
        assert_eq!(balance(&store, 1).await, Decimal::from(100));
    }

    #[tokio::test]
    async fn test_begin_failure_is_internal() {
        let (store, service) = setup(&[100, 0]).await;
        store.fail_next(FailPoint::Begin).await;
        let err = service.execute(1, 2, amount(5)).await.unwrap_err();
        assert!(matches!(err, TransferError::Internal(_)));
    }
}
