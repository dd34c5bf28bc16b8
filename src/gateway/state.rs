use std::sync::Arc;

use crate::account::AccountService;
use crate::store::Store;
use crate::transfer::TransferService;

/// Shared gateway state. Holds no mutable data of its own; everything that
/// changes lives in the store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub accounts: AccountService,
    pub transfers: TransferService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            accounts: AccountService::new(store.clone()),
            transfers: TransferService::new(store.clone()),
            store,
        }
    }
}
