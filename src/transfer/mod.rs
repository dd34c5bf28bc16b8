//! Money transfers between users
//!
//! - [`TransferService`]: debit, credit and ledger insert as one unit of work
//! - [`TransferState`]: per-attempt state machine
//! - [`TransferError`]: failure taxonomy surfaced to the gateway

pub mod error;
pub mod service;
pub mod state;
pub mod types;

pub use error::TransferError;
pub use service::TransferService;
pub use state::TransferState;
pub use types::{PositiveAmount, Transfer, TransferRequest, TransferView};
