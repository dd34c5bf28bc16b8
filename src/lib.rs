//! Bank Transfers - users with balances and atomic transfers between them
//!
//! # Modules
//!
//! - [`store`] - Balance store and transfer ledger (PostgreSQL or in-memory)
//! - [`transfer`] - Transfer service: debit, credit and ledger row as one unit of work
//! - [`account`] - User CRUD
//! - [`gateway`] - HTTP routes and handlers
//! - [`db`] - PostgreSQL pool and schema
//! - [`money`] - Limits of the `NUMERIC(18, 2)` money columns
//! - [`config`] / [`logging`] - Process setup

pub mod account;
pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod money;
pub mod store;
pub mod transfer;

// Convenient re-exports at crate root
pub use account::{AccountError, AccountService, User, UserId};
pub use store::{MemoryStore, PgStore, Store, StoreError, UnitOfWork};
pub use transfer::{PositiveAmount, Transfer, TransferError, TransferService, TransferView};
