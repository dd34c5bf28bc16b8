//! User accounts
//!
//! Plain CRUD over the balance store. Balances change here only through
//! explicit edits; money movement goes through [`crate::transfer`].

pub mod models;
pub mod service;

pub use models::{NewUserRequest, User, UserId, UserUpdateRequest};
pub use service::{AccountError, AccountService};
