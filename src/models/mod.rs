//! Data models representing ledger entities and their wire shapes.

/// Account balance and limit
pub mod account;
/// Statement snapshot
pub mod statement;
/// Transaction records and requests
pub mod transaction;
