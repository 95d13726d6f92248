//! Business logic services.
//!
//! Services contain the ledger rules, separated from HTTP handlers and
//! from the storage backend.

pub mod ledger_service;
