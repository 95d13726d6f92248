//! Bounded-overdraft account ledger.
//!
//! Each account has a fixed credit limit and a running balance that may go
//! negative down to `-limit`. Clients post credits and debits and read a
//! statement with the ten most recent transactions.
//!
//! # Architecture
//!
//! - **Core**: [`services::ledger_service::LedgerService`] enforces the
//!   overdraft bound inside one unit of work per post
//! - **Storage**: [`store::AccountStore`], backed by PostgreSQL (`sqlx`) or
//!   kept in memory
//! - **HTTP**: Axum handlers translating JSON requests into ledger calls

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
