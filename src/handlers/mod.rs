//! HTTP request handlers (route handlers).
//!
//! Each handler translates a request into a `LedgerService` call and the
//! result back into JSON. No ledger rules live here.

use crate::{error::AppError, models::account::AccountId};

/// Health checks
pub mod health;
/// Statement endpoint
pub mod statements;
/// Transaction posting endpoint
pub mod transactions;

/// Parse the `{id}` path segment.
///
/// A non-numeric id is invalid input, not a missing route.
pub(crate) fn parse_account_id(raw: &str) -> Result<AccountId, AppError> {
    raw.parse()
        .map_err(|_| AppError::InvalidInput(format!("Invalid account id: {raw}")))
}
