//! Error types and HTTP error response handling.
//!
//! The ledger core returns exactly one `AppError` per failed call. The HTTP
//! adapter turns it into a status code and a JSON body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Input**: the request shape is invalid (`InvalidInput`)
/// - **Resource**: the account does not exist (`AccountNotFound`)
/// - **Business rule**: the post would break the overdraft bound (`OverdraftExceeded`)
/// - **Storage**: the unit of work could not complete (`Database`, `Storage`)
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (connection, query or commit error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Storage failure that did not originate in the database driver,
    /// e.g. a write attempted without holding the account lock.
    #[error("Storage failure: {0}")]
    Storage(String),

    /// The account id is not provisioned.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Account not found")]
    AccountNotFound,

    /// Applying the transaction would push the balance below `-limit`.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Transaction exceeds the available limit")]
    OverdraftExceeded,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    /// The String contains details about what was invalid.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// True for failures of the storage layer rather than of the request.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, AppError::Database(_) | AppError::Storage(_))
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidInput` → 422 Unprocessable Entity
/// - `AccountNotFound` → 404 Not Found
/// - `OverdraftExceeded` → 422 Unprocessable Entity
/// - `Database` / `Storage` → 500 Internal Server Error (details are logged, not returned)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::InvalidInput(ref msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_input", msg.clone())
            }
            AppError::AccountNotFound => {
                (StatusCode::NOT_FOUND, "account_not_found", self.to_string())
            }
            AppError::OverdraftExceeded => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "overdraft_exceeded",
                self.to_string(),
            ),
            AppError::Database(_) | AppError::Storage(_) => {
                tracing::error!(error = %self, "request failed in storage layer");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_failure",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_status_codes() {
        let cases = [
            (AppError::InvalidInput("bad".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::AccountNotFound, StatusCode::NOT_FOUND),
            (AppError::OverdraftExceeded, StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::Storage("lock lost".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Database(sqlx::Error::PoolTimedOut), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn storage_failures_are_classified() {
        assert!(AppError::Storage("x".into()).is_storage_failure());
        assert!(AppError::Database(sqlx::Error::PoolClosed).is_storage_failure());
        assert!(!AppError::OverdraftExceeded.is_storage_failure());
        assert!(!AppError::AccountNotFound.is_storage_failure());
    }
}
