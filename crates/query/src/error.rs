//! Query-path error types.
//!
//! Per-query failures always escape to the caller. The facade never
//! converts an internal failure into an empty or zero result — a store
//! outage must be distinguishable from "no alerts yet".

use evewatch_core::error::StorageError;

/// Aggregation engine error.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The underlying store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The caller supplied an invalid parameter.
    #[error("invalid parameter '{param}': {reason}")]
    InvalidParam {
        /// Parameter name.
        param: String,
        /// Rejection reason.
        reason: String,
    },
}

/// Boundary-shaped failure for the external web layer.
///
/// Carries an HTTP-ish status code and a human-readable message. The
/// excluded routing layer maps this 1:1 onto its error response.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct FacadeError {
    /// Non-2xx status code (400 for caller mistakes, 500 for store failures).
    pub status: u16,
    /// Operator/caller facing message.
    pub message: String,
}

impl From<QueryError> for FacadeError {
    fn from(err: QueryError) -> Self {
        let status = match &err {
            QueryError::Storage(_) => 500,
            QueryError::InvalidParam { .. } => 400,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}
