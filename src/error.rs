//! Unified error taxonomy for the order settlement core.
//!
//! Every operation in this crate fails into exactly one of these kinds.
//! Nothing here is fatal to the process: a failure is scoped to the single
//! operation that produced it and returned to the caller. No operation is
//! retried automatically by this crate.

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Malformed or missing caller input. No network call was made.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// An order or line-item index could not be resolved.
    #[error("{resource} not found: {reference}")]
    NotFound { resource: String, reference: String },

    /// Credential or token failure against a gateway. Distinct from a
    /// payment rejection.
    #[error("Authentication with {gateway} failed: {message}")]
    Auth { gateway: String, message: String },

    /// The gateway was reachable but rejected the operation.
    #[error("Provider error: provider={provider}, message={message}")]
    Provider {
        provider: String,
        message: String,
        provider_code: Option<String>,
        retryable: bool,
    },

    /// The commerce backend rejected a write. The write may have partially
    /// applied upstream, so callers must not blindly retry.
    #[error("Upstream error from {system}: {message}")]
    Upstream { system: String, message: String },

    /// An irreversible upstream step succeeded while a dependent step
    /// failed. Carries the already-committed reference so a human or a
    /// follow-up idempotent call can complete the missing half.
    #[error("Partial failure: {completed_step} succeeded ({committed_reference}) but {failed_step} failed: {message}")]
    PartialFailure {
        committed_reference: String,
        completed_step: String,
        failed_step: String,
        message: String,
    },
}

impl AppError {
    pub fn validation(message: impl Into<String>, field: Option<&str>) -> Self {
        AppError::Validation {
            message: message.into(),
            field: field.map(|f| f.to_string()),
        }
    }

    pub fn not_found(resource: impl Into<String>, reference: impl Into<String>) -> Self {
        AppError::NotFound {
            resource: resource.into(),
            reference: reference.into(),
        }
    }

    /// Whether the caller may safely retry the whole operation. Partial
    /// failures are never blanket-retryable: only the failed half is.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Validation { .. } => false,
            AppError::NotFound { .. } => false,
            AppError::Auth { .. } => false,
            AppError::Provider { retryable, .. } => *retryable,
            AppError::Upstream { .. } => false,
            AppError::PartialFailure { .. } => false,
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::Validation { .. } => 400,
            AppError::NotFound { .. } => 404,
            AppError::Auth { .. } => 401,
            AppError::Provider { .. } => 502,
            AppError::Upstream { .. } => 502,
            AppError::PartialFailure { .. } => 500,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation { message, .. } => message.clone(),
            AppError::NotFound {
                resource,
                reference,
            } => format!("{} {} was not found", resource, reference),
            AppError::Auth { gateway, .. } => {
                format!("Could not authenticate with {}", gateway)
            }
            AppError::Provider { .. } => "Payment provider returned an error".to_string(),
            AppError::Upstream { system, .. } => {
                format!("{} rejected the requested change", system)
            }
            AppError::PartialFailure {
                completed_step,
                failed_step,
                committed_reference,
                ..
            } => format!(
                "{} completed (reference {}) but {} did not; manual follow-up required",
                completed_step, committed_reference, failed_step
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_mapping_is_correct() {
        assert_eq!(
            AppError::validation("bad input", Some("amount")).http_status_code(),
            400
        );
        assert_eq!(AppError::not_found("order", "42").http_status_code(), 404);
        assert_eq!(
            AppError::Auth {
                gateway: "banking".to_string(),
                message: "invalid client".to_string()
            }
            .http_status_code(),
            401
        );
        assert_eq!(
            AppError::Upstream {
                system: "commerce".to_string(),
                message: "rejected".to_string()
            }
            .http_status_code(),
            502
        );
    }

    #[test]
    fn retryable_flags_are_set() {
        assert!(AppError::Provider {
            provider: "stripe".to_string(),
            message: "503".to_string(),
            provider_code: Some("503".to_string()),
            retryable: true,
        }
        .is_retryable());
        assert!(!AppError::PartialFailure {
            committed_reference: "re_1".to_string(),
            completed_step: "refund".to_string(),
            failed_step: "commerce sync".to_string(),
            message: "timeout".to_string(),
        }
        .is_retryable());
    }

    #[test]
    fn partial_failure_message_carries_committed_reference() {
        let err = AppError::PartialFailure {
            committed_reference: "re_abc".to_string(),
            completed_step: "stripe refund".to_string(),
            failed_step: "commerce sync".to_string(),
            message: "write rejected".to_string(),
        };
        assert!(err.to_string().contains("re_abc"));
        assert!(err.user_message().contains("re_abc"));
    }
}
