//! Notify error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Webhook key not configured (set {0} or notifier.key)")]
    MissingKey(String),

    #[error("Invalid webhook URL template: {0}")]
    InvalidTemplate(String),
}

pub type NotifyResult<T> = Result<T, NotifyError>;
