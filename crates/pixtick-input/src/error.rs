//! Input subsystem errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to poll input device: {0}")]
    Poll(String),

    #[error("invalid source layout: {0}")]
    Layout(String),

    #[error("key {0} is already driven by another source")]
    KeyConflict(pixtick_types::LogicalKey),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
