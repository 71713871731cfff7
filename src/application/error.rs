use thiserror::Error;

use crate::domain::InvalidRecord;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid expense: {0}")]
    InvalidRecord(#[from] InvalidRecord),

    #[error("Payer name must not be empty")]
    MissingPayer,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
