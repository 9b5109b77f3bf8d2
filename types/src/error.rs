//! Parse and conversion errors for domain types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid transaction hash: {0}")]
    InvalidTxHash(String),

    #[error("invalid content hash: {0}")]
    InvalidContentHash(String),

    #[error("unknown role code {0}")]
    InvalidRole(u8),

    #[error("role {0} cannot be requested through verification")]
    NotRequestable(String),

    #[error("unknown verification status code {0}")]
    InvalidStatus(u8),
}
