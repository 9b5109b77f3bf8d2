use thiserror::Error;
use votechain_abi::AbiError;
use votechain_types::{Address, TxHash, TypeError};

/// JSON-RPC error code a wallet returns when the user declines a request (EIP-1193).
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("RPC error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<String>,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid RPC response: {0}")]
    InvalidResponse(String),

    #[error("ABI error: {0}")]
    Abi(#[from] AbiError),

    #[error("malformed value from contract: {0}")]
    Type(#[from] TypeError),

    #[error("no signer bound: connect a wallet first")]
    NoSigner,

    #[error("{signer} is not the contract admin ({admin})")]
    NotAdmin { signer: Address, admin: Address },

    #[error("no contract code at {0}")]
    ContractNotFound(Address),

    #[error("contract at {address} does not match the expected interface: {reason}")]
    ContractMismatch { address: Address, reason: String },

    #[error("transaction {tx_hash} reverted{}", .reason.as_ref().map(|r| format!(": {r}")).unwrap_or_default())]
    Reverted {
        tx_hash: TxHash,
        reason: Option<String>,
    },

    #[error("transaction {0} was not confirmed in time")]
    ConfirmationTimeout(TxHash),

    #[error("expected event {0} in transaction receipt")]
    MissingEvent(&'static str),
}

impl GatewayError {
    /// Whether the wallet reported that the user declined the request.
    pub fn is_user_rejection(&self) -> bool {
        match self {
            Self::Rpc { code, message, .. } => {
                *code == USER_REJECTED_CODE
                    || message.to_lowercase().contains("user rejected")
                    || message.to_lowercase().contains("user denied")
            }
            _ => false,
        }
    }

    /// The revert reason or RPC message, when the contract rejected a call.
    pub fn contract_message(&self) -> Option<&str> {
        match self {
            Self::Rpc { message, .. } => Some(message.as_str()),
            Self::Reverted { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_user_rejection_by_code_and_message() {
        let by_code = GatewayError::Rpc {
            code: 4001,
            message: "rejected".into(),
            data: None,
        };
        let by_message = GatewayError::Rpc {
            code: -32000,
            message: "MetaMask Tx Signature: User denied transaction signature.".into(),
            data: None,
        };
        assert!(by_code.is_user_rejection());
        assert!(by_message.is_user_rejection());
        assert!(!GatewayError::NoSigner.is_user_rejection());
    }

    #[test]
    fn reverted_display_includes_reason() {
        let err = GatewayError::Reverted {
            tx_hash: TxHash::ZERO,
            reason: Some("Already voted".into()),
        };
        assert!(err.to_string().ends_with(": Already voted"));
        let bare = GatewayError::Reverted {
            tx_hash: TxHash::ZERO,
            reason: None,
        };
        assert!(bare.to_string().ends_with("reverted"));
    }
}
