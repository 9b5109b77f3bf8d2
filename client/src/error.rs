use thiserror::Error;

use votechain_gateway::GatewayError;
use votechain_ipfs::IpfsError;
use votechain_types::CampaignId;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("wallet not connected")]
    WalletNotConnected,

    #[error("wallet unavailable: {0}")]
    WalletUnavailable(String),

    #[error("wallet is on chain {found}, expected {expected}")]
    WrongChain { expected: u64, found: u64 },

    #[error("invalid dates: {0}")]
    InvalidDates(String),

    #[error("{0}")]
    Validation(String),

    #[error("you have already voted in campaign {0}")]
    AlreadyVoted(CampaignId),

    #[error("a vote for campaign {0} is already being submitted")]
    VoteInFlight(CampaignId),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("IPFS upload failed: {0}")]
    Ipfs(#[from] IpfsError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// The user-facing buckets every failure is sorted into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    WalletNotConnected,
    UserRejected,
    InsufficientFunds,
    AdminOnly,
    InvalidDates,
    Generic,
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::WalletNotConnected | Self::WalletUnavailable(_) | Self::WrongChain { .. } => {
                ErrorCategory::WalletNotConnected
            }
            Self::InvalidDates(_) => ErrorCategory::InvalidDates,
            Self::Gateway(e) => classify_gateway(e),
            _ => ErrorCategory::Generic,
        }
    }

    /// The one-line message shown in the notification.
    pub fn user_message(&self) -> String {
        match self.category() {
            ErrorCategory::WalletNotConnected => match self {
                Self::WrongChain { .. } | Self::WalletUnavailable(_) => {
                    format!("Wallet not connected: {self}")
                }
                _ => "Please connect your wallet first.".to_string(),
            },
            ErrorCategory::UserRejected => "Transaction was rejected in your wallet.".to_string(),
            ErrorCategory::InsufficientFunds => {
                "Insufficient funds to pay for this transaction.".to_string()
            }
            ErrorCategory::AdminOnly => {
                "Only the contract admin can perform this action.".to_string()
            }
            ErrorCategory::InvalidDates => match self {
                Self::InvalidDates(detail) => format!("Invalid campaign dates: {detail}"),
                other => format!("Invalid campaign dates: {}", contract_text(other)),
            },
            ErrorCategory::Generic => contract_text(self),
        }
    }

    /// Whether the same action might succeed if simply tried again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::WalletUnavailable(_)
                | Self::Ipfs(IpfsError::Unreachable(_))
                | Self::Gateway(GatewayError::Transport(_))
                | Self::Gateway(GatewayError::ConfirmationTimeout(_))
        )
    }
}

fn classify_gateway(e: &GatewayError) -> ErrorCategory {
    if e.is_user_rejection() {
        return ErrorCategory::UserRejected;
    }
    match e {
        GatewayError::NoSigner => return ErrorCategory::WalletNotConnected,
        GatewayError::NotAdmin { .. } => return ErrorCategory::AdminOnly,
        _ => {}
    }
    let Some(message) = e.contract_message() else {
        return ErrorCategory::Generic;
    };
    let message = message.to_lowercase();
    if message.contains("insufficient funds") {
        ErrorCategory::InsufficientFunds
    } else if message.contains("only admin") || message.contains("not admin") {
        ErrorCategory::AdminOnly
    } else if message.contains("date") {
        ErrorCategory::InvalidDates
    } else {
        ErrorCategory::Generic
    }
}

/// The contract's own words when it gave any, otherwise the error text.
fn contract_text(e: &ClientError) -> String {
    match e {
        ClientError::Gateway(g) => match g.contract_message() {
            Some(m) => m
                .strip_prefix("execution reverted: ")
                .unwrap_or(m)
                .to_string(),
            None => g.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use votechain_types::{Address, TxHash};

    fn rpc(code: i64, message: &str) -> ClientError {
        ClientError::Gateway(GatewayError::Rpc {
            code,
            message: message.into(),
            data: None,
        })
    }

    fn reverted(reason: &str) -> ClientError {
        ClientError::Gateway(GatewayError::Reverted {
            tx_hash: TxHash::ZERO,
            reason: Some(reason.into()),
        })
    }

    #[test]
    fn categories() {
        assert_eq!(
            ClientError::WalletNotConnected.category(),
            ErrorCategory::WalletNotConnected
        );
        assert_eq!(
            ClientError::Gateway(GatewayError::NoSigner).category(),
            ErrorCategory::WalletNotConnected
        );
        assert_eq!(rpc(4001, "whatever").category(), ErrorCategory::UserRejected);
        assert_eq!(
            rpc(-32000, "insufficient funds for gas * price + value").category(),
            ErrorCategory::InsufficientFunds
        );
        assert_eq!(
            ClientError::Gateway(GatewayError::NotAdmin {
                signer: Address::new([1; 20]),
                admin: Address::new([2; 20]),
            })
            .category(),
            ErrorCategory::AdminOnly
        );
        assert_eq!(
            reverted("Only admin can perform this action").category(),
            ErrorCategory::AdminOnly
        );
        assert_eq!(
            reverted("End date must be after start date").category(),
            ErrorCategory::InvalidDates
        );
        assert_eq!(reverted("Already voted").category(), ErrorCategory::Generic);
        assert_eq!(
            ClientError::Validation("name is required".into()).category(),
            ErrorCategory::Generic
        );
    }

    #[test]
    fn generic_messages_use_contract_wording() {
        assert_eq!(reverted("Already voted").user_message(), "Already voted");
        assert_eq!(
            rpc(3, "execution reverted: Campaign does not exist").user_message(),
            "Campaign does not exist"
        );
        assert_eq!(
            ClientError::Validation("email is malformed".into()).user_message(),
            "email is malformed"
        );
    }

    #[test]
    fn date_messages_carry_detail() {
        assert_eq!(
            ClientError::InvalidDates("end must be after start".into()).user_message(),
            "Invalid campaign dates: end must be after start"
        );
    }

    #[test]
    fn retryable_only_for_transient_failures() {
        assert!(ClientError::Gateway(GatewayError::Transport("down".into())).is_retryable());
        assert!(!reverted("Already voted").is_retryable());
        assert!(!rpc(4001, "no").is_retryable());
    }
}
