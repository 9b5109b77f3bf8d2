use thiserror::Error;

#[derive(Debug, Error)]
pub enum IpfsError {
    #[error("pinning service unreachable: {0}")]
    Unreachable(String),

    #[error("pinning request failed: {0}")]
    RequestFailed(String),

    #[error("pinning service rejected credentials")]
    Unauthorized,

    #[error("invalid response from pinning service: {0}")]
    InvalidResponse(String),

    #[error("refusing to pin an empty file")]
    EmptyUpload,

    #[error("failed to serialize JSON payload: {0}")]
    Serialize(#[from] serde_json::Error),
}
