use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    #[error("cannot decode contract data: {0}")]
    Decode(String),

    #[error("value does not fit in 64 bits")]
    Overflow,

    #[error("call returned no data (is the contract deployed at this address?)")]
    EmptyResponse,
}

impl From<alloy_sol_types::Error> for AbiError {
    fn from(e: alloy_sol_types::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
