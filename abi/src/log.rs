//! Receipt logs and typed event lookup.

use alloy_primitives::B256;
use alloy_sol_types::SolEvent;
use votechain_types::Address;

use crate::AbiError;

/// A log entry from a transaction receipt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<[u8; 32]>,
    pub data: Vec<u8>,
}

/// Decode the first log emitted by `contract` whose topic0 is event `E`.
pub fn find_event<E: SolEvent>(logs: &[Log], contract: &Address) -> Option<Result<E, AbiError>> {
    logs.iter()
        .find(|log| &log.address == contract && log.topics.first() == Some(&E::SIGNATURE_HASH.0))
        .map(|log| {
            let topics = log.topics.iter().map(|t| B256::from(*t));
            E::decode_raw_log(topics, &log.data).map_err(AbiError::from)
        })
}
