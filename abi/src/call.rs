//! Return data and revert payloads.

use alloy_sol_types::{Panic, Revert, SolCall, SolError};

use crate::AbiError;

/// Decode the return data of an `eth_call` to `C`.
///
/// Empty data means nothing answered at the address, which is reported
/// separately from malformed data.
pub fn decode_returns<C: SolCall>(data: &[u8]) -> Result<C::Return, AbiError> {
    if data.is_empty() {
        return Err(AbiError::EmptyResponse);
    }
    Ok(C::abi_decode_returns(data)?)
}

/// Extract a human-readable reason from revert data.
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    if let Ok(revert) = Revert::abi_decode(data) {
        return Some(revert.reason);
    }
    Panic::abi_decode(data)
        .ok()
        .map(|panic| format!("panic code 0x{:02x}", panic.code))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;
    use alloy_sol_types::SolValue;

    use super::*;
    use crate::IVotingSystem::{adminCall, getCampaignDetailsCall};

    #[test]
    fn empty_return_data_means_no_contract() {
        assert_eq!(decode_returns::<adminCall>(&[]), Err(AbiError::EmptyResponse));
    }

    #[test]
    fn truncated_return_data_is_an_error() {
        let data = (U256::from(1u64), "a longer string value".to_string()).abi_encode_params();
        let err = decode_returns::<getCampaignDetailsCall>(&data[..40]).unwrap_err();
        assert!(matches!(err, AbiError::Decode(_)));
    }

    #[test]
    fn revert_reasons() {
        let revert = Revert {
            reason: "Already voted".into(),
        }
        .abi_encode();
        assert_eq!(decode_revert_reason(&revert).as_deref(), Some("Already voted"));

        let panic = Panic { code: U256::from(0x11u64) }.abi_encode();
        assert_eq!(decode_revert_reason(&panic).as_deref(), Some("panic code 0x11"));

        assert_eq!(decode_revert_reason(&[0xde, 0xad]), None);
    }
}
