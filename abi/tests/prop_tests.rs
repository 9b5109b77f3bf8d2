use proptest::prelude::*;

use votechain_abi::IVotingSystem::{getCampaignDetailsCall, getUserDetailsCall};
use votechain_abi::{decode_returns, decode_revert_reason, narrow_u64, SolValue, U256};

proptest! {
    /// Arbitrary return data never panics the decoders.
    #[test]
    fn decoding_garbage_never_panics(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode_returns::<getCampaignDetailsCall>(&data);
        let _ = decode_returns::<getUserDetailsCall>(&data);
        let _ = decode_revert_reason(&data);
    }

    /// Campaign-shaped return data decodes field by field.
    #[test]
    fn campaign_shaped_returns(
        id in any::<u64>(),
        closed in any::<bool>(),
        hash in "[A-Za-z0-9]{0,64}",
        voters in prop::collection::vec(prop::array::uniform20(any::<u8>()), 0..8),
        counts in prop::collection::vec(any::<u64>(), 0..4),
    ) {
        let voters: Vec<alloy_primitives::Address> =
            voters.into_iter().map(alloy_primitives::Address::new).collect();
        let counts: Vec<U256> = counts.into_iter().map(U256::from).collect();
        let data = (
            U256::from(id),
            U256::from(1u64),
            U256::from(2u64),
            closed,
            alloy_primitives::Address::ZERO,
            hash.clone(),
            voters.clone(),
            voters.clone(),
            counts.clone(),
        )
            .abi_encode_params();
        prop_assert_eq!(data.len() % 32, 0);
        let decoded = decode_returns::<getCampaignDetailsCall>(&data).unwrap();
        prop_assert_eq!(narrow_u64(decoded.id).unwrap(), id);
        prop_assert_eq!(decoded.isClosed, closed);
        prop_assert_eq!(decoded.detailsHash, hash);
        prop_assert_eq!(decoded.voters, voters);
        prop_assert_eq!(decoded.voteCounts, counts);
    }
}
