//! Mapping between the contract's return values and the client's types.
//!
//! Call encoding and selectors come from [`IVotingSystem`]; this module only
//! normalizes what the contract hands back.

use std::collections::BTreeMap;

use votechain_abi::IVotingSystem::{
    checkUpkeepReturn, getCampaignDetailsReturn, getUserDetailsReturn,
    getVerificationRequestReturn, updateUserDetailsCall, CampaignCreated,
};
use votechain_abi::{from_sol_address, from_sol_addresses, narrow_u64, uint, SolValue, U256};
use votechain_types::{
    Address, Campaign, CampaignId, ContentHash, RequestedRole, Timestamp, UserDetails,
    VerificationRequest, VerificationStatus,
};

use crate::GatewayError;

/// Decode `getUserDetails`; `None` when the account never saved a profile.
///
/// An image hash that is not a CID (older front-ends stored gateway URLs) is
/// dropped with a warning rather than failing the whole profile.
pub fn decode_user_details(ret: getUserDetailsReturn) -> Option<UserDetails> {
    let image = ret.profileImageHash;
    let profile_image_hash = if image.is_empty() {
        None
    } else {
        match ContentHash::parse(&image) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!(image = %image, "ignoring unreadable profile image hash: {e}");
                None
            }
        }
    };
    let details = UserDetails {
        name: ret.name,
        email: ret.email,
        date_of_birth: ret.dateOfBirth,
        identity_number: ret.identityNumber,
        contact_number: ret.contactNumber,
        bio: ret.bio,
        profile_image_hash,
        supportive_links: ret.supportiveLinks,
    };
    if details.is_empty() {
        None
    } else {
        Some(details)
    }
}

/// `updateUserDetails` call for `details`.
pub fn user_details_call(details: &UserDetails) -> updateUserDetailsCall {
    updateUserDetailsCall {
        name: details.name.clone(),
        email: details.email.clone(),
        dateOfBirth: details.date_of_birth.clone(),
        identityNumber: details.identity_number.clone(),
        contactNumber: details.contact_number.clone(),
        bio: details.bio.clone(),
        profileImageHash: details
            .profile_image_hash
            .as_ref()
            .map(|h| h.as_str().to_string())
            .unwrap_or_default(),
        supportiveLinks: details.supportive_links.clone(),
    }
}

/// Decode `getCampaignDetails` into a normalized [`Campaign`].
pub fn decode_campaign(ret: getCampaignDetailsReturn) -> Result<Campaign, GatewayError> {
    let id = CampaignId(narrow_u64(ret.id)?);
    let voters = from_sol_addresses(ret.voters);
    let candidates = from_sol_addresses(ret.candidates);
    let counts = ret
        .voteCounts
        .into_iter()
        .map(narrow_u64)
        .collect::<Result<Vec<_>, _>>()?;

    if counts.len() != candidates.len() {
        return Err(GatewayError::InvalidResponse(format!(
            "campaign {id}: {} vote counts for {} candidates",
            counts.len(),
            candidates.len()
        )));
    }
    let tallies: BTreeMap<Address, u64> = candidates.iter().copied().zip(counts).collect();

    Ok(Campaign {
        id,
        start: Timestamp::new(narrow_u64(ret.startDate)?),
        end: Timestamp::new(narrow_u64(ret.endDate)?),
        is_closed: ret.isClosed,
        winner: from_sol_address(ret.winner).non_zero(),
        details_hash: ret.detailsHash,
        voters,
        candidates,
        tallies,
    })
}

/// Decode `getVerificationRequest`; `None` when the account has no request.
pub fn decode_verification_request(
    ret: getVerificationRequestReturn,
) -> Result<Option<VerificationRequest>, GatewayError> {
    let requester = from_sol_address(ret.requester);
    if requester.is_zero() {
        return Ok(None);
    }
    Ok(Some(VerificationRequest {
        requester,
        role: RequestedRole::from_u8(ret.role)?,
        document_hash: ret.documentHash,
        admin_feedback: ret.adminFeedback,
        status: VerificationStatus::from_u8(ret.status)?,
    }))
}

/// The new campaign's id, as carried by `CampaignCreated`.
pub fn decode_campaign_created(event: &CampaignCreated) -> Result<CampaignId, GatewayError> {
    Ok(CampaignId(narrow_u64(event.campaignId)?))
}

/// `performData` carried between `checkUpkeep` and `performUpkeep`.
pub fn upkeep_perform_data(id: CampaignId) -> Vec<u8> {
    uint(id.0).abi_encode()
}

/// Decode `checkUpkeep`; `Some(id)` when a campaign is due to be closed.
pub fn decode_check_upkeep(ret: checkUpkeepReturn) -> Result<Option<CampaignId>, GatewayError> {
    if !ret.upkeepNeeded {
        return Ok(None);
    }
    let id = U256::abi_decode(&ret.performData).map_err(votechain_abi::AbiError::from)?;
    Ok(Some(CampaignId(narrow_u64(id)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use votechain_abi::IVotingSystem::getUserDetailsCall;
    use votechain_abi::{decode_returns, to_sol_address, SolCall};

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    fn campaign_return(counts: Vec<u64>) -> getCampaignDetailsReturn {
        getCampaignDetailsReturn {
            id: uint(3),
            startDate: uint(1_000),
            endDate: uint(2_000),
            isClosed: false,
            winner: to_sol_address(Address::ZERO),
            detailsHash: "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG".into(),
            voters: vec![to_sol_address(addr(1))],
            candidates: vec![to_sol_address(addr(10)), to_sol_address(addr(11))],
            voteCounts: counts.into_iter().map(uint).collect(),
        }
    }

    fn details_return(image: &str) -> getUserDetailsReturn {
        getUserDetailsReturn {
            name: "Ada".into(),
            email: "ada@example.org".into(),
            dateOfBirth: "1990-04-01".into(),
            identityNumber: "ID-1".into(),
            contactNumber: "5550100".into(),
            bio: String::new(),
            profileImageHash: image.into(),
            supportiveLinks: vec!["https://example.org/ada".into()],
        }
    }

    #[test]
    fn decodes_campaign() {
        let campaign = decode_campaign(campaign_return(vec![4, 2])).unwrap();
        assert_eq!(campaign.id, CampaignId(3));
        assert_eq!(campaign.winner, None);
        assert_eq!(campaign.votes_for(&addr(10)), 4);
        assert_eq!(campaign.votes_for(&addr(11)), 2);
        assert_eq!(campaign.voters, vec![addr(1)]);
    }

    #[test]
    fn mismatched_tally_length_is_rejected() {
        let err = decode_campaign(campaign_return(vec![1])).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[test]
    fn empty_profile_decodes_to_none() {
        let mut ret = details_return("");
        ret.name.clear();
        ret.email.clear();
        ret.dateOfBirth.clear();
        ret.identityNumber.clear();
        ret.contactNumber.clear();
        ret.supportiveLinks.clear();
        assert_eq!(decode_user_details(ret), None);
    }

    #[test]
    fn user_details_survive_the_contract_encoding() {
        let details = UserDetails {
            name: "Ada".into(),
            email: "ada@example.org".into(),
            date_of_birth: "1990-04-01".into(),
            identity_number: "ID-1".into(),
            contact_number: "5550100".into(),
            bio: String::new(),
            profile_image_hash: Some(
                ContentHash::parse("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG").unwrap(),
            ),
            supportive_links: vec!["https://example.org/ada".into()],
        };
        // Argument and return tuples share one layout.
        let call = user_details_call(&details).abi_encode();
        let ret = decode_returns::<getUserDetailsCall>(&call[4..]).unwrap();
        assert_eq!(decode_user_details(ret), Some(details));
    }

    #[test]
    fn gateway_url_image_hash_keeps_the_rest_of_the_profile() {
        let ret = details_return(
            "https://gateway.pinata.cloud/ipfs/QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG",
        );
        let details = decode_user_details(ret).unwrap();
        assert_eq!(details.name, "Ada");
        assert_eq!(details.profile_image_hash, None);
        assert_eq!(details.supportive_links.len(), 1);
    }

    #[test]
    fn verification_request_for_unknown_account_is_none() {
        let ret = getVerificationRequestReturn {
            requester: to_sol_address(Address::ZERO),
            role: 0,
            documentHash: String::new(),
            adminFeedback: String::new(),
            status: 0,
        };
        assert_eq!(decode_verification_request(ret).unwrap(), None);
    }

    #[test]
    fn verification_request_decodes_role_and_status() {
        let ret = getVerificationRequestReturn {
            requester: to_sol_address(addr(5)),
            role: 2,
            documentHash: "QmDoc".into(),
            adminFeedback: "blurry scan".into(),
            status: 2,
        };
        let req = decode_verification_request(ret).unwrap().unwrap();
        assert_eq!(req.role, RequestedRole::Candidate);
        assert_eq!(req.status, VerificationStatus::Rejected);
        assert_eq!(req.admin_feedback, "blurry scan");
    }

    #[test]
    fn unknown_role_code_is_rejected() {
        let ret = getVerificationRequestReturn {
            requester: to_sol_address(addr(5)),
            role: 9,
            documentHash: "QmDoc".into(),
            adminFeedback: String::new(),
            status: 0,
        };
        assert!(matches!(
            decode_verification_request(ret),
            Err(GatewayError::Type(_))
        ));
    }

    #[test]
    fn upkeep_perform_data_round_trip() {
        let due = checkUpkeepReturn {
            upkeepNeeded: true,
            performData: upkeep_perform_data(CampaignId(9)).into(),
        };
        assert_eq!(decode_check_upkeep(due).unwrap(), Some(CampaignId(9)));
        let idle = checkUpkeepReturn {
            upkeepNeeded: false,
            performData: Default::default(),
        };
        assert_eq!(decode_check_upkeep(idle).unwrap(), None);
    }
}
