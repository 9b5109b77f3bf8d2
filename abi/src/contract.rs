//! The voting contract's interface.
//!
//! Declared once in Solidity syntax; call structs, return structs, selectors
//! and event topics are all generated from it.

use alloy_sol_types::sol;

sol! {
    #[derive(Debug)]
    interface IVotingSystem {
        // Reads
        function admin() external view returns (address);
        function getUserRole(address user) external view returns (uint8);
        function getUserDetails(address user) external view returns (
            string name,
            string email,
            string dateOfBirth,
            string identityNumber,
            string contactNumber,
            string bio,
            string profileImageHash,
            string[] supportiveLinks
        );
        function getAllCampaignIds() external view returns (uint256[]);
        function getCampaignDetails(uint256 campaignId) external view returns (
            uint256 id,
            uint256 startDate,
            uint256 endDate,
            bool isClosed,
            address winner,
            string detailsHash,
            address[] voters,
            address[] candidates,
            uint256[] voteCounts
        );
        function getVote(uint256 campaignId, address voter) external view returns (address);
        function getPendingVerificationRequests() external view returns (address[]);
        function getVerificationRequest(address user) external view returns (
            address requester,
            uint8 role,
            string documentHash,
            string adminFeedback,
            uint8 status
        );
        function getWinner(uint256 campaignId) external view returns (address);
        function checkUpkeep(bytes checkData) external view returns (bool upkeepNeeded, bytes performData);

        // Writes
        function createCampaign(uint256 startDate, uint256 endDate, string detailsHash) external;
        function updateCampaign(uint256 campaignId, uint256 startDate, uint256 endDate, string detailsHash) external;
        function deleteCampaign(uint256 campaignId) external;
        function registerAsVoter(uint256 campaignId) external;
        function registerAsCandidate(uint256 campaignId) external;
        function vote(uint256 campaignId, address candidate) external;
        function updateUserDetails(
            string name,
            string email,
            string dateOfBirth,
            string identityNumber,
            string contactNumber,
            string bio,
            string profileImageHash,
            string[] supportiveLinks
        ) external;
        function requestVerification(uint8 role, string documentHash) external;
        function approveVerification(address user) external;
        function rejectVerification(address user, string feedback) external;
        function performUpkeep(bytes performData) external;

        event CampaignCreated(uint256 indexed campaignId, uint256 startDate, uint256 endDate);
        event VoteCast(uint256 indexed campaignId, address indexed voter, address indexed candidate);
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::keccak256;
    use alloy_sol_types::{SolCall, SolEvent};

    use super::IVotingSystem::*;

    fn selector_of(signature: &str) -> [u8; 4] {
        let hash = keccak256(signature.as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }

    macro_rules! assert_binding {
        ($call:ty, $signature:literal) => {
            assert_eq!(<$call as SolCall>::SIGNATURE, $signature);
            assert_eq!(<$call as SolCall>::SELECTOR, selector_of($signature), $signature);
        };
    }

    #[test]
    fn read_selectors_match_the_deployed_contract() {
        assert_binding!(adminCall, "admin()");
        assert_binding!(getUserRoleCall, "getUserRole(address)");
        assert_binding!(getUserDetailsCall, "getUserDetails(address)");
        assert_binding!(getAllCampaignIdsCall, "getAllCampaignIds()");
        assert_binding!(getCampaignDetailsCall, "getCampaignDetails(uint256)");
        assert_binding!(getVoteCall, "getVote(uint256,address)");
        assert_binding!(getPendingVerificationRequestsCall, "getPendingVerificationRequests()");
        assert_binding!(getVerificationRequestCall, "getVerificationRequest(address)");
        assert_binding!(getWinnerCall, "getWinner(uint256)");
        assert_binding!(checkUpkeepCall, "checkUpkeep(bytes)");
    }

    #[test]
    fn write_selectors_match_the_deployed_contract() {
        assert_binding!(createCampaignCall, "createCampaign(uint256,uint256,string)");
        assert_binding!(updateCampaignCall, "updateCampaign(uint256,uint256,uint256,string)");
        assert_binding!(deleteCampaignCall, "deleteCampaign(uint256)");
        assert_binding!(registerAsVoterCall, "registerAsVoter(uint256)");
        assert_binding!(registerAsCandidateCall, "registerAsCandidate(uint256)");
        assert_binding!(voteCall, "vote(uint256,address)");
        assert_binding!(
            updateUserDetailsCall,
            "updateUserDetails(string,string,string,string,string,string,string,string[])"
        );
        assert_binding!(requestVerificationCall, "requestVerification(uint8,string)");
        assert_binding!(approveVerificationCall, "approveVerification(address)");
        assert_binding!(rejectVerificationCall, "rejectVerification(address,string)");
        assert_binding!(performUpkeepCall, "performUpkeep(bytes)");
    }

    #[test]
    fn role_argument_is_a_single_byte_enum() {
        assert_eq!(hex::encode(requestVerificationCall::SELECTOR), "e573beec");
        assert_ne!(
            requestVerificationCall::SELECTOR,
            selector_of("requestVerification(uint256,string)")
        );
    }

    #[test]
    fn event_topics_match_the_deployed_contract() {
        assert_eq!(CampaignCreated::SIGNATURE, "CampaignCreated(uint256,uint256,uint256)");
        assert_eq!(
            CampaignCreated::SIGNATURE_HASH,
            keccak256("CampaignCreated(uint256,uint256,uint256)")
        );
        assert_eq!(VoteCast::SIGNATURE, "VoteCast(uint256,address,address)");
        assert_eq!(
            VoteCast::SIGNATURE_HASH,
            keccak256("VoteCast(uint256,address,address)")
        );
    }
}
