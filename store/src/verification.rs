//! Verification requests: the admin review queue and the user's own request.

use std::collections::BTreeMap;

use votechain_types::{Address, VerificationRequest};

use crate::status::AsyncState;

#[derive(Clone, Debug, Default)]
pub struct VerificationSlice {
    pending: BTreeMap<Address, VerificationRequest>,
    pub own_request: Option<VerificationRequest>,
    pub state: AsyncState,
    /// Status of the submit-request form.
    pub submission: AsyncState,
}

impl VerificationSlice {
    pub fn pending(&self) -> impl Iterator<Item = &VerificationRequest> {
        self.pending.values()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn get(&self, requester: &Address) -> Option<&VerificationRequest> {
        self.pending.get(requester)
    }

    /// Replace the review queue with the contract's current list.
    pub fn set_pending(&mut self, requests: Vec<VerificationRequest>) {
        self.pending = requests
            .into_iter()
            .filter(|r| !r.status.is_processed())
            .map(|r| (r.requester, r))
            .collect();
    }

    /// Local patch after an approve/reject confirmed.
    pub fn remove_processed(&mut self, requester: &Address) -> Option<VerificationRequest> {
        self.pending.remove(requester)
    }

    pub fn clear_pending(&mut self) {
        self.pending.clear();
        self.state = AsyncState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use votechain_types::{RequestedRole, VerificationStatus};

    fn request(b: u8, status: VerificationStatus) -> VerificationRequest {
        VerificationRequest {
            requester: Address::new([b; 20]),
            role: RequestedRole::Voter,
            document_hash: "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG".into(),
            admin_feedback: String::new(),
            status,
        }
    }

    #[test]
    fn processed_requests_never_enter_queue() {
        let mut v = VerificationSlice::default();
        v.set_pending(vec![
            request(1, VerificationStatus::Pending),
            request(2, VerificationStatus::Approved),
        ]);
        assert_eq!(v.pending_count(), 1);
        assert!(v.get(&Address::new([1; 20])).is_some());
    }

    #[test]
    fn remove_processed_is_keyed_by_requester() {
        let mut v = VerificationSlice::default();
        v.set_pending(vec![
            request(1, VerificationStatus::Pending),
            request(2, VerificationStatus::Pending),
        ]);
        assert!(v.remove_processed(&Address::new([1; 20])).is_some());
        assert!(v.remove_processed(&Address::new([1; 20])).is_none());
        assert_eq!(v.pending_count(), 1);
    }
}
