use proptest::prelude::*;

use votechain_types::{Address, Campaign, CampaignId, CampaignPhase, Role, Timestamp, TxHash};

fn campaign(start: u64, end: u64, closed: bool) -> Campaign {
    Campaign {
        id: CampaignId(1),
        start: Timestamp::new(start),
        end: Timestamp::new(end),
        is_closed: closed,
        winner: None,
        details_hash: String::new(),
        voters: Vec::new(),
        candidates: Vec::new(),
        tallies: Default::default(),
    }
}

proptest! {
    /// Address display -> parse produces the identical address.
    #[test]
    fn address_display_parse(bytes in prop::array::uniform20(0u8..)) {
        let addr = Address::new(bytes);
        let parsed = Address::parse(&addr.to_string()).unwrap();
        prop_assert_eq!(parsed, addr);
    }

    /// Uppercasing the hex digits never changes the parsed address.
    #[test]
    fn address_parse_is_case_insensitive(bytes in prop::array::uniform20(0u8..)) {
        let addr = Address::new(bytes);
        let upper = format!("0x{}", hex_upper(&bytes));
        prop_assert_eq!(Address::parse(&upper).unwrap(), addr);
    }

    /// Strings of the wrong length are never accepted as addresses.
    #[test]
    fn address_rejects_wrong_length(digits in "[0-9a-f]{0,39}") {
        let raw = format!("0x{digits}");
        prop_assert!(Address::parse(&raw).is_err());
    }

    #[test]
    fn tx_hash_display_parse(bytes in prop::array::uniform32(0u8..)) {
        let hash = TxHash::new(bytes);
        prop_assert_eq!(TxHash::parse(&hash.to_string()).unwrap(), hash);
    }

    /// Every role code the contract can return decodes, and nothing else does.
    #[test]
    fn role_codes(code in 0u8..=255) {
        let decoded = Role::from_u8(code);
        prop_assert_eq!(decoded.is_ok(), code <= 4);
        if let Ok(role) = decoded {
            prop_assert_eq!(role.as_u8(), code);
        }
    }

    /// An open campaign is active exactly within [start, end).
    #[test]
    fn phase_active_window(start in 0u64..1_000_000, len in 1u64..1_000_000, now in 0u64..3_000_000) {
        let c = campaign(start, start + len, false);
        let active = now >= start && now < start + len;
        prop_assert_eq!(c.phase(Timestamp::new(now)) == CampaignPhase::Active, active);
    }

    /// A closed campaign is closed regardless of time.
    #[test]
    fn closed_overrides_dates(start in 0u64..1_000_000, len in 1u64..1_000_000, now in 0u64..3_000_000) {
        let c = campaign(start, start + len, true);
        prop_assert_eq!(c.phase(Timestamp::new(now)), CampaignPhase::Closed);
    }
}

fn hex_upper(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}
