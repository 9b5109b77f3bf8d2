//! Conversions between contract values and the client's types.

use alloy_primitives::U256;
use votechain_types::Address;

use crate::AbiError;

pub fn to_sol_address(address: Address) -> alloy_primitives::Address {
    alloy_primitives::Address::new(*address.as_bytes())
}

pub fn from_sol_address(address: alloy_primitives::Address) -> Address {
    Address::new(address.0 .0)
}

pub fn from_sol_addresses(addresses: Vec<alloy_primitives::Address>) -> Vec<Address> {
    addresses.into_iter().map(from_sol_address).collect()
}

pub fn uint(value: u64) -> U256 {
    U256::from(value)
}

/// A `uint256` that must fit in 64 bits (ids, timestamps, counts).
pub fn narrow_u64(value: U256) -> Result<u64, AbiError> {
    u64::try_from(value).map_err(|_| AbiError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_keep_their_bytes() {
        let address = Address::new([0xab; 20]);
        assert_eq!(from_sol_address(to_sol_address(address)), address);
        assert_eq!(to_sol_address(address).as_slice(), address.as_bytes());
    }

    #[test]
    fn oversized_uint_is_rejected() {
        assert_eq!(narrow_u64(uint(7)), Ok(7));
        assert_eq!(narrow_u64(U256::from(u64::MAX) + U256::from(1)), Err(AbiError::Overflow));
    }
}
