//! Checks run before sending privileged or first transactions.

use votechain_types::Address;

use crate::{ContractGateway, GatewayError};

/// Confirm the bound signer is the contract admin and return it.
pub async fn require_admin<G: ContractGateway>(gateway: &G) -> Result<Address, GatewayError> {
    let signer = gateway.signer().ok_or(GatewayError::NoSigner)?;
    let admin = gateway.admin().await?;
    if signer != admin {
        tracing::warn!(%signer, %admin, "admin action attempted by non-admin");
        return Err(GatewayError::NotAdmin { signer, admin });
    }
    Ok(signer)
}

/// Confirm contract code exists at the bound address and answers `admin()`.
pub async fn verify_contract<G: ContractGateway>(gateway: &G) -> Result<(), GatewayError> {
    let address = gateway.contract_address();
    if !gateway.contract_deployed().await? {
        return Err(GatewayError::ContractNotFound(address));
    }
    match gateway.admin().await {
        Ok(admin) => {
            tracing::debug!(contract = %address, %admin, "contract verified");
            Ok(())
        }
        Err(GatewayError::Abi(e)) => Err(GatewayError::ContractMismatch {
            address,
            reason: e.to_string(),
        }),
        Err(e) => Err(e),
    }
}
