use alloy_chains::{Chain, NamedChain};
use alloy_primitives::{address, Address};

use crate::{MultiSendError, Result};

/// Safe contracts version the batch encoding is pinned to.
///
/// Safes deployed from other versions may still accept the batch, but this is not checked.
pub const SUPPORTED_SAFE_VERSION: &str = "1.3.0";

/// Canonical `MultiSendCallOnly` v1.3.0 deployment.
pub const MULTI_SEND_CALL_ONLY_V1_3_0: Address =
    address!("40A2aCCbd92BCA938b02010E17A5b8929b49130D");

/// `MultiSendCallOnly` v1.3.0 on zkSync Era, which uses its own create2 derivation.
pub const MULTI_SEND_CALL_ONLY_V1_3_0_ZKSYNC: Address =
    address!("f220D3b4DFb23C4ade8C88E526C1353AbAcbC38F");

/// Returns the `MultiSendCallOnly` deployment for `chain_id` and the given Safe `version`.
pub fn multi_send_call_only_address(chain_id: u64, version: &str) -> Result<Address> {
    if version != SUPPORTED_SAFE_VERSION {
        return Err(MultiSendError::UnsupportedVersion { chain_id, version: version.to_string() });
    }

    let address = match Chain::from_id(chain_id).named() {
        Some(NamedChain::ZkSync) => MULTI_SEND_CALL_ONLY_V1_3_0_ZKSYNC,
        _ => MULTI_SEND_CALL_ONLY_V1_3_0,
    };

    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_deployment() {
        assert_eq!(
            multi_send_call_only_address(1, SUPPORTED_SAFE_VERSION).unwrap(),
            MULTI_SEND_CALL_ONLY_V1_3_0
        );
        assert_eq!(
            multi_send_call_only_address(11155111, SUPPORTED_SAFE_VERSION).unwrap(),
            MULTI_SEND_CALL_ONLY_V1_3_0
        );
    }

    #[test]
    fn zksync_deployment() {
        assert_eq!(
            multi_send_call_only_address(324, SUPPORTED_SAFE_VERSION).unwrap(),
            MULTI_SEND_CALL_ONLY_V1_3_0_ZKSYNC
        );
    }

    #[test]
    fn other_versions_are_rejected() {
        let err = multi_send_call_only_address(1, "1.4.1").unwrap_err();
        assert!(matches!(err, MultiSendError::UnsupportedVersion { chain_id: 1, .. }));
    }
}
