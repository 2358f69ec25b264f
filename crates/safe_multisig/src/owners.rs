//! Construction of `swapOwner` transactions.

use alloy_primitives::{Address, Bytes};
use alloy_provider::Provider;
use alloy_sol_types::SolCall;
use alloy_transport::Transport;

use crate::{
    calls::{get_nonce, get_owners},
    consts::SENTINEL_OWNERS,
    contracts::Safe,
    transaction_data::SafeTransactionData,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapOwnerError {
    #[error("{0} is not an owner of the Safe")]
    NotAnOwner(Address),

    #[error("{0} is already an owner of the Safe")]
    AlreadyAnOwner(Address),

    #[error("{0} cannot be used as a Safe owner")]
    InvalidOwner(Address),
}

/// Returns the entry that points to `owner` in the Safe's owners linked list.
pub fn previous_owner(owners: &[Address], owner: Address) -> Option<Address> {
    let index = owners.iter().position(|o| *o == owner)?;

    match index {
        0 => Some(SENTINEL_OWNERS),
        i => Some(owners[i - 1]),
    }
}

/// Encodes `swapOwner(prevOwner, oldOwner, newOwner)` for a Safe with the given owners.
pub fn encode_swap_owner(
    safe: Address,
    owners: &[Address],
    old_owner: Address,
    new_owner: Address,
) -> Result<Bytes, SwapOwnerError> {
    if new_owner == Address::ZERO || new_owner == SENTINEL_OWNERS || new_owner == safe {
        return Err(SwapOwnerError::InvalidOwner(new_owner));
    }
    if owners.contains(&new_owner) {
        return Err(SwapOwnerError::AlreadyAnOwner(new_owner));
    }

    let prev_owner =
        previous_owner(owners, old_owner).ok_or(SwapOwnerError::NotAnOwner(old_owner))?;

    let call = Safe::swapOwnerCall { prevOwner: prev_owner, oldOwner: old_owner, newOwner: new_owner };

    Ok(call.abi_encode().into())
}

/// Builds the Safe transaction replacing `old_owner` with `new_owner`, at the Safe's current
/// nonce. The threshold is left untouched.
pub async fn create_swap_owner_tx<P, T>(
    safe: Address,
    old_owner: Address,
    new_owner: Address,
    provider: &P,
) -> eyre::Result<SafeTransactionData>
where
    P: Provider<T>,
    T: Transport + Clone,
{
    let owners = get_owners(safe, provider).await?;
    let data = encode_swap_owner(safe, &owners, old_owner, new_owner)?;
    let nonce = get_nonce(safe, provider).await?;

    tracing::debug!(%safe, %old_owner, %new_owner, %nonce, "built swapOwner transaction");

    Ok(SafeTransactionData::call(safe, data, nonce))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BURN_ADDRESS;

    fn owners() -> Vec<Address> {
        vec![Address::repeat_byte(0xa1), Address::repeat_byte(0xb2), Address::repeat_byte(0xc3)]
    }

    #[test]
    fn first_owner_points_to_sentinel() {
        assert_eq!(previous_owner(&owners(), Address::repeat_byte(0xa1)), Some(SENTINEL_OWNERS));
    }

    #[test]
    fn later_owner_points_to_predecessor() {
        let owners = owners();
        assert_eq!(previous_owner(&owners, owners[2]), Some(owners[1]));
        assert_eq!(previous_owner(&owners, Address::repeat_byte(0xff)), None);
    }

    #[test]
    fn swap_owner_calldata() {
        let safe = Address::repeat_byte(0x5a);
        let owners = owners();

        let data = encode_swap_owner(safe, &owners, owners[1], BURN_ADDRESS).unwrap();
        let call = Safe::swapOwnerCall::abi_decode(&data, true).unwrap();

        assert_eq!(call.prevOwner, owners[0]);
        assert_eq!(call.oldOwner, owners[1]);
        assert_eq!(call.newOwner, BURN_ADDRESS);
    }

    #[test]
    fn swap_owner_rejects_bad_owners() {
        let safe = Address::repeat_byte(0x5a);
        let owners = owners();

        assert_eq!(
            encode_swap_owner(safe, &owners, Address::repeat_byte(0x01), BURN_ADDRESS),
            Err(SwapOwnerError::NotAnOwner(Address::repeat_byte(0x01)))
        );
        assert_eq!(
            encode_swap_owner(safe, &owners, owners[0], owners[2]),
            Err(SwapOwnerError::AlreadyAnOwner(owners[2]))
        );
        assert_eq!(
            encode_swap_owner(safe, &owners, owners[0], SENTINEL_OWNERS),
            Err(SwapOwnerError::InvalidOwner(SENTINEL_OWNERS))
        );
        assert_eq!(
            encode_swap_owner(safe, &owners, owners[0], safe),
            Err(SwapOwnerError::InvalidOwner(safe))
        );
    }
}
