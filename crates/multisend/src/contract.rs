use alloy_primitives::Bytes;
use alloy_sol_types::{sol, SolCall};

use crate::{MultiSendError, Result};

sol! {
    /// Subset of the `MultiSendCallOnly` v1.3.0 interface.
    interface IMultiSendCallOnly {
        function multiSend(bytes memory transactions) external payable;
    }
}

/// Wraps a packed payload (see [`encode_multi_send_data`](crate::encode_multi_send_data)) into
/// `multiSend(bytes)` calldata.
pub fn encode_multi_send_call(transactions: Bytes) -> Bytes {
    IMultiSendCallOnly::multiSendCall { transactions }.abi_encode().into()
}

/// Extracts the packed payload from `multiSend(bytes)` calldata.
pub fn decode_multi_send_call(calldata: &[u8]) -> Result<Bytes> {
    if calldata.len() < 4 || calldata[..4] != IMultiSendCallOnly::multiSendCall::SELECTOR {
        return Err(MultiSendError::InvalidCall(Bytes::copy_from_slice(calldata)));
    }

    let call = IMultiSendCallOnly::multiSendCall::abi_decode(calldata, true)?;
    Ok(call.transactions)
}
