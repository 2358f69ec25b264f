use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::{MultiSendError, Result};

const OPERATION_LEN: usize = 1;
const ADDRESS_LEN: usize = 20;
const WORD_LEN: usize = 32;
const HEADER_LEN: usize = OPERATION_LEN + ADDRESS_LEN + WORD_LEN + WORD_LEN;

/// The kind of call a Safe performs for a transaction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Operation {
    #[default]
    Call = 0,
    DelegateCall = 1,
}

impl TryFrom<u8> for Operation {
    type Error = MultiSendError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Operation::Call),
            1 => Ok(Operation::DelegateCall),
            other => Err(MultiSendError::UnknownOperation(other)),
        }
    }
}

impl From<Operation> for u8 {
    fn from(operation: Operation) -> Self {
        operation as u8
    }
}

/// A single entry of a multi-send batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTransaction {
    pub operation: Operation,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl MetaTransaction {
    /// A zero-value `Call` to `to`.
    pub fn call(to: Address, data: Bytes) -> Self {
        Self { operation: Operation::Call, to, value: U256::ZERO, data }
    }

    fn packed_len(&self) -> usize {
        HEADER_LEN + self.data.len()
    }
}

/// Packs `transactions` into the byte string expected by `multiSend(bytes)`.
///
/// Every entry is encoded as `operation (1) ‖ to (20) ‖ value (32) ‖ data length (32) ‖ data`
/// and the entries are concatenated in order.
pub fn encode_multi_send_data(transactions: &[MetaTransaction]) -> Bytes {
    let capacity = transactions.iter().map(MetaTransaction::packed_len).sum();
    let mut out = Vec::with_capacity(capacity);

    for tx in transactions {
        out.push(tx.operation.into());
        out.extend_from_slice(tx.to.as_slice());
        out.extend_from_slice(&tx.value.to_be_bytes::<WORD_LEN>());
        out.extend_from_slice(&U256::from(tx.data.len()).to_be_bytes::<WORD_LEN>());
        out.extend_from_slice(&tx.data);
    }

    tracing::trace!(count = transactions.len(), bytes = out.len(), "packed multi-send payload");

    out.into()
}

/// Splits a packed multi-send payload back into its transactions.
pub fn decode_multi_send_data(payload: &[u8]) -> Result<Vec<MetaTransaction>> {
    let mut transactions = Vec::new();
    let mut offset = 0;

    while offset < payload.len() {
        if payload.len() - offset < HEADER_LEN {
            return Err(MultiSendError::Truncated { offset });
        }

        let operation = Operation::try_from(payload[offset])?;
        let mut cursor = offset + OPERATION_LEN;

        let to = Address::from_slice(&payload[cursor..cursor + ADDRESS_LEN]);
        cursor += ADDRESS_LEN;

        let value = U256::from_be_slice(&payload[cursor..cursor + WORD_LEN]);
        cursor += WORD_LEN;

        let data_len = U256::from_be_slice(&payload[cursor..cursor + WORD_LEN]);
        cursor += WORD_LEN;

        let data_len = usize::try_from(data_len)
            .ok()
            .filter(|len| *len <= payload.len() - cursor)
            .ok_or(MultiSendError::Truncated { offset })?;

        let data = Bytes::copy_from_slice(&payload[cursor..cursor + data_len]);
        transactions.push(MetaTransaction { operation, to, value, data });

        offset = cursor + data_len;
    }

    Ok(transactions)
}
