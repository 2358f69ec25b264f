use alloy_primitives::{Address, Bytes, U256};
use multisend::{MetaTransaction, Operation};
use serde::{Deserialize, Serialize};

use crate::contracts::SafeTx;

/// A transaction to be executed by a Safe, before any owner signed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeTransactionData {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: Operation,
    pub safe_tx_gas: U256,
    pub base_gas: U256,
    pub gas_price: U256,
    pub gas_token: Address,
    pub refund_receiver: Address,
    pub nonce: U256,
}

impl SafeTransactionData {
    /// A zero-value call without refund parameters.
    pub fn call(to: Address, data: Bytes, nonce: U256) -> Self {
        Self {
            to,
            value: U256::ZERO,
            data,
            operation: Operation::Call,
            safe_tx_gas: U256::ZERO,
            base_gas: U256::ZERO,
            gas_price: U256::ZERO,
            gas_token: Address::ZERO,
            refund_receiver: Address::ZERO,
            nonce,
        }
    }

    pub(crate) fn to_typed(&self) -> SafeTx {
        SafeTx {
            to: self.to,
            value: self.value,
            data: self.data.clone(),
            operation: self.operation.into(),
            safeTxGas: self.safe_tx_gas,
            baseGas: self.base_gas,
            gasPrice: self.gas_price,
            gasToken: self.gas_token,
            refundReceiver: self.refund_receiver,
            nonce: self.nonce,
        }
    }
}

/// A Safe transaction together with the owner signatures it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedSafeTransaction {
    pub safe: Address,
    pub tx: SafeTransactionData,
    pub signatures: Bytes,
}

impl SignedSafeTransaction {
    /// Wraps the encoded `execTransaction` call as a multi-send entry targeting the Safe.
    pub fn into_meta_transaction(self) -> MetaTransaction {
        let data = crate::signing::encode_exec_transaction(&self);
        MetaTransaction::call(self.safe, data)
    }
}
