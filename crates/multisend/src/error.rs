use alloy_primitives::Bytes;

/// Errors that can occur while building a multi-send batch.
#[derive(Debug, thiserror::Error)]
pub enum MultiSendError {
    #[error("MultiSendCallOnly is not deployed for Safe version {version} on chain {chain_id}")]
    UnsupportedVersion { chain_id: u64, version: String },

    #[error("multi-send payload is truncated at offset {offset}")]
    Truncated { offset: usize },

    #[error("unknown operation type {0}")]
    UnknownOperation(u8),

    #[error("call data is not a multiSend call: {0}")]
    InvalidCall(Bytes),

    #[error(transparent)]
    SolTypes(#[from] alloy_sol_types::Error),
}

pub type Result<T, E = MultiSendError> = std::result::Result<T, E>;
