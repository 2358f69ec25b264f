//! EIP-712 signing of Safe transactions and `execTransaction` encoding.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_signer::Signer;
use alloy_sol_types::{Eip712Domain, SolCall, SolStruct};
use semver::Version;

use crate::{
    contracts::Safe,
    transaction_data::{SafeTransactionData, SignedSafeTransaction},
};

/// EIP-712 domain of a Safe. Safes older than v1.3.0 do not bind the chain id.
pub fn safe_domain(safe: Address, chain_id: u64, version: Option<&str>) -> Eip712Domain {
    let chain_id = match version.map(parse_version) {
        Some(Some(version)) if version < min_chain_id_version() => None,
        _ => Some(U256::from(chain_id)),
    };

    Eip712Domain::new(None, None, chain_id, Some(safe), None)
}

/// Hash an owner has to sign to approve `tx` on `safe`.
pub fn safe_tx_hash(tx: &SafeTransactionData, domain: &Eip712Domain) -> B256 {
    tx.to_typed().eip712_signing_hash(domain)
}

/// Signs `tx` for `safe` with `signer`, producing an `r ‖ s ‖ v` ECDSA signature with
/// `v ∈ {27, 28}` as expected by `checkSignatures`.
pub async fn sign_transaction<S>(
    tx: SafeTransactionData,
    safe: Address,
    domain: &Eip712Domain,
    signer: &S,
) -> eyre::Result<SignedSafeTransaction>
where
    S: Signer + Send + Sync + ?Sized,
{
    let hash = safe_tx_hash(&tx, domain);
    let signature = signer.sign_hash(&hash).await?;

    tracing::debug!(%safe, %hash, signer = %signer.address(), "signed Safe transaction");

    Ok(SignedSafeTransaction {
        safe,
        tx,
        signatures: Bytes::copy_from_slice(&signature.as_bytes()),
    })
}

/// ABI encoded `execTransaction` calldata for a signed Safe transaction.
pub fn encode_exec_transaction(signed: &SignedSafeTransaction) -> Bytes {
    let tx = &signed.tx;

    let call = Safe::execTransactionCall {
        to: tx.to,
        value: tx.value,
        data: tx.data.clone(),
        operation: tx.operation.into(),
        safeTxGas: tx.safe_tx_gas,
        baseGas: tx.base_gas,
        gasPrice: tx.gas_price,
        gasToken: tx.gas_token,
        refundReceiver: tx.refund_receiver,
        signatures: signed.signatures.clone(),
    };

    call.abi_encode().into()
}

fn parse_version(version: &str) -> Option<Version> {
    // Safe reports versions such as "1.3.0+L2".
    let version = version.split('+').next().unwrap_or(version);
    Version::parse(version.trim()).ok()
}

/// First Safe version whose domain includes the chain id.
fn min_chain_id_version() -> Version {
    Version::new(1, 3, 0)
}
