use alloy_primitives::Address;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use multisend::SUPPORTED_SAFE_VERSION;
use safe_multisig::{
    calls::get_version,
    owners::create_swap_owner_tx,
    signing::{safe_domain, sign_transaction},
    SafeTransactionData, SignedSafeTransaction,
};
use tracing::warn;
use url::Url;

use super::SafeProtocol;

/// Talks to Safe contracts over JSON-RPC and signs with a local key.
///
/// The chain id is read from the endpoint on every signature so a switched endpoint is never
/// signed for with a stale domain.
pub struct RpcSafeProtocol {
    rpc_url: Url,
    signer: PrivateKeySigner,
}

impl RpcSafeProtocol {
    pub fn new(rpc_url: Url, signer: PrivateKeySigner) -> Self {
        Self { rpc_url, signer }
    }
}

#[async_trait]
impl SafeProtocol for RpcSafeProtocol {
    async fn create_swap_owner_tx(
        &self,
        safe: Address,
        old_owner: Address,
        new_owner: Address,
    ) -> eyre::Result<SafeTransactionData> {
        let provider = ProviderBuilder::new().on_http(self.rpc_url.clone());

        create_swap_owner_tx(safe, old_owner, new_owner, &provider).await
    }

    async fn sign_transaction(
        &self,
        safe: Address,
        tx: SafeTransactionData,
    ) -> eyre::Result<SignedSafeTransaction> {
        let provider = ProviderBuilder::new().on_http(self.rpc_url.clone());

        let chain_id = provider.get_chain_id().await?;
        let version = get_version(safe, &provider).await?;
        if !version.starts_with(SUPPORTED_SAFE_VERSION) {
            warn!(%safe, %version, "Safe version differs from {SUPPORTED_SAFE_VERSION}, batch may revert");
        }

        let domain = safe_domain(safe, chain_id, Some(&version));

        sign_transaction(tx, safe, &domain, &self.signer).await
    }
}
