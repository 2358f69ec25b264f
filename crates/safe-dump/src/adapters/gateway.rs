use alloy_primitives::Address;
use async_trait::async_trait;
use safe_multisig::{OverviewOptions, SafeGatewayClient, SafeOverview};

use super::SafeGateway;

#[async_trait]
impl SafeGateway for SafeGatewayClient {
    async fn owned_safes(&self, chain_id: u64, owner: Address) -> eyre::Result<Vec<Address>> {
        Ok(SafeGatewayClient::owned_safes(self, chain_id, owner).await?)
    }

    async fn safe_overviews(
        &self,
        chain_id: u64,
        safes: &[Address],
        options: &OverviewOptions,
    ) -> eyre::Result<Vec<SafeOverview>> {
        Ok(SafeGatewayClient::safe_overviews(self, chain_id, safes, options).await?)
    }
}
