use std::time::Duration;

use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use super::{WalletSession, WalletTransport};

/// How [`RpcWallet`] waits for a broadcast transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    /// Return as soon as the node accepted the transaction.
    pub no_wait: bool,
    pub confirmations: u64,
    pub timeout: Option<Duration>,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self { no_wait: false, confirmations: 1, timeout: None }
    }
}

/// A local signer attached to a JSON-RPC endpoint.
pub struct RpcWallet {
    rpc_url: Url,
    signer: PrivateKeySigner,
    chain_id: u64,
    send: SendOptions,
}

impl RpcWallet {
    /// Resolves the chain id of `rpc_url` and binds `signer` to it.
    pub async fn connect(
        rpc_url: Url,
        signer: PrivateKeySigner,
        send: SendOptions,
    ) -> eyre::Result<Self> {
        let chain_id = fetch_chain_id(&rpc_url).await?;
        let signer = signer.with_chain_id(Some(chain_id));

        debug!(chain_id, address = %signer.address(), "wallet connected");

        Ok(Self { rpc_url, signer, chain_id, send })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

#[async_trait]
impl WalletTransport for RpcWallet {
    fn session(&self) -> Option<WalletSession> {
        Some(WalletSession { chain_id: self.chain_id, address: self.signer.address() })
    }

    async fn refresh(&mut self) -> eyre::Result<bool> {
        let chain_id = fetch_chain_id(&self.rpc_url).await?;
        if chain_id == self.chain_id {
            return Ok(false);
        }

        info!(from = self.chain_id, to = chain_id, "endpoint switched chains");
        self.chain_id = chain_id;
        self.signer.set_chain_id(Some(chain_id));

        Ok(true)
    }

    async fn send_transaction(&self, to: Address, data: Bytes) -> eyre::Result<B256> {
        let wallet = EthereumWallet::from(self.signer.clone());
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(wallet)
            .on_http(self.rpc_url.clone());

        let tx = TransactionRequest::default()
            .with_from(self.signer.address())
            .with_to(to)
            .with_value(U256::ZERO)
            .with_input(data);

        let pending = provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        info!(%tx_hash, "transaction sent");

        if self.send.no_wait {
            return Ok(tx_hash);
        }

        let tx_hash = pending
            .with_required_confirmations(self.send.confirmations)
            .with_timeout(self.send.timeout)
            .watch()
            .await?;
        info!(%tx_hash, confirmations = self.send.confirmations, "transaction confirmed");

        Ok(tx_hash)
    }
}

/// Chain id served by `rpc_url`.
pub async fn fetch_chain_id(rpc_url: &Url) -> eyre::Result<u64> {
    let provider = ProviderBuilder::new().on_http(rpc_url.clone());
    Ok(provider.get_chain_id().await?)
}
