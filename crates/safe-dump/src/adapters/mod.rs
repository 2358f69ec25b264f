//! Seams between the dump flow and the outside world: the gateway, the Safe protocol and the
//! wallet that signs and broadcasts.

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use safe_multisig::{OverviewOptions, SafeOverview, SafeTransactionData, SignedSafeTransaction};

mod gateway;
mod protocol;
mod wallet;

pub use protocol::RpcSafeProtocol;
pub use wallet::{fetch_chain_id, RpcWallet, SendOptions};

/// Off-chain indexer providing Safe lists and summaries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SafeGateway: Send + Sync {
    async fn owned_safes(&self, chain_id: u64, owner: Address) -> eyre::Result<Vec<Address>>;

    /// Summaries of `safes`, in the order of `safes`.
    async fn safe_overviews(
        &self,
        chain_id: u64,
        safes: &[Address],
        options: &OverviewOptions,
    ) -> eyre::Result<Vec<SafeOverview>>;
}

/// Safe transaction construction and signing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SafeProtocol: Send + Sync {
    async fn create_swap_owner_tx(
        &self,
        safe: Address,
        old_owner: Address,
        new_owner: Address,
    ) -> eyre::Result<SafeTransactionData>;

    async fn sign_transaction(
        &self,
        safe: Address,
        tx: SafeTransactionData,
    ) -> eyre::Result<SignedSafeTransaction>;
}

/// The chain and account the wallet is currently connected with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletSession {
    pub chain_id: u64,
    pub address: Address,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletTransport: Send + Sync {
    /// `None` while no account is connected.
    fn session(&self) -> Option<WalletSession>;

    /// Re-reads the chain the wallet is connected to. Returns `true` when it changed.
    async fn refresh(&mut self) -> eyre::Result<bool>;

    /// Signs and broadcasts a zero-value call, returning its hash.
    async fn send_transaction(&self, to: Address, data: Bytes) -> eyre::Result<B256>;
}
