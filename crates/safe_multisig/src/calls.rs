//! Read-only calls against a deployed Safe.

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use alloy_transport::Transport;

use crate::contracts::Safe;

pub async fn get_nonce<P, T>(safe: Address, provider: &P) -> eyre::Result<U256>
where
    P: Provider<T>,
    T: Transport + Clone,
{
    let call = Safe::nonceCall {};

    let Safe::nonceReturn { _0: nonce } = call_and_decode(call, safe, provider).await?;

    Ok(nonce)
}

pub async fn get_owners<P, T>(safe: Address, provider: &P) -> eyre::Result<Vec<Address>>
where
    P: Provider<T>,
    T: Transport + Clone,
{
    let call = Safe::getOwnersCall {};

    let Safe::getOwnersReturn { _0: owners } = call_and_decode(call, safe, provider).await?;

    Ok(owners)
}

pub async fn get_version<P, T>(safe: Address, provider: &P) -> eyre::Result<String>
where
    P: Provider<T>,
    T: Transport + Clone,
{
    let call = Safe::VERSIONCall {};

    let Safe::VERSIONReturn { _0: version } = call_and_decode(call, safe, provider).await?;

    Ok(version)
}

/// Private function to make a contract call and decode the response
async fn call_and_decode<C, P, T>(call: C, to: Address, provider: &P) -> eyre::Result<C::Return>
where
    C: SolCall,
    P: Provider<T>,
    T: Transport + Clone,
{
    let mut req = TransactionRequest::default().with_to(to);
    req.set_input(call.abi_encode());

    let data = provider.call(&req).await?;
    let data = C::abi_decode_returns(data.as_ref(), true)?;

    Ok(data)
}
