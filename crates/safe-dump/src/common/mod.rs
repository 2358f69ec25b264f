use std::{path::PathBuf, time::Duration};

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use clap::Parser;
use safe_multisig::{consts::gateway::SAFE_CLIENT_GATEWAY_URL, OverviewOptions, SafeGatewayClient};
use url::Url;

use crate::adapters::SendOptions;

use consts::{
    DEFAULT_CURRENCY, ETH_KEYSTORE_ENV, ETH_PASSWORD_ENV, ETH_PRIVATE_KEY_ENV, ETH_RPC_URL_ENV,
    SAFE_GATEWAY_URL_ENV,
};

pub mod consts;

#[derive(Debug, Parser, Clone)]
pub struct RpcCliArgs {
    #[arg(
        long,
        env = ETH_RPC_URL_ENV,
        value_name = "URL",
        help = "The JSON-RPC endpoint of the chain the Safes live on."
    )]
    pub rpc_url: Url,
}

#[derive(Debug, Parser, Clone)]
pub struct WalletCliArgs {
    #[arg(
        long,
        env = ETH_PRIVATE_KEY_ENV,
        value_name = "HEX",
        conflicts_with = "keystore",
        hide_env_values = true,
        help = "The private key of the owner. Prompted for when neither a key nor a keystore is given."
    )]
    private_key: Option<String>,

    #[arg(
        long,
        env = ETH_KEYSTORE_ENV,
        value_name = "PATH",
        help = "Path to an encrypted JSON keystore of the owner."
    )]
    keystore: Option<PathBuf>,

    #[arg(
        long,
        env = ETH_PASSWORD_ENV,
        requires = "keystore",
        hide_env_values = true,
        help = "The password that will be used to unlock the keystore. Prompted for if missing."
    )]
    password: Option<String>,
}

impl WalletCliArgs {
    /// Loads the owner's signer, prompting for secrets that were not provided.
    pub fn signer(&self) -> eyre::Result<PrivateKeySigner> {
        if let Some(keystore) = &self.keystore {
            let password = match &self.password {
                Some(password) => password.clone(),
                None => rpassword::prompt_password_stdout("\nEnter keystore password:")?,
            };

            return PrivateKeySigner::decrypt_keystore(keystore, password)
                .map_err(|e| eyre::eyre!("Failed to unlock keystore {}: {e}", keystore.display()));
        }

        let private_key = match &self.private_key {
            Some(private_key) => private_key.clone(),
            None => rpassword::prompt_password_stdout("\nEnter private key:")?,
        };

        parse_private_key(&private_key)
    }
}

fn parse_private_key(private_key: &str) -> eyre::Result<PrivateKeySigner> {
    private_key
        .trim()
        .trim_start_matches("0x")
        .parse::<PrivateKeySigner>()
        .map_err(|e| eyre::eyre!("Invalid private key: {e}"))
}

#[derive(Debug, Parser, Clone)]
pub struct GatewayCliArgs {
    #[arg(
        long,
        env = SAFE_GATEWAY_URL_ENV,
        value_name = "URL",
        default_value = SAFE_CLIENT_GATEWAY_URL,
        help = "Base URL of the Safe Client Gateway."
    )]
    pub gateway_url: String,

    #[arg(long, default_value = DEFAULT_CURRENCY, help = "Fiat currency balances are shown in.")]
    pub currency: String,

    #[arg(long, help = "Leave tokens flagged as spam out of the fiat balance.")]
    pub exclude_spam: bool,

    #[arg(long, help = "Also value tokens the gateway does not trust.")]
    pub untrusted: bool,
}

impl GatewayCliArgs {
    pub fn client(&self) -> eyre::Result<SafeGatewayClient> {
        Ok(SafeGatewayClient::new(&self.gateway_url)?)
    }

    pub fn overview_options(&self, wallet_address: Address) -> OverviewOptions {
        OverviewOptions {
            trusted: !self.untrusted,
            exclude_spam: self.exclude_spam,
            currency: self.currency.clone(),
            wallet_address: Some(wallet_address),
        }
    }
}

#[derive(Debug, Parser, Clone)]
pub struct SendCliArgs {
    /// Only print the transaction hash and exit immediately.
    #[arg(id = "async", long = "async")]
    pub no_wait: bool,

    /// The number of confirmations until the receipt is fetched.
    #[arg(long, default_value = "1")]
    pub confirmations: u64,

    /// Timeout in seconds for the transaction to be confirmed.
    #[arg(long, env = "ETH_TIMEOUT")]
    pub timeout: Option<u64>,
}

impl SendCliArgs {
    pub fn send_options(&self) -> SendOptions {
        SendOptions {
            no_wait: self.no_wait,
            confirmations: self.confirmations,
            timeout: self.timeout.map(Duration::from_secs),
        }
    }
}
