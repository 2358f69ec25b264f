use alloy_chains::Chain;
use alloy_primitives::Address;
use clap::Parser;
use safe_dump_cli_runner::CliContext;

use crate::{
    adapters::fetch_chain_id,
    common::{GatewayCliArgs, RpcCliArgs, WalletCliArgs},
    discovery::OwnedSafes,
    utils::{print_info_message, print_loading_until_async, print_warning_message},
};

use super::utils::overview_table;

#[derive(Debug, Parser)]
#[clap(about = "List the Safes owned by a wallet.")]
pub struct ListCommand {
    #[arg(
        long,
        value_name = "ADDRESS",
        help = "The owner to list Safes for. Defaults to the address of the wallet."
    )]
    owner: Option<Address>,

    #[arg(
        long,
        default_value = "1",
        conflicts_with = "all",
        help = "How many pages of 10 Safes to load."
    )]
    pages: usize,

    #[arg(long, help = "Load every owned Safe.")]
    all: bool,

    #[clap(flatten)]
    rpc: RpcCliArgs,

    #[clap(flatten)]
    wallet: WalletCliArgs,

    #[clap(flatten)]
    gateway: GatewayCliArgs,
}

impl ListCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let owner = match self.owner {
            Some(owner) => owner,
            None => self.wallet.signer()?.address(),
        };

        let chain_id = fetch_chain_id(&self.rpc.rpc_url).await?;
        let gateway = self.gateway.client()?;
        let options = self.gateway.overview_options(owner);

        let mut owned = print_loading_until_async(
            "Fetching owned Safes",
            OwnedSafes::discover(&gateway, chain_id, owner),
        )
        .await?;

        let loading = async {
            if self.all {
                owned.load_all(&gateway, &options).await
            } else {
                let mut added = 0;
                for _ in 0..self.pages {
                    added += owned.load_more(&gateway, &options).await?;
                }
                Ok::<_, eyre::Report>(added)
            }
        };
        print_loading_until_async("Fetching Safe overviews", loading).await?;

        print_info_message(&format!(
            "\nSafe Accounts of {owner} on {} ({})",
            Chain::from_id(chain_id),
            owned.total()
        ));

        if owned.total() == 0 {
            print_warning_message("No Safes found.");
            return Ok(());
        }

        overview_table(owned.visible(), &options.currency).printstd();

        if owned.has_more() {
            print_info_message(&format!(
                "Showing {} of {}. Use --pages or --all to load more.",
                owned.visible().len(),
                owned.total()
            ));
        }

        Ok(())
    }
}
