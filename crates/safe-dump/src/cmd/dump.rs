use alloy_chains::Chain;
use alloy_primitives::Address;
use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Confirm, MultiSelect, Select};
use multisend::{decode_multi_send_call, decode_multi_send_data};
use safe_dump_cli_runner::CliContext;
use safe_multisig::{OverviewOptions, SafeGatewayClient, BURN_ADDRESS};

use crate::{
    adapters::{RpcSafeProtocol, RpcWallet, SafeGateway, SafeProtocol, WalletTransport},
    common::{GatewayCliArgs, RpcCliArgs, SendCliArgs, WalletCliArgs},
    discovery::OwnedSafes,
    dump::{DumpError, DumpPlan, Dumper, PreparedBatch},
    selection::Selection,
    utils::{
        explorer_tx_url, print_error_message, print_info_message, print_loading_until_async,
        print_success_message, print_warning_message, short_hex,
    },
};

use super::utils::{picker_label, review_table};

type RpcDumper = Dumper<RpcSafeProtocol, RpcWallet>;

#[derive(Debug, Parser)]
#[clap(about = "Swap yourself out of your 1/1 Safes for a burn address, in a single transaction.")]
pub struct DumpCommand {
    #[arg(
        long = "safe",
        value_name = "ADDRESS",
        help = "A Safe to dump. Repeat to dump several. Skips the interactive picker."
    )]
    safes: Vec<Address>,

    #[arg(short, long, help = "Do not ask for confirmation before sending the transaction.")]
    yes: bool,

    #[arg(long, help = "Build and sign the batch and print it without sending it.")]
    dry_run: bool,

    #[clap(flatten)]
    rpc: RpcCliArgs,

    #[clap(flatten)]
    wallet: WalletCliArgs,

    #[clap(flatten)]
    gateway: GatewayCliArgs,

    #[clap(flatten)]
    send: SendCliArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Pick,
    ToggleAll,
    LoadMore,
    Review,
    Refresh,
    Quit,
}

impl Action {
    fn label(&self) -> &'static str {
        match self {
            Action::Pick => "Select Safes",
            Action::ToggleAll => "Toggle all",
            Action::LoadMore => "Load more",
            Action::Review => "Review & dump selected Safes",
            Action::Refresh => "Refresh",
            Action::Quit => "Quit",
        }
    }
}

/// What happened to a reviewed selection.
enum Outcome {
    Sent,
    Cancelled,
    Failed(String),
}

impl DumpCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let signer = self.wallet.signer()?;
        let rpc_url = self.rpc.rpc_url.clone();

        let wallet = print_loading_until_async(
            "Connecting wallet",
            RpcWallet::connect(rpc_url.clone(), signer.clone(), self.send.send_options()),
        )
        .await?;

        let chain_id = wallet.chain_id();
        let owner = wallet.address();
        print_info_message(&format!("Connected {owner} on {}", Chain::from_id(chain_id)));

        let gateway = self.gateway.client()?;
        let options = self.gateway.overview_options(owner);
        let mut dumper = Dumper::new(RpcSafeProtocol::new(rpc_url, signer), wallet);
        let mut selection = Selection::new(chain_id);

        if !self.safes.is_empty() {
            for safe in &self.safes {
                if !selection.contains(safe) {
                    selection.toggle(*safe);
                }
            }

            return match self.review_and_dump(&mut dumper, &gateway, &options, &selection).await? {
                Outcome::Failed(message) => Err(eyre::eyre!(message)),
                Outcome::Sent | Outcome::Cancelled => Ok(()),
            };
        }

        let mut owned = self.discover(&gateway, &options, chain_id, owner).await?;

        loop {
            print_info_message(&format!(
                "\nSafe Accounts on {} ({} of {} loaded, {} selected)",
                Chain::from_id(dumper.wallet().chain_id()),
                owned.visible().len(),
                owned.total(),
                selection.len()
            ));

            let mut actions = vec![Action::Pick, Action::ToggleAll];
            if owned.has_more() {
                actions.push(Action::LoadMore);
            }
            if !selection.is_empty() {
                actions.push(Action::Review);
            }
            actions.extend([Action::Refresh, Action::Quit]);

            let labels: Vec<_> = actions.iter().map(Action::label).collect();
            let choice = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("What do you want to do?")
                .items(&labels)
                .default(0)
                .interact()?;

            match actions[choice] {
                Action::Pick => pick_safes(&owned, &mut selection, &options.currency)?,
                Action::ToggleAll => {
                    selection.toggle_all(owned.visible());
                    print_info_message(&format!("{} Safes selected", selection.len()));
                }
                Action::LoadMore => {
                    let loading = owned.load_more(&gateway, &options);
                    if let Err(err) = print_loading_until_async("Loading more Safes", loading).await {
                        print_error_message(&format!("Failed to load Safes: {err}. Try again."));
                    }
                }
                Action::Review => {
                    match self.review_and_dump(&mut dumper, &gateway, &options, &selection).await? {
                        Outcome::Sent => break,
                        Outcome::Cancelled => {}
                        Outcome::Failed(message) => print_error_message(&message),
                    }
                }
                Action::Refresh => {
                    let refreshing =
                        refresh_safes(&mut dumper, &gateway, &options, &mut owned, &mut selection);
                    match print_loading_until_async("Refreshing", refreshing).await {
                        Ok(true) => print_warning_message(
                            "The RPC endpoint switched chains, selection cleared.",
                        ),
                        Ok(false) => {}
                        Err(err) => {
                            print_error_message(&format!("Failed to refresh: {err}. Try again."))
                        }
                    }
                }
                Action::Quit => break,
            }
        }

        Ok(())
    }

    /// Runs discovery and loads the first page of overviews.
    async fn discover(
        &self,
        gateway: &SafeGatewayClient,
        options: &OverviewOptions,
        chain_id: u64,
        owner: Address,
    ) -> eyre::Result<OwnedSafes> {
        let loading = async {
            let mut owned = OwnedSafes::discover(gateway, chain_id, owner).await?;
            owned.load_more(gateway, options).await?;
            Ok::<_, eyre::Report>(owned)
        };

        let owned = print_loading_until_async("Fetching owned Safes", loading).await?;
        if owned.total() == 0 {
            print_warning_message("No Safes owned by this wallet on this chain.");
        }

        Ok(owned)
    }

    /// Shows which selected Safes will be dumped, asks for confirmation and submits.
    async fn review_and_dump(
        &self,
        dumper: &mut RpcDumper,
        gateway: &SafeGatewayClient,
        options: &OverviewOptions,
        selection: &Selection,
    ) -> eyre::Result<Outcome> {
        let chain_id = dumper.wallet().chain_id();
        let selected = selection.to_vec();

        let overviews = print_loading_until_async(
            "Fetching selected Safes",
            SafeGateway::safe_overviews(gateway, chain_id, &selected, options),
        )
        .await;
        let overviews = match overviews {
            Ok(overviews) => overviews,
            Err(err) => return Ok(Outcome::Failed(format!("Failed to fetch Safes: {err}"))),
        };

        let plan = DumpPlan::partition(overviews);

        print_info_message(&format!(
            "\nThis will replace {} as owner of the following Safes with {BURN_ADDRESS}.",
            dumper.wallet().address()
        ));
        if !plan.excluded.is_empty() {
            print_warning_message(
                "Safes with a higher threshold than 1 are marked and will not be changed.",
            );
        }
        review_table(&plan, &options.currency).printstd();

        if !plan.is_submittable() {
            return Ok(Outcome::Failed("None of the selected Safes can be dumped.".to_string()));
        }

        if self.dry_run {
            return match dumper.prepare(&plan).await {
                Ok(batch) => {
                    print_batch(&batch)?;
                    Ok(Outcome::Sent)
                }
                Err(err) => Ok(Outcome::Failed(err.short_message())),
            };
        }

        if !self.yes {
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("Dump {} Safe(s)?", plan.eligible.len()))
                .default(false)
                .interact()?;
            if !confirmed {
                return Ok(Outcome::Cancelled);
            }
        }

        let result = print_loading_until_async("Signing and sending", dumper.submit(&plan)).await;

        match result {
            Ok(tx_hash) => {
                let link = explorer_tx_url(chain_id, tx_hash).unwrap_or_else(|| tx_hash.to_string());
                print_success_message(&format!(
                    "✅ Dumped {} Safe(s). Transaction: {link}",
                    plan.eligible.len()
                ));
                Ok(Outcome::Sent)
            }
            Err(err) => Ok(Outcome::Failed(err.short_message())),
        }
    }
}

/// Re-reads the wallet's chain and rediscovers its Safes. Returns whether the chain changed.
///
/// A chain switch clears the selection and the listing right away. Any other failure leaves
/// both untouched so the refresh can be retried.
async fn refresh_safes<P, W, G>(
    dumper: &mut Dumper<P, W>,
    gateway: &G,
    options: &OverviewOptions,
    owned: &mut OwnedSafes,
    selection: &mut Selection,
) -> eyre::Result<bool>
where
    P: SafeProtocol,
    W: WalletTransport,
    G: SafeGateway + ?Sized,
{
    let chain_changed = dumper.wallet_mut().refresh().await?;
    let session = dumper.wallet().session().ok_or(DumpError::WalletNotConnected)?;

    if chain_changed {
        selection.reset_for_chain(session.chain_id);
        owned.reset();
    }

    let mut fresh = OwnedSafes::discover(gateway, session.chain_id, session.address).await?;
    fresh.load_more(gateway, options).await?;
    *owned = fresh;

    Ok(chain_changed)
}

/// Lets the user check and uncheck loaded Safes.
fn pick_safes(owned: &OwnedSafes, selection: &mut Selection, currency: &str) -> eyre::Result<()> {
    let visible = owned.visible();
    if visible.is_empty() {
        print_warning_message("No Safes loaded.");
        return Ok(());
    }

    let labels: Vec<_> = visible.iter().map(|overview| picker_label(overview, currency)).collect();
    let defaults: Vec<_> =
        visible.iter().map(|overview| selection.contains(&overview.safe_address())).collect();

    let chosen = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select Safes (space to toggle, enter to confirm)")
        .items(&labels)
        .defaults(&defaults)
        .interact()?;

    for (i, overview) in visible.iter().enumerate() {
        let safe = overview.safe_address();
        if chosen.contains(&i) != selection.contains(&safe) {
            selection.toggle(safe);
        }
    }

    Ok(())
}

fn print_batch(batch: &PreparedBatch) -> eyre::Result<()> {
    let lines = batch_lines(batch)?;

    print_info_message(&format!("\nmultiSend to {} ({} Safes)", batch.to, lines.len()));
    for line in lines {
        println!("  {line}");
    }
    println!("\ncalldata: {}", batch.calldata);

    Ok(())
}

/// One line per call of the batch, decoded back from its calldata.
fn batch_lines(batch: &PreparedBatch) -> eyre::Result<Vec<String>> {
    let payload = decode_multi_send_call(&batch.calldata)?;
    let transactions = decode_multi_send_data(&payload)?;

    Ok(transactions
        .iter()
        .map(|tx| format!("{}  execTransaction {}", tx.to, short_hex(&tx.data.to_string())))
        .collect())
}
