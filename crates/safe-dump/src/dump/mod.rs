//! Turns a selection of Safes into a single `multiSend` transaction that swaps the wallet out
//! of every eligible Safe.

use std::fmt;

use alloy_primitives::{Address, Bytes, B256};
use futures::future::try_join_all;
use multisend::{
    encode_multi_send_call, encode_multi_send_data, multi_send_call_only_address, MetaTransaction,
    SUPPORTED_SAFE_VERSION,
};
use safe_multisig::{SafeOverview, BURN_ADDRESS};
use tracing::{debug, info, warn};

use crate::{
    adapters::{SafeProtocol, WalletSession, WalletTransport},
    selection::is_dumpable,
};

mod error;

pub use error::DumpError;

/// Selected Safes split by whether they can be dumped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpPlan {
    /// Safes with threshold 1, in selection order.
    pub eligible: Vec<SafeOverview>,
    /// Safes that need more than one signature and are left alone.
    pub excluded: Vec<SafeOverview>,
}

impl DumpPlan {
    pub fn partition(overviews: impl IntoIterator<Item = SafeOverview>) -> Self {
        let (eligible, excluded) = overviews.into_iter().partition(is_dumpable);
        Self { eligible, excluded }
    }

    pub fn is_submittable(&self) -> bool {
        !self.eligible.is_empty()
    }

    pub fn eligible_addresses(&self) -> Vec<Address> {
        self.eligible.iter().map(SafeOverview::safe_address).collect()
    }
}

/// The aggregated call ready to be sent by the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedBatch {
    /// `MultiSendCallOnly` deployment.
    pub to: Address,
    /// `multiSend(bytes)` calldata.
    pub calldata: Bytes,
    /// One entry per dumped Safe, in plan order.
    pub transactions: Vec<MetaTransaction>,
}

/// Progress of a single submission attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DumpState {
    #[default]
    Idle,
    /// Creating and signing the per-Safe transactions.
    Building,
    /// Aggregating into the multi-send payload.
    Encoding,
    /// Waiting on the wallet to broadcast.
    Submitting,
    Success(B256),
    Failed(String),
}

impl DumpState {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Building | Self::Encoding | Self::Submitting)
    }
}

impl fmt::Display for DumpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Building => write!(f, "building"),
            Self::Encoding => write!(f, "encoding"),
            Self::Submitting => write!(f, "submitting"),
            Self::Success(hash) => write!(f, "sent {hash}"),
            Self::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

/// Drives dump attempts. Each attempt is all-or-nothing: a failure in any Safe aborts the batch
/// before anything is broadcast.
pub struct Dumper<P, W> {
    protocol: P,
    wallet: W,
    safe_version: String,
    state: DumpState,
}

impl<P, W> Dumper<P, W>
where
    P: SafeProtocol,
    W: WalletTransport,
{
    pub fn new(protocol: P, wallet: W) -> Self {
        Self {
            protocol,
            wallet,
            safe_version: SUPPORTED_SAFE_VERSION.to_string(),
            state: DumpState::Idle,
        }
    }

    /// Safe version the `MultiSendCallOnly` deployment is looked up for.
    pub fn with_safe_version(mut self, version: impl Into<String>) -> Self {
        self.safe_version = version.into();
        self
    }

    pub fn state(&self) -> &DumpState {
        &self.state
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn wallet_mut(&mut self) -> &mut W {
        &mut self.wallet
    }

    /// Builds, signs and aggregates the transactions of `plan` without sending anything.
    ///
    /// Dropping the returned future cancels the attempt and leaves the dumper idle.
    pub async fn prepare(&mut self, plan: &DumpPlan) -> Result<PreparedBatch, DumpError> {
        let session = self.begin(plan)?;
        let mut attempt = Attempt::start(&mut self.state);

        match build_batch(&self.protocol, &self.safe_version, plan, session, &mut attempt).await {
            Ok(batch) => {
                attempt.enter(DumpState::Idle);
                Ok(batch)
            }
            Err(err) => Err(attempt.fail(err)),
        }
    }

    /// Builds the batch for `plan` and hands it to the wallet.
    ///
    /// Dropping the returned future cancels the attempt and leaves the dumper idle.
    pub async fn submit(&mut self, plan: &DumpPlan) -> Result<B256, DumpError> {
        let session = self.begin(plan)?;
        let mut attempt = Attempt::start(&mut self.state);

        let batch =
            match build_batch(&self.protocol, &self.safe_version, plan, session, &mut attempt)
                .await
            {
                Ok(batch) => batch,
                Err(err) => return Err(attempt.fail(err)),
            };

        attempt.enter(DumpState::Submitting);
        debug!(to = %batch.to, safes = batch.transactions.len(), "submitting batch");

        match self.wallet.send_transaction(batch.to, batch.calldata).await {
            Ok(tx_hash) => {
                info!(%tx_hash, safes = batch.transactions.len(), "dump transaction sent");
                attempt.enter(DumpState::Success(tx_hash));
                Ok(tx_hash)
            }
            Err(err) => Err(attempt.fail(DumpError::broadcast(err))),
        }
    }

    /// Checks the preconditions of an attempt. Does not touch the state on rejection.
    fn begin(&self, plan: &DumpPlan) -> Result<WalletSession, DumpError> {
        if self.state.is_busy() {
            return Err(DumpError::Busy);
        }

        let session = self.wallet.session().ok_or(DumpError::WalletNotConnected)?;

        if !plan.is_submittable() {
            return Err(DumpError::NothingToDump);
        }

        for safe in &plan.excluded {
            debug!(safe = %safe.safe_address(), threshold = safe.threshold, "excluded from dump");
        }

        Ok(session)
    }
}

/// State of one running attempt. Dropped while busy, it puts the dumper back to idle.
struct Attempt<'a> {
    state: &'a mut DumpState,
}

impl<'a> Attempt<'a> {
    fn start(state: &'a mut DumpState) -> Self {
        *state = DumpState::Building;
        Self { state }
    }

    fn enter(&mut self, state: DumpState) {
        *self.state = state;
    }

    fn fail(self, err: DumpError) -> DumpError {
        warn!(state = %self.state, error = %err, "dump attempt failed");
        *self.state = DumpState::Failed(err.short_message());
        err
    }
}

impl Drop for Attempt<'_> {
    fn drop(&mut self) {
        if self.state.is_busy() {
            warn!(state = %self.state, "dump attempt cancelled");
            *self.state = DumpState::Idle;
        }
    }
}

async fn build_batch<P: SafeProtocol>(
    protocol: &P,
    safe_version: &str,
    plan: &DumpPlan,
    session: WalletSession,
    attempt: &mut Attempt<'_>,
) -> Result<PreparedBatch, DumpError> {
    // Safes that slipped into `eligible` with a higher threshold are dropped here as well.
    let safes: Vec<Address> = plan
        .eligible
        .iter()
        .filter(|overview| is_dumpable(overview))
        .map(SafeOverview::safe_address)
        .collect();
    if safes.is_empty() {
        return Err(DumpError::NothingToDump);
    }

    let transactions =
        try_join_all(safes.iter().map(|safe| build_transaction(protocol, *safe, session.address)))
            .await?;

    attempt.enter(DumpState::Encoding);

    let to = multi_send_call_only_address(session.chain_id, safe_version)?;
    let payload = encode_multi_send_data(&transactions);
    let calldata = encode_multi_send_call(payload);

    debug!(%to, safes = transactions.len(), bytes = calldata.len(), "encoded multi-send batch");

    Ok(PreparedBatch { to, calldata, transactions })
}

/// Swaps `owner` for the burn address in `safe` and signs it.
async fn build_transaction<P: SafeProtocol>(
    protocol: &P,
    safe: Address,
    owner: Address,
) -> Result<MetaTransaction, DumpError> {
    let tx = protocol
        .create_swap_owner_tx(safe, owner, BURN_ADDRESS)
        .await
        .map_err(|err| DumpError::build(safe, err))?;

    let signed = protocol
        .sign_transaction(safe, tx)
        .await
        .map_err(|err| DumpError::sign(safe, err))?;

    Ok(signed.into_meta_transaction())
}
