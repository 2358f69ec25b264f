//! Client for the Safe Client Gateway.

use alloy_primitives::Address;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use crate::consts::gateway::{DEFAULT_CURRENCY, MAX_OVERVIEWS_PER_REQUEST};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid gateway url: {0}")]
    Url(#[from] url::ParseError),

    #[error("gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("gateway responded with {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },
}

/// Options forwarded to the overview endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewOptions {
    /// Only value tokens the gateway trusts.
    pub trusted: bool,
    pub exclude_spam: bool,
    /// Fiat currency for `fiatTotal`.
    pub currency: String,
    /// Wallet used as valuation context.
    pub wallet_address: Option<Address>,
}

impl Default for OverviewOptions {
    fn default() -> Self {
        Self {
            trusted: true,
            exclude_spam: false,
            currency: DEFAULT_CURRENCY.to_string(),
            wallet_address: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInfo {
    pub value: Address,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub logo_uri: Option<String>,
}

/// Summary of a Safe as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeOverview {
    pub address: AddressInfo,
    pub chain_id: String,
    pub threshold: u64,
    pub owners: Vec<AddressInfo>,
    #[serde(default)]
    pub fiat_total: Option<String>,
    #[serde(default)]
    pub queued: u64,
    #[serde(default)]
    pub awaiting_confirmation: Option<u64>,
}

impl SafeOverview {
    pub fn safe_address(&self) -> Address {
        self.address.value
    }

    pub fn is_owner(&self, address: Address) -> bool {
        self.owners.iter().any(|owner| owner.value == address)
    }
}

#[derive(Debug, Deserialize)]
struct OwnedSafesResponse {
    safes: Vec<Address>,
}

pub struct SafeGatewayClient {
    base_url: Url,
    client: reqwest::Client,
}

impl SafeGatewayClient {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        // Relative joins drop the last path segment unless it ends with a slash.
        let base_url = match base_url.ends_with('/') {
            true => Url::parse(base_url)?,
            false => Url::parse(&format!("{base_url}/"))?,
        };

        Ok(Self { base_url, client: reqwest::Client::new() })
    }

    /// All Safes on `chain_id` that list `owner` as an owner.
    pub async fn owned_safes(
        &self,
        chain_id: u64,
        owner: Address,
    ) -> Result<Vec<Address>, GatewayError> {
        let url = self.owned_safes_url(chain_id, owner)?;
        let response: OwnedSafesResponse = self.get_json(url, &[]).await?;

        tracing::debug!(chain_id, %owner, count = response.safes.len(), "fetched owned Safes");

        Ok(response.safes)
    }

    /// Overviews of `safes` on `chain_id`, in the order of `safes`.
    ///
    /// No request is made for an empty list. Longer lists are split into gateway sized chunks
    /// that are fetched one after another.
    pub async fn safe_overviews(
        &self,
        chain_id: u64,
        safes: &[Address],
        options: &OverviewOptions,
    ) -> Result<Vec<SafeOverview>, GatewayError> {
        let mut overviews = Vec::with_capacity(safes.len());

        for chunk in overview_chunks(safes) {
            let url = self.base_url.join("v1/safes")?;
            let query = overview_query(chain_id, chunk, options);
            let page: Vec<SafeOverview> = self.get_json(url, &query).await?;
            overviews.extend(in_request_order(chunk, page));
        }

        tracing::debug!(
            chain_id,
            requested = safes.len(),
            received = overviews.len(),
            "fetched Safe overviews"
        );

        Ok(overviews)
    }

    fn owned_safes_url(&self, chain_id: u64, owner: Address) -> Result<Url, GatewayError> {
        Ok(self.base_url.join(&format!("v1/chains/{chain_id}/owners/{owner}/safes"))?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        tracing::trace!(%url, "gateway request");

        let response = self.client.get(url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, body });
        }

        Ok(response.json().await?)
    }
}

/// Splits `safes` into the identifier lists of consecutive overview requests.
pub fn overview_chunks(safes: &[Address]) -> std::slice::Chunks<'_, Address> {
    safes.chunks(MAX_OVERVIEWS_PER_REQUEST)
}

/// Sorts a gateway page by the position of each Safe in `requested`. Safes the gateway returned
/// without being asked for go last.
fn in_request_order(requested: &[Address], mut page: Vec<SafeOverview>) -> Vec<SafeOverview> {
    page.sort_by_key(|overview| {
        requested
            .iter()
            .position(|safe| *safe == overview.safe_address())
            .unwrap_or(requested.len())
    });
    page
}

/// Query string of an overview request.
pub fn overview_query(
    chain_id: u64,
    safes: &[Address],
    options: &OverviewOptions,
) -> Vec<(&'static str, String)> {
    let safes = safes.iter().map(|safe| format!("{chain_id}:{safe}")).collect::<Vec<_>>().join(",");

    let mut query = vec![
        ("currency", options.currency.to_lowercase()),
        ("trusted", options.trusted.to_string()),
        ("exclude_spam", options.exclude_spam.to_string()),
        ("safes", safes),
    ];
    if let Some(wallet) = options.wallet_address {
        query.push(("wallet_address", wallet.to_string()));
    }

    query
}
