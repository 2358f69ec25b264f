//! Discovery of the Safes owned by a wallet, with overviews loaded page by page.

use alloy_primitives::Address;
use safe_multisig::{OverviewOptions, SafeOverview};
use tracing::debug;

use crate::adapters::SafeGateway;

/// Number of Safes whose overview is loaded per page.
pub const PAGE_SIZE: usize = 10;

/// The Safes owned by `owner` on `chain_id`.
///
/// Discovery returns every address at once; overviews are fetched on demand in windows of
/// [`PAGE_SIZE`] through [`OwnedSafes::load_more`].
#[derive(Debug, Clone)]
pub struct OwnedSafes {
    chain_id: u64,
    owner: Address,
    addresses: Vec<Address>,
    overviews: Vec<SafeOverview>,
    loaded_pages: usize,
    page_size: usize,
}

impl OwnedSafes {
    pub fn new(chain_id: u64, owner: Address, addresses: Vec<Address>) -> Self {
        Self {
            chain_id,
            owner,
            addresses,
            overviews: Vec::new(),
            loaded_pages: 0,
            page_size: PAGE_SIZE,
        }
    }

    /// Asks the gateway for every Safe owned by `owner`. No overview is loaded yet.
    pub async fn discover<G>(gateway: &G, chain_id: u64, owner: Address) -> eyre::Result<Self>
    where
        G: SafeGateway + ?Sized,
    {
        let addresses = gateway.owned_safes(chain_id, owner).await?;
        debug!(chain_id, %owner, count = addresses.len(), "discovered owned Safes");

        Ok(Self::new(chain_id, owner, addresses))
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Every discovered address, loaded or not.
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn total(&self) -> usize {
        self.addresses.len()
    }

    /// Overviews loaded so far, in discovery order.
    pub fn visible(&self) -> &[SafeOverview] {
        &self.overviews
    }

    pub fn loaded_pages(&self) -> usize {
        self.loaded_pages
    }

    pub fn has_more(&self) -> bool {
        self.loaded_pages * self.page_size < self.addresses.len()
    }

    /// Addresses of the page [`load_more`](Self::load_more) would fetch.
    pub fn next_window(&self) -> &[Address] {
        let start = (self.loaded_pages * self.page_size).min(self.addresses.len());
        let end = (start + self.page_size).min(self.addresses.len());
        &self.addresses[start..end]
    }

    /// Fetches the overviews of the next page and appends them. Returns how many were added.
    ///
    /// On error nothing changes, so the call can simply be repeated.
    pub async fn load_more<G>(&mut self, gateway: &G, options: &OverviewOptions) -> eyre::Result<usize>
    where
        G: SafeGateway + ?Sized,
    {
        let window = self.next_window();
        if window.is_empty() {
            return Ok(0);
        }

        let overviews = gateway.safe_overviews(self.chain_id, window, options).await?;
        let added = overviews.len();

        self.overviews.extend(overviews);
        self.loaded_pages += 1;

        debug!(page = self.loaded_pages, added, total = self.total(), "loaded overview page");

        Ok(added)
    }

    /// Loads pages until every discovered Safe has an overview.
    pub async fn load_all<G>(&mut self, gateway: &G, options: &OverviewOptions) -> eyre::Result<usize>
    where
        G: SafeGateway + ?Sized,
    {
        let mut added = 0;
        while self.has_more() {
            added += self.load_more(gateway, options).await?;
        }
        Ok(added)
    }

    /// Finds a loaded overview by address.
    pub fn overview(&self, safe: Address) -> Option<&SafeOverview> {
        self.overviews.iter().find(|overview| overview.safe_address() == safe)
    }

    /// Drops everything that was discovered or loaded.
    pub fn reset(&mut self) {
        self.addresses.clear();
        self.overviews.clear();
        self.loaded_pages = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adapters::MockSafeGateway, tests::overview};

    fn gateway_echoing_overviews() -> MockSafeGateway {
        let mut gateway = MockSafeGateway::new();
        gateway.expect_safe_overviews().returning(|_, safes, _| {
            Ok(safes.iter().map(|safe| overview(*safe, 1)).collect())
        });
        gateway
    }

    fn addresses(count: u8) -> Vec<Address> {
        (1..=count).map(Address::repeat_byte).collect()
    }

    #[tokio::test]
    async fn pages_through_discovered_safes() {
        let gateway = gateway_echoing_overviews();
        let options = OverviewOptions::default();
        let mut owned = OwnedSafes::new(1, Address::ZERO, addresses(25));

        assert!(owned.visible().is_empty());
        assert!(owned.has_more());

        owned.load_more(&gateway, &options).await.unwrap();
        owned.load_more(&gateway, &options).await.unwrap();
        assert_eq!(owned.visible().len(), 20);
        assert!(owned.has_more());

        assert_eq!(owned.load_more(&gateway, &options).await.unwrap(), 5);
        assert_eq!(owned.visible().len(), 25);
        assert!(!owned.has_more());

        assert_eq!(owned.load_more(&gateway, &options).await.unwrap(), 0);
        assert_eq!(owned.visible().len(), 25);

        let visible: Vec<_> = owned.visible().iter().map(SafeOverview::safe_address).collect();
        assert_eq!(visible, owned.addresses());
    }

    #[tokio::test]
    async fn empty_window_makes_no_request() {
        let mut gateway = MockSafeGateway::new();
        gateway.expect_safe_overviews().never();

        let mut owned = OwnedSafes::new(1, Address::ZERO, Vec::new());

        assert_eq!(owned.load_more(&gateway, &OverviewOptions::default()).await.unwrap(), 0);
        assert!(!owned.has_more());
    }

    #[tokio::test]
    async fn failed_page_can_be_retried() {
        let mut gateway = MockSafeGateway::new();
        let mut seq = mockall::Sequence::new();
        gateway
            .expect_safe_overviews()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Err(eyre::eyre!("gateway unavailable")));
        gateway
            .expect_safe_overviews()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, safes, _| Ok(safes.iter().map(|safe| overview(*safe, 1)).collect()));

        let options = OverviewOptions::default();
        let mut owned = OwnedSafes::new(1, Address::ZERO, addresses(3));

        assert!(owned.load_more(&gateway, &options).await.is_err());
        assert_eq!(owned.loaded_pages(), 0);

        assert_eq!(owned.load_more(&gateway, &options).await.unwrap(), 3);
        assert_eq!(owned.loaded_pages(), 1);
    }

    #[tokio::test]
    async fn discover_then_load_all() {
        let mut gateway = gateway_echoing_overviews();
        gateway.expect_owned_safes().returning(|_, _| Ok(addresses(12)));

        let mut owned = OwnedSafes::discover(&gateway, 5, Address::ZERO).await.unwrap().with_page_size(5);
        owned.load_all(&gateway, &OverviewOptions::default()).await.unwrap();

        assert_eq!(owned.loaded_pages(), 3);
        assert_eq!(owned.visible().len(), 12);
        assert!(owned.overview(Address::repeat_byte(12)).is_some());

        owned.reset();
        assert_eq!(owned.total(), 0);
        assert!(owned.visible().is_empty());
    }
}
