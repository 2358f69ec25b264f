use alloy_primitives::{address, Address};

/// Head of the owners linked list kept by every Safe.
pub const SENTINEL_OWNERS: Address = address!("0000000000000000000000000000000000000001");

/// Owner that replaces the caller when a Safe is dumped. Nobody holds its key.
pub const BURN_ADDRESS: Address = address!("0000000000000000000000000000000000000002");

pub mod gateway {
    pub const SAFE_CLIENT_GATEWAY_URL: &str = "https://safe-client.safe.global";

    /// Maximum number of Safes the gateway accepts in one overview request.
    pub const MAX_OVERVIEWS_PER_REQUEST: usize = 10;

    pub const DEFAULT_CURRENCY: &str = "USD";
}
