/// Environment variables shared with foundry tooling.
pub const ETH_RPC_URL_ENV: &str = "ETH_RPC_URL";
pub const ETH_PRIVATE_KEY_ENV: &str = "ETH_PRIVATE_KEY";
pub const ETH_KEYSTORE_ENV: &str = "ETH_KEYSTORE";
pub const ETH_PASSWORD_ENV: &str = "ETH_PASSWORD";

pub const SAFE_GATEWAY_URL_ENV: &str = "SAFE_GATEWAY_URL";

/// Fiat currency used when none is given.
pub const DEFAULT_CURRENCY: &str = "USD";
