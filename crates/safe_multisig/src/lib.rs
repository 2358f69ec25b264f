//! Safe smart account helpers: contract reads, owner management, EIP-712 signing and the
//! Safe Client Gateway.

pub mod calls;
pub mod consts;
pub mod gateway;
pub mod owners;
pub mod signing;
pub mod transaction_data;

mod contracts;

pub use consts::{BURN_ADDRESS, SENTINEL_OWNERS};
pub use gateway::{GatewayError, OverviewOptions, SafeGatewayClient, SafeOverview};
pub use transaction_data::{SafeTransactionData, SignedSafeTransaction};
