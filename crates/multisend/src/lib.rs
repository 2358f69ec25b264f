//! Batching of Safe transactions through the `MultiSendCallOnly` contract.

mod addresses;
mod contract;
mod encoder;
mod error;

pub use addresses::*;
pub use contract::*;
pub use encoder::*;
pub use error::*;
