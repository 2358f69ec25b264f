pub mod dump;
pub mod list;

pub(crate) mod utils;
