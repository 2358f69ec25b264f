pub mod adapters;
pub mod cmd;
pub mod common;
pub mod discovery;
pub mod dump;
pub mod selection;
pub mod utils;

#[cfg(test)]
mod tests;
