pub mod config;
pub mod subaccount;
mod tests;
pub mod transport;
