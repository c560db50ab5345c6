#[cfg(feature = "audit-log")]
pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod document;
pub mod errors;
pub mod session;
pub mod store;
