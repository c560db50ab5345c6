//! One module per subcommand.

#[cfg(feature = "audit-log")]
pub mod audit_cmd;
pub mod completions;
pub mod create;
pub mod list;
pub mod open;
pub mod reshare;
pub mod unlock;
pub mod version;
