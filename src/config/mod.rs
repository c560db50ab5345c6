//! Project configuration (`.sharelock.toml`).

pub mod settings;

pub use settings::Settings;
