//! Application-level configuration.
//!
//! - [`BridgeConfig`]: interpreter construction policy, reused on every reset

pub mod bridge_config;

pub use bridge_config::BridgeConfig;
