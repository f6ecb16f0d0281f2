//! Builders
//!
//! Fluent builder for MyInfo configuration.

pub mod config;

pub use config::{myinfo_config, MyInfoConfigBuilder};
