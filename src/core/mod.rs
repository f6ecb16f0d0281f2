//! Core Infrastructure
//!
//! HTTP transport seam shared by the token and person operations.

pub mod transport;

pub use transport::*;
