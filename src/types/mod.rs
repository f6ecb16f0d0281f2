//! MyInfo Types
//!
//! Core type definitions for the consent, token and person operations.

pub mod auth;
pub mod callback;
pub mod config;
pub mod person;
pub mod token;

pub use auth::*;
pub use callback::*;
pub use config::*;
pub use person::*;
pub use token::*;
