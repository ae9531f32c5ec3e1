//! Stellar wire-protocol client core.
//!
//! * `models::xdr` - the binary codec and protocol types
//! * `models::address` - StrKey text addresses
//! * `utils` - amount conversion, hashing and key helpers
//! * `domain` - transaction assembly, signing and fee bumps
//! * `services::provider` - the RPC transport contract and retrying provider
//! * `config`, `logging` - environment driven setup

pub mod config;
pub mod constants;
pub mod domain;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;
