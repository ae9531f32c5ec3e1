//! # Services Module
//!
//! Collaborators reached over the network.

pub mod provider;
pub use provider::*;
