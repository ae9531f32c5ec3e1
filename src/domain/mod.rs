//! # Domain Module
//!
//! Transaction assembly and the signing state machine.

pub mod transaction;
pub use transaction::*;
