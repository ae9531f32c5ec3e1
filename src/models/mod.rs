mod error;
pub use error::*;

pub mod xdr;
pub use xdr::*;

pub mod address;
pub use address::{Address, MuxedAddress, Strkey};

mod network;
pub use network::*;

mod keypair;
pub use keypair::*;

pub mod rpc;
pub use rpc::*;
