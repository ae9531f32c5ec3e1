//! Stellar XDR: the binary codec and the protocol types built on it.

mod codec;
pub use codec::*;
pub(crate) use codec::{xdr_enum_codec, xdr_struct_codec};

mod bounded;
pub use bounded::*;

mod types;
pub use types::*;

mod ledger;
pub use ledger::*;

mod scval;
pub use scval::*;

mod operation;
pub use operation::*;

mod transaction;
pub use transaction::*;

mod result;
pub use result::*;
