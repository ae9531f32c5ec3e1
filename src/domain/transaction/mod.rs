//! Transaction assembly, signing and fee bumps.

mod builder;
pub use builder::*;

mod preconditions;
pub use preconditions::*;

mod signing;
pub use signing::*;

mod envelope;
pub use envelope::*;

mod fee_bump;
pub use fee_bump::*;
