mod base64;
pub use base64::*;

mod amount;
pub use amount::*;

mod hash;
pub use hash::*;

mod ed25519;
pub use ed25519::*;
