mod codec;
pub use codec::*;

mod strkey;
pub use strkey::*;

mod format;
pub use format::*;

mod transaction;
pub use transaction::*;
