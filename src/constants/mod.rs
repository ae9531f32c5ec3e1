mod stellar_transaction;
pub use stellar_transaction::*;

mod stellar_network;
pub use stellar_network::*;

mod logging;
pub use logging::*;

mod provider;
pub use provider::*;
