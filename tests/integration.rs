//! Integration tests for stellar-txkit.
//!
//! Exercises the public API end to end: building, signing, sealing and
//! fee-bumping transactions, submitting through the provider, and logging
//! setup.

mod integration {
    mod logging;
    mod signing_flow;
    mod submission;
}
