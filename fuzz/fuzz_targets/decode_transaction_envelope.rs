#![no_main]

use libfuzzer_sys::fuzz_target;
use stellar_txkit::domain::StellarTransaction;
use stellar_txkit::models::{ReadXdr, TransactionEnvelope, WriteXdr};

fuzz_target!(|data: &[u8]| {
    if let Ok(envelope) = TransactionEnvelope::from_xdr(data) {
        // anything accepted must re-encode to the same bytes
        assert_eq!(envelope.to_xdr(), data);
        let _ = StellarTransaction::from_envelope(envelope).operations().len();
    }
});
