#![no_main]

use libfuzzer_sys::fuzz_target;
use stellar_txkit::models::{ReadXdr, ScVal, WriteXdr};

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = ScVal::from_xdr(data) {
        assert_eq!(value.to_xdr(), data);
    }
});
