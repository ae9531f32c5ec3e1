#![no_main]

use libfuzzer_sys::fuzz_target;
use stellar_txkit::models::Strkey;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(key) = text.parse::<Strkey>() {
            assert_eq!(key.to_string(), text);
        }
    }
});
