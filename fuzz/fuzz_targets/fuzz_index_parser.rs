#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Malformed input must surface as an error, never a panic
    let _ = dsq::index::parse_index(data);
});
