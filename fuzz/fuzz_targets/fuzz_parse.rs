#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlprint::parser::parse_str;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Parser should never panic on any input
        let _ = parse_str(s);
    }
});
