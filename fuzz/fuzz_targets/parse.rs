#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut parser = girpack::Parser::new();
    let _ = parser.parse_bytes(data, "fuzz.gir");
    // Second pass over the same parser exercises pool reuse after a
    // possibly failed first run.
    let _ = parser.parse_bytes(data, "fuzz.gir");
});
