#![no_main]

use esparto_core::parse_expression;
use libfuzzer_sys::fuzz_target;

// A standalone expression parse must either consume the whole input or
// fail with a diagnostic; parsing the same input twice must agree.
fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let first = parse_expression(source);
    let second = parse_expression(source);
    assert_eq!(first, second);
});
