#![no_main]

use esparto_core::{ParseOptions, parse_program, parse_program_with};
use libfuzzer_sys::fuzz_target;

// Arbitrary UTF-8 is parsed as a script, once with default options and once
// located and tolerant.  Both runs must return without panicking, and every
// diagnostic must point inside the source.
fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    if let Err(err) = parse_program(source) {
        if let Some(index) = err.index {
            assert!(index <= source.len());
        }
    }

    let options = ParseOptions::located().with_source().tolerant();
    if let Ok(program) = parse_program_with(source, &options) {
        if let Some(end) = program.span.end() {
            assert!(end <= source.len());
        }
        for err in &program.errors {
            assert!(err.has_position());
        }
    }
});
