//! Fuzz target for the BED parser
//!
//! This target feeds arbitrary bytes to the parser with each supported
//! delimiter to find crashes or panics.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Don't fuzz extremely long inputs - diminishing returns
    if data.len() > 4096 {
        return;
    }

    // The parser should never panic on any input
    for delimiter in ['\t', ',', ' '] {
        if let Ok(regions) = ferro_bedshift::bed::parse_bed(data, delimiter, "fuzz") {
            let mut out = Vec::new();
            let _ = ferro_bedshift::bed::write_bed(&mut out, &regions);
        }
    }
});
