//! Fuzz target: `LineDecoder::feed`
//!
//! Drives arbitrary byte sequences into the streaming line decoder, split at
//! a fuzzer-chosen point, and asserts that it never panics, never emits a
//! line containing the terminator, and never buffers more than its capacity.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use rigctl::cli::codec::LineDecoder;
use rigctl::config::LINE_CAPACITY;

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let split = usize::from(split).min(rest.len());
    let (head, tail) = rest.split_at(split);

    let mut decoder = LineDecoder::new(b'\n');
    let mut lines = 0;
    for chunk in [head, tail] {
        lines += decoder.feed(chunk, |line| {
            assert!(!line.contains('\n'), "line contains terminator");
            assert!(line.len() <= LINE_CAPACITY, "line exceeds buffer");
        });
        assert!(decoder.pending() <= LINE_CAPACITY);
    }
    assert!(lines <= rest.iter().filter(|b| **b == b'\n').count());

    // After a reset the decoder must accept bytes cleanly again.
    decoder.reset();
    assert_eq!(decoder.pending(), 0);
    let _ = decoder.feed(rest, |_| {});
});
