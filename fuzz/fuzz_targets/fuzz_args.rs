//! Fuzz target: `Args` tokenization and reply formatting
//!
//! Any UTF-8 line must tokenize without empty tokens, and the reply built
//! from its first token must stay on a single line.
//!
//! cargo fuzz run fuzz_args

#![no_main]

use libfuzzer_sys::fuzz_target;
use rigctl::cli::args::{Args, Reply, format_reply};
use rigctl::error::ProtocolError;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };
    if line.contains('\n') {
        return;
    }

    let mut args = Args::new(line, ' ');
    let tag = args.next();
    assert!(tag.map_or(true, |t| !t.is_empty() && !t.contains(' ')));

    for token in args {
        assert!(!token.is_empty());
        assert!(!token.contains(' '));
    }

    let _: Result<u8, _> = Args::new(line, ' ').next_parsed::<u8>("value");

    let outcome: rigctl::error::Result<Reply> = match tag {
        Some(name) => Err(ProtocolError::unrecognized(name).into()),
        None => Ok(Reply::Done),
    };
    let reply = format_reply(tag, ' ', &outcome);
    assert!(!reply.contains('\n'));
});
