//! Token stream and reply formatting.
//!
//! Handlers pull their positional arguments one at a time from [`Args`]
//! and return a [`Reply`]; the engine turns that into exactly one line:
//!
//! ```text
//!   <tag> OK
//!   <tag> OK <value>
//!   <tag> ERROR <message>
//! ```

use core::fmt;
use core::str::FromStr;

use crate::error::{ProtocolError, Result};

/// Pull-based tokenizer over one command line.
///
/// Empty tokens produced by repeated separators are skipped.
pub struct Args<'a> {
    tokens: core::str::Split<'a, char>,
}

impl<'a> Args<'a> {
    pub fn new(line: &'a str, separator: char) -> Self {
        Self {
            tokens: line.split(separator),
        }
    }

    /// Next token, or `No <what> specified!`.
    pub fn next_required(&mut self, what: &'static str) -> Result<&'a str> {
        self.next()
            .ok_or_else(|| ProtocolError::MissingArgument(what).into())
    }

    /// Next token parsed as `T`, or `No/Invalid <what>` on failure.
    pub fn next_parsed<T: FromStr>(&mut self, what: &'static str) -> Result<T> {
        self.next_required(what)?
            .parse()
            .map_err(|_| ProtocolError::InvalidArgument(what).into())
    }
}

impl<'a> Iterator for Args<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.tokens.by_ref().find(|t| !t.is_empty())
    }
}

/// Successful outcome of a command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reply {
    /// Bare `OK`.
    Done,
    /// `OK` followed by fixed text.
    Text(&'static str),
    /// `OK` followed by a measurement, two decimals.
    Value(f32),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => write!(f, "OK"),
            Self::Text(text) => write!(f, "OK {text}"),
            Self::Value(v) => write!(f, "OK {v:.2}"),
        }
    }
}

/// Render the single reply line (without terminator) for a handler outcome.
pub fn format_reply(tag: Option<&str>, separator: char, outcome: &Result<Reply>) -> String {
    let mut line = String::new();
    if let Some(tag) = tag {
        line.push_str(tag);
        line.push(separator);
    }
    match outcome {
        Ok(reply) => line.push_str(&reply.to_string()),
        Err(e) => {
            line.push_str("ERROR");
            line.push(separator);
            line.push_str(&e.to_string());
        }
    }
    line
}
