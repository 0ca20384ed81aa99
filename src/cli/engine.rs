//! Command engine: routes serial lines to registered handlers.
//!
//! Pipeline per line:
//!
//! 1. **Tokenize**: split on the configured separator, skipping empties.
//! 2. **Locate tag and name**: a line may be `<name> <tag> args...` or
//!    `<tag> <name> args...`; whichever token is a registered name wins.
//! 3. **Dispatch**: the handler validates its arguments and acts, or the
//!    default path reports `Unrecognized command [<name>]!`.
//! 4. **Reply**: exactly one line, echoing the tag.
//!
//! The engine does not own a transport or the [`Rig`]; both are lent to
//! [`CommandEngine::poll`] on every loop iteration.

use log::{debug, warn};

use crate::app::ports::Board;
use crate::app::service::Rig;
use crate::config::RigConfig;
use crate::error::{ProtocolError, Result};

use super::args::{Args, Reply, format_reply};
use super::codec::LineDecoder;
use super::handlers;
use super::transport::Transport;

/// Bytes pulled from the transport per read call.
const READ_CHUNK: usize = 64;

/// Most bytes one [`CommandEngine::poll`] consumes, so a busy line cannot
/// starve the frame tick.
pub const POLL_BUDGET: usize = 8 * READ_CHUNK;

/// One command implementation.
///
/// Handlers receive the arguments that follow the name and the tag, and
/// must validate fully before mutating anything on the rig.
pub trait CommandHandler<B: Board> {
    fn execute(&self, rig: &mut Rig<B>, args: &mut Args<'_>) -> Result<Reply>;
}

// ───────────────────────────────────────────────────────────────
// Command table
// ───────────────────────────────────────────────────────────────

/// Ordered `(name, handler)` list, searched linearly by exact name.
pub struct CommandTable<B: Board> {
    commands: Vec<(&'static str, Box<dyn CommandHandler<B>>)>,
    separator: char,
}

impl<B: Board> CommandTable<B> {
    /// An empty table; every line gets the unrecognized-command reply.
    pub fn new(separator: char) -> Self {
        Self {
            commands: Vec::new(),
            separator,
        }
    }

    /// A table with the five built-in commands registered.
    pub fn with_builtin(separator: char) -> Self {
        let mut table = Self::new(separator);
        table.register("handshake", handlers::Handshake);
        table.register("set_relay", handlers::SetRelay);
        table.register("get_sensor", handlers::GetSensor);
        table.register("calibrate_sensor", handlers::CalibrateSensor);
        table.register("set_light", handlers::SetLight);
        table
    }

    /// Append a handler.  Earlier registrations win on duplicate names.
    pub fn register(&mut self, name: &'static str, handler: impl CommandHandler<B> + 'static) {
        self.commands.push((name, Box::new(handler)));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(|(name, _)| *name)
    }

    /// Process one line.  Returns the reply line (without terminator), or
    /// `None` for a line with no tokens.
    pub fn dispatch(&self, line: &str, rig: &mut Rig<B>) -> Option<String> {
        let mut args = Args::new(line, self.separator);
        let first = args.next()?;

        let (tag, name) = if self.contains(first) {
            (args.next(), first)
        } else {
            match args.next() {
                Some(second) => (Some(first), second),
                None => (None, first),
            }
        };

        let outcome = match self.find(name) {
            Some(handler) => handler.execute(rig, &mut args),
            None => Err(ProtocolError::unrecognized(name).into()),
        };

        match &outcome {
            Ok(reply) => debug!("CLI: {} [{}] -> {}", name, tag.unwrap_or("-"), reply),
            Err(e) => debug!("CLI: {} [{}] -> ERROR {}", name, tag.unwrap_or("-"), e),
        }

        Some(format_reply(tag, self.separator, &outcome))
    }

    fn find(&self, name: &str) -> Option<&dyn CommandHandler<B>> {
        self.commands
            .iter()
            .find(|(registered, _)| *registered == name)
            .map(|(_, handler)| handler.as_ref())
    }
}

// ───────────────────────────────────────────────────────────────
// Engine (line decoder + table)
// ───────────────────────────────────────────────────────────────

pub struct CommandEngine<B: Board> {
    decoder: LineDecoder,
    table: CommandTable<B>,
    line_break: u8,
}

impl<B: Board> CommandEngine<B> {
    pub fn new(config: &RigConfig) -> Self {
        Self::with_table(config, CommandTable::with_builtin(config.separator))
    }

    pub fn with_table(config: &RigConfig, table: CommandTable<B>) -> Self {
        Self {
            decoder: LineDecoder::new(config.line_break),
            table,
            line_break: config.line_break,
        }
    }

    pub fn table(&self) -> &CommandTable<B> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut CommandTable<B> {
        &mut self.table
    }

    /// Feed raw bytes; `on_reply` receives each complete reply line,
    /// terminator included.  Returns the number of replies produced.
    pub fn feed(
        &mut self,
        data: &[u8],
        rig: &mut Rig<B>,
        mut on_reply: impl FnMut(&str),
    ) -> usize {
        let table = &self.table;
        let line_break = char::from(self.line_break);
        let mut replies = 0;
        self.decoder.feed(data, |line| {
            if let Some(mut reply) = table.dispatch(line, rig) {
                reply.push(line_break);
                on_reply(&reply);
                replies += 1;
            }
        });
        replies
    }

    /// Read what the transport has buffered, up to [`POLL_BUDGET`] bytes,
    /// answering each line before the next is read.  Returns the number of
    /// replies written.
    pub fn poll<T: Transport>(&mut self, transport: &mut T, rig: &mut Rig<B>) -> usize {
        let mut chunk = [0u8; READ_CHUNK];
        let mut budget = POLL_BUDGET;
        let mut replies = 0;

        while budget > 0 {
            let want = budget.min(READ_CHUNK);
            let n = match transport.read(&mut chunk[..want]) {
                Ok(0) => break,
                Ok(n) => n.min(want),
                Err(e) => {
                    warn!("CLI: transport read failed: {:?}", e);
                    break;
                }
            };

            budget -= n;
            replies += self.feed(&chunk[..n], rig, |reply| {
                match transport.write_all(reply.as_bytes()) {
                    Ok(true) => {}
                    Ok(false) => warn!("CLI: transport stalled, reply truncated"),
                    Err(e) => warn!("CLI: transport write failed: {:?}", e),
                }
            });
        }

        if replies > 0 {
            if let Err(e) = transport.flush() {
                warn!("CLI: transport flush failed: {:?}", e);
            }
        }
        replies
    }
}
