//! Verbosity-gated diagnostics for the selection walk.
//!
//! The walk narrates itself at three levels above silent: committed winners
//! and conflict fallbacks, per-candidate evaluation, and adjustment
//! arithmetic. Output goes to stderr in production; tests hand in a byte
//! sink to observe exactly what a given verbosity emits - including nothing
//! at all.

use std::fmt;
use std::io::{self, Write};

/// How much of the selection walk is narrated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Errors only.
    Silent = 0,
    /// Committed winners and conflict fallbacks.
    Decisions = 1,
    /// Pool composition per group.
    Candidates = 2,
    /// Busyness adjustment and conflict-check detail.
    Debug = 3,
}

impl Level {
    /// Map the config's numeric verbosity onto a level; values past the
    /// known range saturate at the most talkative one.
    pub fn from_verbosity(verbosity: u8) -> Self {
        match verbosity {
            0 => Level::Silent,
            1 => Level::Decisions,
            2 => Level::Candidates,
            _ => Level::Debug,
        }
    }
}

enum Sink<'w> {
    Stderr,
    Writer(&'w mut dyn Write),
}

/// Destination for walk diagnostics.
///
/// Lines are emitted through [`walk_log!`], which skips formatting entirely
/// for levels the verbosity filters out.
pub struct WalkLog<'w> {
    level: Level,
    sink: Sink<'w>,
}

impl WalkLog<'static> {
    /// Production log: write to stderr at the config's verbosity.
    pub fn stderr(verbosity: u8) -> Self {
        Self {
            level: Level::from_verbosity(verbosity),
            sink: Sink::Stderr,
        }
    }
}

impl<'w> WalkLog<'w> {
    /// Capture output in `sink` instead of stderr.
    pub fn to_writer(verbosity: u8, sink: &'w mut dyn Write) -> Self {
        Self {
            level: Level::from_verbosity(verbosity),
            sink: Sink::Writer(sink),
        }
    }

    /// Whether a line at `level` would be emitted. Nothing is ever emitted
    /// at `Silent`.
    pub fn enabled(&self, level: Level) -> bool {
        level != Level::Silent && level <= self.level
    }

    /// Emit one line. Diagnostics are best-effort: a failed write must not
    /// abort the walk.
    pub fn write_line(&mut self, args: fmt::Arguments<'_>) {
        let _ = match &mut self.sink {
            Sink::Stderr => writeln!(io::stderr(), "{args}"),
            Sink::Writer(writer) => writeln!(writer, "{args}"),
        };
    }
}

/// Emit one diagnostic line at `$level`.
///
/// Formatting is lazy: the arguments are not evaluated unless the log's
/// verbosity admits the level.
#[macro_export]
macro_rules! walk_log {
    ($log:expr, $level:expr, $($arg:tt)*) => {
        if $log.enabled($level) {
            $log.write_line(format_args!($($arg)*));
        }
    };
}
