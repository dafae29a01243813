//! Engine seam shared by the adapter, the liblouis loader and the host exports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A single UTF-16 code unit, the engine's `widechar`.
pub type CodeUnit = u16;

/// Which engine entry point a call goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Text to braille cells (`lou_translateString`).
    Forward,
    /// Braille cells to text (`lou_backTranslateString`).
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("translation"),
            Direction::Backward => f.write_str("back-translation"),
        }
    }
}

/// Translation mode bits passed through untouched to the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mode(pub i32);

impl Mode {
    pub const NO_CONTRACTIONS: Mode = Mode(1);
    pub const COMPBRL_AT_CURSOR: Mode = Mode(2);
    pub const DOTS_IO: Mode = Mode(4);
    pub const UC_BRL: Mode = Mode(64);
    pub const NO_UNDEFINED: Mode = Mode(128);
    pub const PARTIAL_TRANS: Mode = Mode(256);

    pub fn contains(self, other: Mode) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Mode {
    type Output = Mode;

    fn bitor(self, rhs: Mode) -> Mode {
        Mode(self.0 | rhs.0)
    }
}

/// Lengths reported back by a successful engine call.
///
/// `consumed` is how much of the input the engine got through, `produced` how many
/// output units it wrote. Both come back through the in/out length pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Written {
    pub consumed: usize,
    pub produced: usize,
}

/// Engine log levels, numerically identical to liblouis' `logLevels`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    All = 0,
    Debug = 10000,
    Info = 20000,
    Warn = 30000,
    Error = 40000,
    Fatal = 50000,
    Off = 60000,
}

impl LogLevel {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(LogLevel::All),
            10000 => Some(LogLevel::Debug),
            20000 => Some(LogLevel::Info),
            30000 => Some(LogLevel::Warn),
            40000 => Some(LogLevel::Error),
            50000 => Some(LogLevel::Fatal),
            60000 => Some(LogLevel::Off),
            _ => None,
        }
    }

    /// Closest `log` crate level, `None` for `Off`.
    pub fn to_log(self) -> Option<log::Level> {
        match self {
            LogLevel::All => Some(log::Level::Trace),
            LogLevel::Debug => Some(log::Level::Debug),
            LogLevel::Info => Some(log::Level::Info),
            LogLevel::Warn => Some(log::Level::Warn),
            LogLevel::Error | LogLevel::Fatal => Some(log::Level::Error),
            LogLevel::Off => None,
        }
    }
}

/// Errors raised while bringing an engine up or handing it configuration.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Failed to load engine library {path}: {reason}")]
    LibraryLoad { path: String, reason: String },
    #[error("Symbol not found: {0}")]
    MissingSymbol(String),
    #[error("Engine uses {0}-byte code units, expected 2")]
    UnsupportedCharSize(i32),
    #[error("Path cannot be passed to the engine: {0}")]
    InvalidPath(String),
}

/// The translation engine as an opaque capability.
///
/// Implementations must accept calls from any thread; serialising access to a
/// non-reentrant native library is their job.
pub trait Engine: Send + Sync {
    /// Point the engine at the directory holding its tables.
    fn set_data_path(&self, path: &Path) -> Result<(), EngineError>;

    fn set_log_level(&self, level: LogLevel);

    /// Run one forward or backward pass.
    ///
    /// Returns `None` when the engine signals failure (unknown table, malformed
    /// table, rejected input). `output.len()` is the capacity offered to the engine.
    fn translate(
        &self,
        direction: Direction,
        table: &str,
        input: &[CodeUnit],
        output: &mut [CodeUnit],
        mode: Mode,
    ) -> Option<Written>;

    fn version(&self) -> String;
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn set_data_path(&self, path: &Path) -> Result<(), EngineError> {
        (**self).set_data_path(path)
    }

    fn set_log_level(&self, level: LogLevel) {
        (**self).set_log_level(level)
    }

    fn translate(
        &self,
        direction: Direction,
        table: &str,
        input: &[CodeUnit],
        output: &mut [CodeUnit],
        mode: Mode,
    ) -> Option<Written> {
        (**self).translate(direction, table, input, output, mode)
    }

    fn version(&self) -> String {
        (**self).version()
    }
}
