use api::{CodeUnit, Direction, Engine, Mode};
use log::{debug, error, warn};
use std::borrow::Cow;

use crate::sanitize::{sanitize, Sanitized};
use crate::wide::{from_wide, to_wide, EncodingError};
use crate::{BufferPolicy, TableResolver};

const SPACE: CodeUnit = 0x0020;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error("Input {subject} or table is null")]
    NullInput { subject: &'static str },
    #[error("liblouis {direction} failed for table: {table}")]
    EngineFailed { direction: Direction, table: String },
    #[error("liblouis {direction} output truncated at {capacity} units for table: {table}")]
    Truncated {
        direction: Direction,
        table: String,
        capacity: usize,
    },
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslateOptions {
    pub buffer: BufferPolicy,
    pub mode: Mode,
    pub sanitize_blank_cells: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            buffer: BufferPolicy::default(),
            mode: Mode::default(),
            sanitize_blank_cells: true,
        }
    }
}

/// Drives one engine call per request: validation, sizing, invocation, retry.
pub struct Translator<'e> {
    engine: &'e dyn Engine,
    options: TranslateOptions,
    tables: Option<TableResolver>,
}

impl<'e> Translator<'e> {
    pub fn new(engine: &'e dyn Engine, options: TranslateOptions) -> Self {
        Self {
            engine,
            options,
            tables: None,
        }
    }

    /// Resolve relative table ids against a tables directory before calling the engine.
    pub fn with_tables(mut self, tables: Option<TableResolver>) -> Self {
        self.tables = tables;
        self
    }

    pub fn translate(&self, text: Option<&str>, table: Option<&str>) -> Result<String, TranslateError> {
        self.run_str(Direction::Forward, text, table)
    }

    pub fn back_translate(
        &self,
        cells: Option<&str>,
        table: Option<&str>,
    ) -> Result<String, TranslateError> {
        self.run_str(Direction::Backward, cells, table)
    }

    fn run_str(
        &self,
        direction: Direction,
        text: Option<&str>,
        table: Option<&str>,
    ) -> Result<String, TranslateError> {
        let units = text.map(|t| to_wide(Some(t)));
        let output = self.run(direction, units.as_deref(), table)?;
        Ok(from_wide(&output, output.len())?)
    }

    /// Translate raw code units. Absent text or table fails before the engine is touched.
    pub fn run(
        &self,
        direction: Direction,
        input: Option<&[CodeUnit]>,
        table: Option<&str>,
    ) -> Result<Vec<CodeUnit>, TranslateError> {
        match screen(direction, input, table, self.options.sanitize_blank_cells)? {
            Screened::Done(units) => Ok(units),
            Screened::Pending { input, table } => self.invoke(direction, &input, table),
        }
    }

    /// Engine call with retry-on-growth for input that already passed [`screen`].
    pub fn invoke(
        &self,
        direction: Direction,
        input: &[CodeUnit],
        table: &str,
    ) -> Result<Vec<CodeUnit>, TranslateError> {
        let resolved = match &self.tables {
            Some(tables) => tables.resolve(table),
            None => table.to_string(),
        };

        debug!(
            "Running {} with table: {}, input length: {}",
            direction,
            resolved,
            input.len()
        );

        let policy = self.options.buffer;
        let mut capacity = policy.initial_capacity(input.len());
        loop {
            let mut output = vec![0; capacity];
            let Some(written) =
                self.engine
                    .translate(direction, &resolved, input, &mut output, self.options.mode)
            else {
                let err = TranslateError::EngineFailed {
                    direction,
                    table: table.to_string(),
                };
                error!("{}", err);
                return Err(err);
            };

            let produced = written.produced.min(output.len());
            if written.produced > output.len() {
                warn!(
                    "Engine reported {} units for a {} unit buffer",
                    written.produced,
                    output.len()
                );
            }

            let stopped_early = written.consumed < input.len();
            if stopped_early && is_full(produced, capacity) {
                match policy.grow(capacity, input.len()) {
                    Some(next) => {
                        debug!(
                            "Engine stopped after {}/{} input units, growing buffer {} -> {}",
                            written.consumed,
                            input.len(),
                            capacity,
                            next
                        );
                        capacity = next;
                        continue;
                    }
                    None => {
                        let err = TranslateError::Truncated {
                            direction,
                            table: table.to_string(),
                            capacity,
                        };
                        error!("{}", err);
                        return Err(err);
                    }
                }
            }
            if stopped_early {
                debug!(
                    "Engine stopped after {}/{} input units with {} units free",
                    written.consumed,
                    input.len(),
                    capacity - produced
                );
            }

            output.truncate(produced);
            debug!("{} successful, output length: {}", direction, produced);
            return Ok(output);
        }
    }
}

/// What is left of a request once the checks that need no engine have run.
#[derive(Debug, PartialEq, Eq)]
pub enum Screened<'a> {
    /// Answered without the engine: empty or blank-only input.
    Done(Vec<CodeUnit>),
    /// Input for the engine, sanitised when enabled.
    Pending {
        input: Cow<'a, [CodeUnit]>,
        table: &'a str,
    },
}

/// Validate and sanitise a request without touching the engine.
pub fn screen<'a>(
    direction: Direction,
    input: Option<&'a [CodeUnit]>,
    table: Option<&'a str>,
    sanitize_blank_cells: bool,
) -> Result<Screened<'a>, TranslateError> {
    let (Some(input), Some(table)) = (input, table) else {
        let err = TranslateError::NullInput {
            subject: match direction {
                Direction::Forward => "text",
                Direction::Backward => "dots",
            },
        };
        error!("{}", err);
        return Err(err);
    };

    if input.is_empty() {
        return Ok(Screened::Done(Vec::new()));
    }

    let input = if sanitize_blank_cells {
        match sanitize(input) {
            Sanitized::Blank(len) => return Ok(Screened::Done(vec![SPACE; len])),
            Sanitized::Text(text) => text,
        }
    } else {
        Cow::Borrowed(input)
    };
    Ok(Screened::Pending { input, table })
}

// Free space below this many units counts as a full buffer: no single engine rule
// is expected to emit more at once.
const FULL_SLACK: usize = 16;

fn is_full(produced: usize, capacity: usize) -> bool {
    capacity.saturating_sub(produced) < FULL_SLACK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_input_is_rejected_by_direction() {
        assert_eq!(
            screen(Direction::Forward, None, Some("en-us.ctb"), true),
            Err(TranslateError::NullInput { subject: "text" })
        );
        assert_eq!(
            screen(Direction::Backward, Some(&[0x2813][..]), None, true),
            Err(TranslateError::NullInput { subject: "dots" })
        );
    }

    #[test]
    fn empty_and_blank_input_need_no_engine() {
        assert_eq!(
            screen(Direction::Forward, Some(&[][..]), Some("en-us.ctb"), true),
            Ok(Screened::Done(Vec::new()))
        );
        assert_eq!(
            screen(Direction::Backward, Some(&[0x2800, 0x2800][..]), Some("en-us.ctb"), true),
            Ok(Screened::Done(vec![SPACE, SPACE]))
        );
        assert!(matches!(
            screen(Direction::Backward, Some(&[0x2800][..]), Some("en-us.ctb"), false),
            Ok(Screened::Pending { .. })
        ));
    }

    #[test]
    fn full_means_less_than_slack_free() {
        assert!(is_full(8, 13));
        assert!(is_full(21, 21));
        assert!(!is_full(5, 4001));
    }
}
