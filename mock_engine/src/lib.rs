// Deterministic stand-in for liblouis used by the test suites.
//
// Known tables:
//   en-us.ctb, en-us-g1.ctb  letters as six-dot cells, dot 6 as capital indicator
//   contract.ctb             as above, plus "the" and "and" as single cells
//   expand8.ctb              every input unit becomes eight full cells
//   overreport.ctb           grade 1, but claims more output than the buffer holds
//   halfway.ctb              grade 1, but stops after half the input with room to spare
// Any other table name fails the call, like an unresolvable liblouis table.

use api::{CodeUnit, Direction, Engine, EngineError, LogLevel, Mode, Written};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const CELL_BASE: CodeUnit = 0x2800;
const CAPITAL: CodeUnit = 0x2820;
const FULL_CELL: CodeUnit = 0x283F;
const SPACE: CodeUnit = 0x0020;

/// Dot patterns for a-z.
const LETTERS: [u8; 26] = [
    0x01, 0x03, 0x09, 0x19, 0x11, 0x0B, 0x1B, 0x13, 0x0A, 0x1A, 0x05, 0x07, 0x0D, 0x1D, 0x15,
    0x0F, 0x1F, 0x17, 0x0E, 0x1E, 0x25, 0x27, 0x3A, 0x2D, 0x3D, 0x35,
];

const CONTRACTIONS: [(&str, u8); 2] = [("the", 0x2E), ("and", 0x2F)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Table {
    Grade1,
    Contracted,
    Expand8,
    OverReport,
    Halfway,
}

impl Table {
    fn lookup(name: &str) -> Option<Self> {
        let file = Path::new(name.trim()).file_name()?.to_str()?;
        match file {
            "en-us.ctb" | "en-us-g1.ctb" => Some(Table::Grade1),
            "contract.ctb" => Some(Table::Contracted),
            "expand8.ctb" => Some(Table::Expand8),
            "overreport.ctb" => Some(Table::OverReport),
            "halfway.ctb" => Some(Table::Halfway),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct MockEngine {
    calls: AtomicUsize,
    data_path: Mutex<Option<PathBuf>>,
    log_level: Mutex<Option<LogLevel>>,
    last_table: Mutex<Option<String>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of translate calls that reached the engine.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn data_path(&self) -> Option<PathBuf> {
        self.data_path.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn log_level(&self) -> Option<LogLevel> {
        *self.log_level.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Table string exactly as the last call passed it.
    pub fn last_table(&self) -> Option<String> {
        self.last_table.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Engine for MockEngine {
    fn set_data_path(&self, path: &Path) -> Result<(), EngineError> {
        *self.data_path.lock().unwrap_or_else(|e| e.into_inner()) = Some(path.to_path_buf());
        Ok(())
    }

    fn set_log_level(&self, level: LogLevel) {
        *self.log_level.lock().unwrap_or_else(|e| e.into_inner()) = Some(level);
    }

    fn translate(
        &self,
        direction: Direction,
        table: &str,
        input: &[CodeUnit],
        output: &mut [CodeUnit],
        _mode: Mode,
    ) -> Option<Written> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_table.lock().unwrap_or_else(|e| e.into_inner()) = Some(table.to_string());

        let mut tables = table.split(',').map(Table::lookup);
        let Some(Some(kind)) = tables.next() else {
            warn!("Cannot resolve table '{}'", table);
            return None;
        };
        if tables.any(|t| t.is_none()) {
            warn!("Cannot resolve table '{}'", table);
            return None;
        }

        let input = match kind {
            Table::Halfway => &input[..input.len() / 2],
            _ => input,
        };
        let mut out = Output::new(output);
        let consumed = match (kind, direction) {
            (Table::Expand8, _) => expand(input, &mut out),
            (_, Direction::Forward) => forward(input, &mut out, kind == Table::Contracted),
            (_, Direction::Backward) => backward(input, &mut out, kind == Table::Contracted),
        };

        let produced = if kind == Table::OverReport {
            out.buf.len() + 10
        } else {
            out.len
        };
        debug!("mock {} consumed {} produced {}", direction, consumed, produced);
        Some(Written { consumed, produced })
    }

    fn version(&self) -> String {
        "mock-1.0".to_string()
    }
}

struct Output<'a> {
    buf: &'a mut [CodeUnit],
    len: usize,
}

impl<'a> Output<'a> {
    fn new(buf: &'a mut [CodeUnit]) -> Self {
        Self { buf, len: 0 }
    }

    /// Write all of `units` or nothing.
    fn emit(&mut self, units: &[CodeUnit]) -> bool {
        if self.len + units.len() > self.buf.len() {
            return false;
        }
        self.buf[self.len..self.len + units.len()].copy_from_slice(units);
        self.len += units.len();
        true
    }
}

fn letter_cell(unit: CodeUnit) -> Option<CodeUnit> {
    let c = char::from_u32(u32::from(unit))?;
    if !c.is_ascii_alphabetic() {
        return None;
    }
    let idx = (c.to_ascii_lowercase() as u8 - b'a') as usize;
    Some(CELL_BASE + CodeUnit::from(LETTERS[idx]))
}

fn forward(input: &[CodeUnit], out: &mut Output<'_>, contracted: bool) -> usize {
    let mut i = 0;
    'outer: while i < input.len() {
        if contracted {
            for (word, dots) in CONTRACTIONS {
                let word: Vec<CodeUnit> = word.encode_utf16().collect();
                if input[i..].starts_with(&word) {
                    if !out.emit(&[CELL_BASE + CodeUnit::from(dots)]) {
                        break 'outer;
                    }
                    i += word.len();
                    continue 'outer;
                }
            }
        }

        let unit = input[i];
        let upper = unit < 0x80 && (unit as u8).is_ascii_uppercase();
        let ok = match letter_cell(unit) {
            Some(cell) if upper => out.emit(&[CAPITAL, cell]),
            Some(cell) => out.emit(&[cell]),
            None => out.emit(&[unit]),
        };
        if !ok {
            break;
        }
        i += 1;
    }
    i
}

fn backward(input: &[CodeUnit], out: &mut Output<'_>, contracted: bool) -> usize {
    let mut capital = false;
    let mut i = 0;
    while i < input.len() {
        let unit = input[i];
        if unit == CAPITAL {
            capital = true;
            i += 1;
            continue;
        }

        let mut text: Vec<CodeUnit> = Vec::new();
        if unit == CELL_BASE {
            text.push(SPACE);
        } else if let Some(idx) = LETTERS.iter().position(|&d| CELL_BASE + CodeUnit::from(d) == unit) {
            let letter = b'a' + idx as u8;
            let letter = if capital { letter.to_ascii_uppercase() } else { letter };
            text.push(CodeUnit::from(letter));
        } else if let Some((word, _)) = CONTRACTIONS
            .iter()
            .find(|(_, d)| contracted && CELL_BASE + CodeUnit::from(*d) == unit)
        {
            text.extend(word.encode_utf16());
        } else {
            text.push(unit);
        }

        if !out.emit(&text) {
            // leave a pending capital indicator unconsumed too
            return if capital { i - 1 } else { i };
        }
        capital = false;
        i += 1;
    }
    i
}

fn expand(input: &[CodeUnit], out: &mut Output<'_>) -> usize {
    for (i, _) in input.iter().enumerate() {
        if !out.emit(&[FULL_CELL; 8]) {
            return i;
        }
    }
    input.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(s: &str) -> Vec<CodeUnit> {
        s.encode_utf16().collect()
    }

    fn run(engine: &MockEngine, dir: Direction, table: &str, input: &str, cap: usize) -> Option<(Vec<CodeUnit>, usize)> {
        let input = units(input);
        let mut out = vec![0; cap];
        let written = engine.translate(dir, table, &input, &mut out, Mode::default())?;
        out.truncate(written.produced.min(cap));
        Some((out, written.consumed))
    }

    #[test]
    fn hello_in_grade1() {
        let engine = MockEngine::new();
        let (out, consumed) = run(&engine, Direction::Forward, "en-us.ctb", "hello", 21).unwrap();
        assert_eq!(out, units("\u{2813}\u{2811}\u{2807}\u{2807}\u{2815}"));
        assert_eq!(consumed, 5);
        assert_eq!(engine.calls(), 1);
    }

    #[test]
    fn capitals_round_trip() {
        let engine = MockEngine::new();
        let (cells, _) = run(&engine, Direction::Forward, "en-us.ctb", "Hi", 9).unwrap();
        assert_eq!(cells, vec![CAPITAL, 0x2813, 0x280A]);
        let text = String::from_utf16(&cells).unwrap();
        let (back, _) = run(&engine, Direction::Backward, "en-us.ctb", &text, 13).unwrap();
        assert_eq!(String::from_utf16(&back).unwrap(), "Hi");
    }

    #[test]
    fn unknown_table_fails() {
        let engine = MockEngine::new();
        assert!(run(&engine, Direction::Forward, "nonexistent.ctb", "hello", 21).is_none());
        assert!(run(&engine, Direction::Forward, "en-us.ctb,nope.ctb", "hello", 21).is_none());
        assert!(run(&engine, Direction::Forward, "/data/tables/en-us.ctb", "hello", 21).is_some());
    }

    #[test]
    fn expand8_stops_when_full() {
        let engine = MockEngine::new();
        let (out, consumed) = run(&engine, Direction::Forward, "expand8.ctb", "abc", 13).unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn contractions_shrink_output() {
        let engine = MockEngine::new();
        let (out, consumed) = run(&engine, Direction::Forward, "contract.ctb", "the", 13).unwrap();
        assert_eq!(out, vec![0x282E]);
        assert_eq!(consumed, 3);
    }
}
