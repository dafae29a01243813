//! Runs against an installed liblouis with its stock tables.
//!
//! `cargo test -p liblouis -- --ignored` with `LOUIS_LIBRARY` pointing at the
//! shared library when it is not on the default search path.

use api::{Direction, Engine, Mode};
use liblouis::LibLouis;
use std::path::PathBuf;

fn load() -> LibLouis {
    let _ = env_logger::builder().is_test(true).try_init();
    let path = std::env::var_os("LOUIS_LIBRARY").map(PathBuf::from);
    LibLouis::load(path.as_deref()).expect("liblouis not found")
}

fn units(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

#[test]
#[ignore = "needs liblouis installed"]
fn hello_round_trips_through_grade1() {
    let engine = load();
    assert!(!engine.version().is_empty());

    let input = units("hello");
    let mut cells = vec![0; 4 * input.len() + 1];
    let written = engine
        .translate(Direction::Forward, "en-us-g1.ctb", &input, &mut cells, Mode::default())
        .expect("forward translation failed");
    assert_eq!(written.consumed, input.len());
    assert!(written.produced > 0 && written.produced <= cells.len());
    cells.truncate(written.produced);

    let mut text = vec![0; 4 * cells.len() + 1];
    let written = engine
        .translate(Direction::Backward, "en-us-g1.ctb", &cells, &mut text, Mode::default())
        .expect("back-translation failed");
    text.truncate(written.produced);
    assert_eq!(String::from_utf16(&text).unwrap(), "hello");
}

#[test]
#[ignore = "needs liblouis installed"]
fn unknown_table_fails() {
    let engine = load();
    let input = units("hello");
    let mut out = vec![0; 21];
    assert!(engine
        .translate(Direction::Forward, "nonexistent.ctb", &input, &mut out, Mode::default())
        .is_none());
}
