use api::{CodeUnit, Direction, Engine};
use common::{screen, BridgeConfig, ErrorSlot, Screened, TableResolver, Translator};
use liblouis::LibLouis;
use log::{error, info};
use once_cell::sync::OnceCell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::BridgeError;

static CONFIG: OnceCell<BridgeConfig> = OnceCell::new();
static ENGINE: OnceCell<Box<dyn Engine>> = OnceCell::new();
static DATA_PATH: RwLock<Option<PathBuf>> = RwLock::new(None);
static TABLES: RwLock<Option<TableResolver>> = RwLock::new(None);
static LAST_ERROR: ErrorSlot = ErrorSlot::new();

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

fn config() -> &'static BridgeConfig {
    CONFIG.get_or_init(|| {
        BridgeConfig::from_env().unwrap_or_else(|e| {
            error!("{:#}. Using defaults.", e);
            BridgeConfig::default()
        })
    })
}

/// Use `engine` instead of loading liblouis. Only possible before first use.
pub fn install_engine(engine: Box<dyn Engine>) -> Result<(), BridgeError> {
    ENGINE
        .set(engine)
        .map_err(|_| BridgeError::AlreadyInstalled)?;
    if let Some(engine) = ENGINE.get() {
        prepare(engine.as_ref());
    }
    Ok(())
}

fn engine() -> Result<&'static dyn Engine, BridgeError> {
    let engine = ENGINE.get_or_try_init(|| {
        let lib = LibLouis::load(config().library_path.as_deref())?;
        info!("Translation engine loaded from {:?}", lib.path());
        prepare(&lib);
        Ok::<_, BridgeError>(Box::new(lib) as Box<dyn Engine>)
    })?;
    Ok(engine.as_ref())
}

// Applies configured log level and data path to a freshly loaded engine.
fn prepare(engine: &dyn Engine) {
    let config = config();
    engine.set_log_level(config.log_level);
    if let Some(path) = &config.data_path {
        if let Err(e) = apply_data_path(engine, path) {
            error!("Configured data path rejected: {}", e);
        }
    }
}

fn apply_data_path(engine: &dyn Engine, path: &Path) -> Result<(), api::EngineError> {
    engine.set_data_path(path)?;
    let tables = TableResolver::for_data_path(path);
    match &tables {
        Some(t) => info!("Tables directory: {:?}", t.tables_dir()),
        None => info!("No tables directory under {:?}, table ids passed through", path),
    }
    *write(&DATA_PATH) = Some(path.to_path_buf());
    *write(&TABLES) = tables;
    Ok(())
}

pub(crate) fn record(message: impl Into<String>) {
    let message = message.into();
    error!("{}", message);
    LAST_ERROR.set(message);
}

/// Run an export body, turning a panic into `fallback` and a recorded error.
pub(crate) fn shielded<T>(op: &str, fallback: T, body: impl FnOnce() -> T) -> T {
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(value) => value,
        Err(_) => {
            record(format!("Internal error in {}", op));
            fallback
        }
    }
}

/// Point the engine at its table directory. Re-settable.
///
/// Returns `false` only when the engine cannot be loaded or the path cannot be
/// handed to it; the path itself is not checked.
pub fn set_data_path(path: &Path) -> bool {
    let engine = match engine() {
        Ok(engine) => engine,
        Err(e) => {
            record(e.to_string());
            return false;
        }
    };
    engine.set_log_level(config().log_level);
    match apply_data_path(engine, path) {
        Ok(()) => {
            info!("Liblouis data path set successfully");
            true
        }
        Err(e) => {
            record(e.to_string());
            false
        }
    }
}

/// Translate code units. `None` on failure, with the reason in [`last_error`].
///
/// Absent, empty and blank-only input is settled before the engine is loaded.
pub fn translate_units(
    direction: Direction,
    input: Option<&[CodeUnit]>,
    table: Option<&str>,
) -> Option<Vec<CodeUnit>> {
    let options = config().translate_options();
    let (input, table) = match screen(direction, input, table, options.sanitize_blank_cells) {
        Ok(Screened::Done(units)) => return Some(units),
        Ok(Screened::Pending { input, table }) => (input, table),
        Err(e) => {
            LAST_ERROR.set(e.to_string());
            return None;
        }
    };

    let engine = match engine() {
        Ok(engine) => engine,
        Err(e) => {
            record(e.to_string());
            return None;
        }
    };
    let tables = read(&TABLES).clone();
    let translator = Translator::new(engine, options).with_tables(tables);
    match translator.invoke(direction, &input, table) {
        Ok(units) => Some(units),
        Err(e) => {
            LAST_ERROR.set(e.to_string());
            None
        }
    }
}

pub fn translate(text: Option<&str>, table: Option<&str>) -> Option<String> {
    translate_str(Direction::Forward, text, table)
}

pub fn back_translate(cells: Option<&str>, table: Option<&str>) -> Option<String> {
    translate_str(Direction::Backward, cells, table)
}

fn translate_str(direction: Direction, text: Option<&str>, table: Option<&str>) -> Option<String> {
    let input = text.map(|t| common::wide::to_wide(Some(t)));
    let output = translate_units(direction, input.as_deref(), table)?;
    match common::wide::from_wide(&output, output.len()) {
        Ok(text) => Some(text),
        Err(e) => {
            record(e.to_string());
            None
        }
    }
}

/// Read and clear the last failure message.
pub fn last_error() -> Option<String> {
    LAST_ERROR.take()
}

/// Whether a data path has been set.
pub fn is_initialized() -> bool {
    read(&DATA_PATH).is_some()
}

pub fn engine_version() -> Option<String> {
    match engine() {
        Ok(engine) => Some(engine.version()),
        Err(e) => {
            record(e.to_string());
            None
        }
    }
}
