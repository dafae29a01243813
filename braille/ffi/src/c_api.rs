//! C ABI for native hosts.
//!
//! Text crosses as UTF-16 pointer/length pairs, table ids and paths as
//! NUL-terminated UTF-8. A null text pointer means "absent"; a non-null pointer
//! with length 0 means "empty". Buffers returned here are owned by the bridge and
//! must go back through the matching `louis_bridge_free_*` function.

use api::{CodeUnit, Direction};
use std::ffi::{c_char, CStr, CString};
use std::path::Path;
use std::ptr;

use crate::state::{self, shielded};

unsafe fn opt_str<'a>(raw: *const c_char) -> Option<std::borrow::Cow<'a, str>> {
    if raw.is_null() {
        None
    } else {
        Some(CStr::from_ptr(raw).to_string_lossy())
    }
}

unsafe fn opt_units<'a>(raw: *const CodeUnit, len: usize) -> Option<&'a [CodeUnit]> {
    if raw.is_null() {
        None
    } else {
        Some(std::slice::from_raw_parts(raw, len))
    }
}

unsafe fn into_raw_units(units: Vec<CodeUnit>, out_len: *mut usize) -> *mut CodeUnit {
    let boxed = units.into_boxed_slice();
    if !out_len.is_null() {
        *out_len = boxed.len();
    }
    Box::into_raw(boxed) as *mut CodeUnit
}

fn into_raw_string(text: String) -> *mut c_char {
    match CString::new(text) {
        Ok(c) => c.into_raw(),
        Err(e) => {
            // interior NUL: cut at the first one
            let pos = e.nul_position();
            let mut bytes = e.into_vec();
            bytes.truncate(pos);
            CString::new(bytes).map(CString::into_raw).unwrap_or(ptr::null_mut())
        }
    }
}

unsafe fn run(
    direction: Direction,
    op: &str,
    text: *const CodeUnit,
    text_len: usize,
    table: *const c_char,
    out_len: *mut usize,
) -> *mut CodeUnit {
    shielded(op, ptr::null_mut(), || {
        let input = opt_units(text, text_len);
        let table = opt_str(table);
        match state::translate_units(direction, input, table.as_deref()) {
            Some(units) => into_raw_units(units, out_len),
            None => ptr::null_mut(),
        }
    })
}

/// Set the directory the engine resolves tables against.
///
/// # Safety
///
/// `path` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn louis_bridge_set_data_path(path: *const c_char) -> bool {
    shielded("louis_bridge_set_data_path", false, || match opt_str(path) {
        Some(path) => state::set_data_path(Path::new(path.as_ref())),
        None => {
            state::record("Data path is null");
            false
        }
    })
}

/// Forward-translate `text_len` code units at `text` with `table`.
///
/// Returns null on failure, otherwise a buffer of `*out_len` units.
///
/// # Safety
///
/// `text` must be null or point to `text_len` readable units, `table` must be
/// null or NUL-terminated, `out_len` must be null or writable.
#[no_mangle]
pub unsafe extern "C" fn louis_bridge_translate(
    text: *const CodeUnit,
    text_len: usize,
    table: *const c_char,
    out_len: *mut usize,
) -> *mut CodeUnit {
    run(
        Direction::Forward,
        "louis_bridge_translate",
        text,
        text_len,
        table,
        out_len,
    )
}

/// Back-translate braille cells. Same contract as [`louis_bridge_translate`].
///
/// # Safety
///
/// As for [`louis_bridge_translate`].
#[no_mangle]
pub unsafe extern "C" fn louis_bridge_back_translate(
    cells: *const CodeUnit,
    cells_len: usize,
    table: *const c_char,
    out_len: *mut usize,
) -> *mut CodeUnit {
    run(
        Direction::Backward,
        "louis_bridge_back_translate",
        cells,
        cells_len,
        table,
        out_len,
    )
}

/// Last failure message, or null. Reading clears it.
#[no_mangle]
pub extern "C" fn louis_bridge_last_error() -> *mut c_char {
    shielded("louis_bridge_last_error", ptr::null_mut(), || {
        state::last_error().map_or(ptr::null_mut(), into_raw_string)
    })
}

#[no_mangle]
pub extern "C" fn louis_bridge_is_initialized() -> bool {
    shielded("louis_bridge_is_initialized", false, state::is_initialized)
}

/// Engine version string, or null when the engine cannot be loaded.
#[no_mangle]
pub extern "C" fn louis_bridge_version() -> *mut c_char {
    shielded("louis_bridge_version", ptr::null_mut(), || {
        state::engine_version().map_or(ptr::null_mut(), into_raw_string)
    })
}

/// Release a buffer from `louis_bridge_translate` or `louis_bridge_back_translate`.
///
/// # Safety
///
/// `units`/`len` must be exactly what one of those calls returned, freed once.
#[no_mangle]
pub unsafe extern "C" fn louis_bridge_free_units(units: *mut CodeUnit, len: usize) {
    if units.is_null() {
        return;
    }
    drop(Box::from_raw(ptr::slice_from_raw_parts_mut(units, len)));
}

/// Release a string from `louis_bridge_last_error` or `louis_bridge_version`.
///
/// # Safety
///
/// `text` must come from one of those calls and be freed once.
#[no_mangle]
pub unsafe extern "C" fn louis_bridge_free_string(text: *mut c_char) {
    if text.is_null() {
        return;
    }
    drop(CString::from_raw(text));
}
