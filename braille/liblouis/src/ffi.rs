//! liblouis C signatures, as declared in `liblouis.h`.

use std::ffi::{c_char, c_int, c_ushort};

pub type Widechar = u16;
pub type Formtype = c_ushort;

/// `lou_translateString` and `lou_backTranslateString`.
///
/// `inlen` and `outlen` are in/out: capacity going in, units consumed/written coming back.
pub type TranslateFn = unsafe extern "C" fn(
    table_list: *const c_char,
    inbuf: *const Widechar,
    inlen: *mut c_int,
    outbuf: *mut Widechar,
    outlen: *mut c_int,
    typeform: *mut Formtype,
    spacing: *mut c_char,
    mode: c_int,
) -> c_int;

pub type SetDataPathFn = unsafe extern "C" fn(path: *const c_char) -> *mut c_char;
pub type SetLogLevelFn = unsafe extern "C" fn(level: c_int);
pub type LogCallback = extern "C" fn(level: c_int, message: *const c_char);
pub type RegisterLogCallbackFn = unsafe extern "C" fn(callback: Option<LogCallback>);
pub type VersionFn = unsafe extern "C" fn() -> *const c_char;
pub type CharSizeFn = unsafe extern "C" fn() -> c_int;
pub type FreeFn = unsafe extern "C" fn();
