//! JNI entry points for `com.henhen1227.nativeliblouis.NativeLiblouisModule`.
//!
//! Text moves as raw UTF-16 through `GetStringChars`/`NewString`, so the code
//! units the JVM holds are exactly what the engine sees and what comes back.

use api::{CodeUnit, Direction};
use jni::objects::{JClass, JString};
use jni::sys::{jboolean, jsize, jstring, JNI_FALSE, JNI_TRUE};
use jni::JNIEnv;
use std::path::Path;
use std::ptr;

use crate::state::{self, shielded};

fn read_string(env: &mut JNIEnv<'_>, s: &JString<'_>) -> Option<String> {
    if s.as_raw().is_null() {
        return None;
    }
    match env.get_string(s) {
        Ok(value) => Some(value.into()),
        Err(e) => {
            state::record(format!("Failed to read Java string: {}", e));
            None
        }
    }
}

fn read_units(env: &JNIEnv<'_>, s: &JString<'_>) -> Option<Vec<CodeUnit>> {
    let obj = s.as_raw();
    if obj.is_null() {
        return None;
    }
    let raw = env.get_raw();
    unsafe {
        let iface = &**raw;
        let (Some(length), Some(chars), Some(release)) = (
            iface.GetStringLength,
            iface.GetStringChars,
            iface.ReleaseStringChars,
        ) else {
            return None;
        };
        let len = usize::try_from(length(raw, obj)).unwrap_or(0);
        let data = chars(raw, obj, ptr::null_mut());
        if data.is_null() {
            return None;
        }
        let units = std::slice::from_raw_parts(data, len).to_vec();
        release(raw, obj, data);
        Some(units)
    }
}

fn new_string(env: &JNIEnv<'_>, units: &[CodeUnit]) -> jstring {
    let Ok(len) = jsize::try_from(units.len()) else {
        state::record(format!("Result of {} units is too long for a Java string", units.len()));
        return ptr::null_mut();
    };
    let raw = env.get_raw();
    unsafe {
        match (**raw).NewString {
            Some(new_string) => new_string(raw, units.as_ptr(), len),
            None => ptr::null_mut(),
        }
    }
}

fn run(env: &mut JNIEnv<'_>, direction: Direction, text: &JString<'_>, table: &JString<'_>) -> jstring {
    let input = read_units(env, text);
    let table = read_string(env, table);
    match state::translate_units(direction, input.as_deref(), table.as_deref()) {
        Some(units) => new_string(env, &units),
        None => ptr::null_mut(),
    }
}

#[no_mangle]
pub extern "system" fn Java_com_henhen1227_nativeliblouis_NativeLiblouisModule_nativeSetDataPath<
    'local,
>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    path: JString<'local>,
) -> jboolean {
    shielded("nativeSetDataPath", JNI_FALSE, || {
        // a null path is handed on as "", matching the Kotlin module's contract
        let path = read_string(&mut env, &path).unwrap_or_default();
        if state::set_data_path(Path::new(&path)) {
            JNI_TRUE
        } else {
            JNI_FALSE
        }
    })
}

#[no_mangle]
pub extern "system" fn Java_com_henhen1227_nativeliblouis_NativeLiblouisModule_nativeTranslate<
    'local,
>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    text: JString<'local>,
    table: JString<'local>,
) -> jstring {
    shielded("nativeTranslate", ptr::null_mut(), || {
        run(&mut env, Direction::Forward, &text, &table)
    })
}

#[no_mangle]
pub extern "system" fn Java_com_henhen1227_nativeliblouis_NativeLiblouisModule_nativeBackTranslate<
    'local,
>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    dots: JString<'local>,
    table: JString<'local>,
) -> jstring {
    shielded("nativeBackTranslate", ptr::null_mut(), || {
        run(&mut env, Direction::Backward, &dots, &table)
    })
}

#[no_mangle]
pub extern "system" fn Java_com_henhen1227_nativeliblouis_NativeLiblouisModule_nativeGetLastError<
    'local,
>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jstring {
    shielded("nativeGetLastError", ptr::null_mut(), || {
        match state::last_error() {
            Some(message) => env
                .new_string(message)
                .map(JString::into_raw)
                .unwrap_or(ptr::null_mut()),
            None => ptr::null_mut(),
        }
    })
}
