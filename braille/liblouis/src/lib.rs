//! liblouis loaded at runtime and exposed as an [`api::Engine`].

pub mod ffi;

use api::{CodeUnit, Direction, Engine, EngineError, LogLevel, Mode, Written};
use ffi::{
    CharSizeFn, FreeFn, LogCallback, RegisterLogCallbackFn, SetDataPathFn, SetLogLevelFn,
    TranslateFn, VersionFn,
};
use libloading::Library;
use log::{debug, info, warn};
use std::ffi::{c_char, c_int, CStr, CString};
use std::path::{Path, PathBuf};
use std::ptr;
use std::sync::{Mutex, MutexGuard};

/// Library file names tried, in order, when no explicit path is configured.
pub fn default_library_names() -> Vec<PathBuf> {
    let names: &[&str] = if cfg!(target_os = "windows") {
        &["liblouis.dll", "liblouis-20.dll", "louis.dll"]
    } else if cfg!(target_os = "macos") {
        &["liblouis.20.dylib", "liblouis.dylib"]
    } else {
        &["liblouis.so.20", "liblouis.so"]
    };
    names.iter().map(PathBuf::from).collect()
}

// Routes liblouis' own log output into the `log` facade.
extern "C" fn bridge_logger(level: c_int, message: *const c_char) {
    if message.is_null() {
        return;
    }
    let message = unsafe { CStr::from_ptr(message).to_string_lossy() };
    match LogLevel::from_raw(level) {
        Some(level) => {
            if let Some(level) = level.to_log() {
                log::log!(target: "liblouis", level, "{}", message);
            }
        }
        None => info!(target: "liblouis", "[Unknown Level {}] {}", level, message),
    }
}

pub struct LibLouis {
    path: PathBuf,
    translate: TranslateFn,
    back_translate: TranslateFn,
    set_data_path: SetDataPathFn,
    set_log_level: SetLogLevelFn,
    version: VersionFn,
    free: Option<FreeFn>,
    // liblouis keeps translation state in statics; one call at a time.
    call_lock: Mutex<()>,
    _lib: Library,
}

impl LibLouis {
    /// Load from `path`, or try [`default_library_names`] when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        if let Some(path) = path {
            return Self::open(path);
        }
        let mut last_err = None;
        for candidate in default_library_names() {
            match Self::open(&candidate) {
                Ok(lib) => return Ok(lib),
                Err(e) => {
                    debug!("{}", e);
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| EngineError::LibraryLoad {
            path: "liblouis".to_string(),
            reason: "no candidate library names".to_string(),
        }))
    }

    pub fn open(path: &Path) -> Result<Self, EngineError> {
        unsafe {
            let lib = Library::new(path).map_err(|e| EngineError::LibraryLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

            let translate: TranslateFn = symbol(&lib, "lou_translateString")?;
            let back_translate: TranslateFn = symbol(&lib, "lou_backTranslateString")?;
            let set_data_path: SetDataPathFn = symbol(&lib, "lou_setDataPath")?;
            let set_log_level: SetLogLevelFn = symbol(&lib, "lou_setLogLevel")?;
            let version: VersionFn = symbol(&lib, "lou_version")?;
            let free: Option<FreeFn> = symbol(&lib, "lou_free").ok();

            check_char_size(&lib)?;

            match symbol::<RegisterLogCallbackFn>(&lib, "lou_registerLogCallback") {
                Ok(register) => register(Some(bridge_logger as LogCallback)),
                Err(_) => warn!("lou_registerLogCallback missing, engine logs stay on stderr"),
            }

            let engine = Self {
                path: path.to_path_buf(),
                translate,
                back_translate,
                set_data_path,
                set_log_level,
                version,
                free,
                call_lock: Mutex::new(()),
                _lib: lib,
            };
            info!("Loaded liblouis {} from {:?}", engine.version(), path);
            Ok(engine)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.call_lock.lock().unwrap_or_else(|e| e.into_inner())
    }
}

unsafe fn symbol<T: Copy>(lib: &Library, name: &str) -> Result<T, EngineError> {
    lib.get::<T>(name.as_bytes())
        .map(|s| *s)
        .map_err(|_| EngineError::MissingSymbol(name.to_string()))
}

// Only 16-bit widechar builds match `CodeUnit`.
unsafe fn check_char_size(lib: &Library) -> Result<(), EngineError> {
    let char_size: CharSizeFn = symbol(lib, "lou_charSize")?;
    match char_size() {
        2 => Ok(()),
        size => Err(EngineError::UnsupportedCharSize(size)),
    }
}

impl Engine for LibLouis {
    fn set_data_path(&self, path: &Path) -> Result<(), EngineError> {
        let raw = path
            .to_str()
            .and_then(|p| CString::new(p).ok())
            .ok_or_else(|| EngineError::InvalidPath(path.display().to_string()))?;
        info!("Setting liblouis data path to: {:?}", path);
        let _guard = self.lock();
        unsafe {
            (self.set_data_path)(raw.as_ptr());
        }
        Ok(())
    }

    fn set_log_level(&self, level: LogLevel) {
        let _guard = self.lock();
        unsafe { (self.set_log_level)(level as c_int) }
    }

    fn translate(
        &self,
        direction: Direction,
        table: &str,
        input: &[CodeUnit],
        output: &mut [CodeUnit],
        mode: Mode,
    ) -> Option<Written> {
        let Ok(table_list) = CString::new(table) else {
            warn!("Table id contains a NUL byte: {:?}", table);
            return None;
        };
        let Ok(mut in_len) = c_int::try_from(input.len()) else {
            warn!("Input of {} units is too long for liblouis", input.len());
            return None;
        };
        let mut out_len = c_int::try_from(output.len()).unwrap_or(c_int::MAX);

        let entry = match direction {
            Direction::Forward => self.translate,
            Direction::Backward => self.back_translate,
        };

        let _guard = self.lock();
        let ok = unsafe {
            entry(
                table_list.as_ptr(),
                input.as_ptr(),
                &mut in_len,
                output.as_mut_ptr(),
                &mut out_len,
                ptr::null_mut(),
                ptr::null_mut(),
                mode.0,
            )
        };
        if ok == 0 {
            return None;
        }
        Some(Written {
            consumed: usize::try_from(in_len).unwrap_or(0),
            produced: usize::try_from(out_len).unwrap_or(0),
        })
    }

    fn version(&self) -> String {
        let raw = unsafe { (self.version)() };
        if raw.is_null() {
            return "unknown".to_string();
        }
        unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned()
    }
}

impl Drop for LibLouis {
    fn drop(&mut self) {
        if let Some(free) = self.free {
            let _guard = self.lock();
            unsafe { free() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_are_platform_names() {
        let names = default_library_names();
        assert!(!names.is_empty());
        for name in names {
            let name = name.to_string_lossy().to_string();
            assert!(name.contains("louis"), "{}", name);
        }
    }

    #[test]
    fn missing_library_is_a_load_error() {
        let err = LibLouis::open(Path::new("/nonexistent/liblouis.so")).err().unwrap();
        match err {
            EngineError::LibraryLoad { path, .. } => assert!(path.contains("nonexistent")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn library_without_char_size_is_rejected() {
        let lib: Library = libloading::os::unix::Library::this().into();
        match unsafe { check_char_size(&lib) } {
            Err(EngineError::MissingSymbol(name)) => assert_eq!(name, "lou_charSize"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn logger_tolerates_null_and_unknown_levels() {
        let _ = env_logger::builder().is_test(true).try_init();
        let msg = CString::new("Cannot resolve table 'x.ctb'").unwrap();
        bridge_logger(LogLevel::Error as c_int, msg.as_ptr());
        bridge_logger(12345, msg.as_ptr());
        bridge_logger(LogLevel::Off as c_int, msg.as_ptr());
        bridge_logger(LogLevel::Info as c_int, ptr::null());
    }
}
