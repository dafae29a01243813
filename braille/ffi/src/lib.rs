//! Host-facing exports for the braille translation bridge.
//!
//! Two surfaces share one process-wide state: a C ABI for Swift and other native
//! hosts, and JNI entry points named for the `NativeLiblouisModule` Kotlin class.
//! Every export reports failure as an absent result plus a message readable once
//! through the last-error query; nothing unwinds across the boundary.

pub mod c_api;
#[cfg(feature = "jni")]
mod jni_exports;
mod state;

pub use state::{
    back_translate, engine_version, install_engine, is_initialized, last_error, set_data_path,
    translate, translate_units,
};

/// Errors raised while bringing the bridge up.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Failed to load translation engine: {0}")]
    EngineLoad(#[from] api::EngineError),
    #[error("Translation engine already installed")]
    AlreadyInstalled,
}
