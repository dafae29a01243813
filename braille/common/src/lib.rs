pub use api::{CodeUnit, Direction, Engine, EngineError, LogLevel, Mode, Written};

mod buffer;
pub mod config;
mod error_slot;
mod sanitize;
pub mod table_store;
mod tables;
mod translator;
pub mod wide;

pub use buffer::BufferPolicy;
pub use config::{load_config, BridgeConfig};
pub use error_slot::ErrorSlot;
pub use sanitize::{sanitize, Sanitized, BLANK_CELL};
pub use table_store::{TableSource, TableStore};
pub use tables::TableResolver;
pub use translator::{screen, Screened, TranslateError, TranslateOptions, Translator};
pub use wide::EncodingError;
