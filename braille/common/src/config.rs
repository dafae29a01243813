use anyhow::{Context, Result};
use api::{LogLevel, Mode};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::{BufferPolicy, TranslateOptions};

/// Environment variable naming a JSON config file for the host exports.
pub const CONFIG_ENV: &str = "LOUIS_BRIDGE_CONFIG";

/// Environment variable overriding `library_path`.
pub const LIBRARY_ENV: &str = "LOUIS_LIBRARY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Explicit liblouis shared library. When unset the platform names are tried.
    pub library_path: Option<PathBuf>,

    /// Data path applied as soon as the engine is loaded.
    pub data_path: Option<PathBuf>,

    pub log_level: LogLevel,
    pub buffer: BufferPolicy,
    pub mode: Mode,

    #[serde(default = "default_sanitize_blank_cells")]
    pub sanitize_blank_cells: bool,
}

fn default_sanitize_blank_cells() -> bool {
    true
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            library_path: None,
            data_path: None,
            log_level: LogLevel::default(),
            buffer: BufferPolicy::default(),
            mode: Mode::default(),
            sanitize_blank_cells: default_sanitize_blank_cells(),
        }
    }
}

impl BridgeConfig {
    pub fn translate_options(&self) -> TranslateOptions {
        TranslateOptions {
            buffer: self.buffer,
            mode: self.mode,
            sanitize_blank_cells: self.sanitize_blank_cells,
        }
    }

    /// Config named by `LOUIS_BRIDGE_CONFIG`, or defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => load_config(Path::new(&path)),
            None => Ok(Self::default().with_env_overrides()),
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(lib) = std::env::var_os(LIBRARY_ENV) {
            self.library_path = Some(PathBuf::from(lib));
        }
        self
    }
}

/// Read a JSON config, falling back to defaults when the file does not exist.
pub fn load_config(path: &Path) -> Result<BridgeConfig> {
    let config = if path.exists() {
        info!("Loading config from {:?}", path);
        let file =
            File::open(path).with_context(|| format!("Failed to open config {:?}", path))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config {:?}", path))?
    } else {
        info!("Config not found at {:?}, using defaults", path);
        BridgeConfig::default()
    };
    Ok(config.with_env_overrides())
}
