// settings.rs — sidecar JSON configuration read once per process
//
// The file lives next to the shim module. Every key is optional; a missing
// or unreadable file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, ShimError};

/// File name of the sidecar configuration
pub const SETTINGS_FILE_NAME: &str = "goldsrc_shim.json";

#[cfg(windows)]
pub const DEFAULT_LEGACY_SERVER_MODULE: &str = "libserver.dll";
#[cfg(windows)]
pub const DEFAULT_LEGACY_CLIENT_MODULE: &str = "libclient.dll";

#[cfg(target_os = "macos")]
pub const DEFAULT_LEGACY_SERVER_MODULE: &str = "libserver.dylib";
#[cfg(target_os = "macos")]
pub const DEFAULT_LEGACY_CLIENT_MODULE: &str = "libclient.dylib";

#[cfg(all(not(windows), not(target_os = "macos")))]
pub const DEFAULT_LEGACY_SERVER_MODULE: &str = "libserver.so";
#[cfg(all(not(windows), not(target_os = "macos")))]
pub const DEFAULT_LEGACY_CLIENT_MODULE: &str = "libclient.so";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Settings {
    pub framework_name: String,
    pub version: String,
    pub enable_debug: bool,
    pub enable_verbose_logging: bool,

    /// Companion module implementing the server role; `None` keeps the legacy module
    pub game_server_assembly: Option<String>,
    /// Companion module implementing the client role; `None` keeps the legacy module
    pub game_client_assembly: Option<String>,

    pub legacy_server_module: String,
    pub legacy_client_module: String,

    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            framework_name: "GoldsrcFramework".to_string(),
            version: "1.0.0".to_string(),
            enable_debug: false,
            enable_verbose_logging: false,
            game_server_assembly: None,
            game_client_assembly: None,
            legacy_server_module: DEFAULT_LEGACY_SERVER_MODULE.to_string(),
            legacy_client_module: DEFAULT_LEGACY_CLIENT_MODULE.to_string(),
            logging: LoggingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LoggingSettings {
    /// One of Trace, Debug, Information, Warning, Error, Critical
    pub minimum_level: String,
    pub enable_console: bool,
    pub enable_file: bool,
    pub log_file_path: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            minimum_level: "Information".to_string(),
            enable_console: true,
            enable_file: false,
            log_file_path: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON text. Unknown keys are ignored.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Read `path` strictly: any IO or parse problem is an error.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text).map_err(|e| ShimError::json(path, e))
    }

    /// Read the sidecar in `dir`, falling back to defaults.
    ///
    /// Logging is not installed yet when this runs, so problems are
    /// returned alongside the settings and reported afterwards.
    pub fn load_or_default(dir: &Path) -> (Self, Option<ShimError>) {
        let path = dir.join(SETTINGS_FILE_NAME);
        if !path.exists() {
            return (Self::default(), None);
        }
        match Self::read(&path) {
            Ok(settings) => (settings, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Companion module path for the server role, resolved against `dir`
    pub fn server_companion(&self, dir: &Path) -> Option<PathBuf> {
        self.game_server_assembly
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| resolve_module_path(dir, s))
    }

    /// Companion module path for the client role, resolved against `dir`
    pub fn client_companion(&self, dir: &Path) -> Option<PathBuf> {
        self.game_client_assembly
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| resolve_module_path(dir, s))
    }

    pub fn legacy_server_path(&self, dir: &Path) -> PathBuf {
        resolve_module_path(dir, &self.legacy_server_module)
    }

    pub fn legacy_client_path(&self, dir: &Path) -> PathBuf {
        resolve_module_path(dir, &self.legacy_client_module)
    }
}

/// Relative module names are looked up next to the shim
pub fn resolve_module_path(dir: &Path, name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}
