// error.rs — error type for module loading, binding and configuration

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShimError>;

/// Which half of the game DLL interface a binding serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Server,
    Client,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Server => f.write_str("server"),
            Role::Client => f.write_str("client"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShimError {
    #[error("failed to load module '{path}': {message}")]
    LoadError { path: PathBuf, message: String },

    #[error("symbol '{symbol}' not found in module '{module}'")]
    SymbolNotFound { module: String, symbol: String },

    /// A companion module was configured but does not export its factory
    #[error("companion module '{path}' does not export factory '{symbol}'")]
    MissingFactory { path: PathBuf, symbol: String },

    #[error("invalid configuration '{path}': {message}")]
    Config { path: PathBuf, message: String },

    #[error("{role} binding failed: {message}")]
    BindingFailed { role: Role, message: String },

    #[error("no {0} implementation is bound")]
    NotBound(Role),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ShimError {
    pub fn load_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ShimError::LoadError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn symbol_not_found(module: impl Into<String>, symbol: impl Into<String>) -> Self {
        ShimError::SymbolNotFound {
            module: module.into(),
            symbol: symbol.into(),
        }
    }

    pub fn missing_factory(path: impl Into<PathBuf>, symbol: impl Into<String>) -> Self {
        ShimError::MissingFactory {
            path: path.into(),
            symbol: symbol.into(),
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ShimError::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        ShimError::Json {
            path: path.into(),
            source,
        }
    }

    pub fn binding_failed(role: Role, message: impl Into<String>) -> Self {
        ShimError::BindingFailed {
            role,
            message: message.into(),
        }
    }

    /// Configuration mistakes are reported differently from runtime load failures
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ShimError::MissingFactory { .. } | ShimError::Config { .. } | ShimError::Json { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_module_and_symbol() {
        let err = ShimError::symbol_not_found("libserver.so", "GetEntityAPI2");
        assert_eq!(err.to_string(), "symbol 'GetEntityAPI2' not found in module 'libserver.so'");

        let err = ShimError::binding_failed(Role::Client, "boom");
        assert_eq!(err.to_string(), "client binding failed: boom");
    }

    #[test]
    fn test_configuration_errors_are_classified() {
        assert!(ShimError::missing_factory("game.dll", "gsf_create_server_exports").is_configuration_error());
        assert!(ShimError::config("goldsrc_shim.json", "bad").is_configuration_error());
        assert!(!ShimError::load_error("x.so", "not found").is_configuration_error());
        assert!(!ShimError::NotBound(Role::Server).is_configuration_error());

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ShimError::json("goldsrc_shim.json", source);
        assert!(err.is_configuration_error());
        assert!(err.to_string().starts_with("malformed JSON in 'goldsrc_shim.json'"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ShimError = io.into();
        assert!(matches!(err, ShimError::Io(_)));
    }
}
