// logging.rs — env_logger setup driven by the sidecar `Logging` section

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::LevelFilter;

use crate::settings::{resolve_module_path, Settings};

/// Log file used when file output is on but no path is configured
pub const DEFAULT_LOG_FILE: &str = "goldsrc_shim.log";

/// Map a `MinimumLevel` name onto a `log` filter. Unknown names mean Info.
pub fn parse_level(name: &str) -> LevelFilter {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" | "verbose" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "information" | "info" => LevelFilter::Info,
        "warning" | "warn" => LevelFilter::Warn,
        "error" | "critical" | "fatal" => LevelFilter::Error,
        "none" | "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// Effective level: verbose forces trace, debug forces at least debug.
pub fn effective_level(settings: &Settings) -> LevelFilter {
    let level = parse_level(&settings.logging.minimum_level);
    if settings.enable_verbose_logging {
        LevelFilter::Trace
    } else if settings.enable_debug {
        level.max(LevelFilter::Debug)
    } else {
        level
    }
}

pub fn log_file_path(settings: &Settings, dir: &Path) -> PathBuf {
    let name = settings
        .logging
        .log_file_path
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or(DEFAULT_LOG_FILE);
    resolve_module_path(dir, name)
}

/// Writes every record to stderr and the log file
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// Install the process logger. `RUST_LOG` overrides the configured level.
///
/// Safe to call more than once; only the first call installs anything.
pub fn init(settings: &Settings, dir: &Path) {
    let logging = &settings.logging;
    let level = if logging.enable_console || logging.enable_file {
        effective_level(settings)
    } else {
        LevelFilter::Off
    };

    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.to_string()),
    );

    let mut file_problem = None;
    if logging.enable_file {
        let path = log_file_path(settings, dir);
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                let target: Box<dyn Write + Send> = if logging.enable_console {
                    Box::new(Tee { file })
                } else {
                    Box::new(file)
                };
                builder.target(env_logger::Target::Pipe(target));
            }
            Err(e) => file_problem = Some((path, e)),
        }
    }

    if builder.try_init().is_err() {
        log::debug!("logger already installed");
        return;
    }

    if let Some((path, e)) = file_problem {
        log::warn!("cannot open log file '{}': {}", path.display(), e);
    }
    log::debug!(
        "{} {} logging at {}",
        settings.framework_name,
        settings.version,
        level
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_names() {
        assert_eq!(parse_level("Trace"), LevelFilter::Trace);
        assert_eq!(parse_level("Debug"), LevelFilter::Debug);
        assert_eq!(parse_level("Information"), LevelFilter::Info);
        assert_eq!(parse_level("Warning"), LevelFilter::Warn);
        assert_eq!(parse_level("Error"), LevelFilter::Error);
        assert_eq!(parse_level("Critical"), LevelFilter::Error);
        assert_eq!(parse_level("bogus"), LevelFilter::Info);
    }

    #[test]
    fn test_debug_and_verbose_raise_the_level() {
        let mut settings = Settings::default();
        settings.logging.minimum_level = "Warning".into();
        assert_eq!(effective_level(&settings), LevelFilter::Warn);

        settings.enable_debug = true;
        assert_eq!(effective_level(&settings), LevelFilter::Debug);

        settings.logging.minimum_level = "Trace".into();
        assert_eq!(effective_level(&settings), LevelFilter::Trace);

        settings.logging.minimum_level = "Error".into();
        settings.enable_verbose_logging = true;
        assert_eq!(effective_level(&settings), LevelFilter::Trace);
    }

    #[test]
    fn test_log_file_path_defaults_next_to_module() {
        let dir = Path::new("/opt/game/dlls");
        let mut settings = Settings::default();
        assert_eq!(log_file_path(&settings, dir), dir.join(DEFAULT_LOG_FILE));

        settings.logging.log_file_path = Some("logs/shim.log".into());
        assert_eq!(log_file_path(&settings, dir), dir.join("logs/shim.log"));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::default();
        init(&settings, dir.path());
        init(&settings, dir.path());
    }
}
