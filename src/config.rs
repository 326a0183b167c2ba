//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//! The resulting [`Config`] is handed to [`crate::state::AppState::new`]; nothing
//! reads the environment after that point.
//!
//! ## Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:8081`)
//! - `SERVER_MODE` - `release` or `debug` (default: `debug`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `LOG_COLOR` - Colorize status and method in access lines (default: `true`)
//! - `ACCESS_LOG` - Access line sink: `stdout` or `tracing` (default: `stdout`)
//! - `STATIC_DIR` - Directory served for unmatched paths (optional)

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Process-wide server mode.
///
/// Debug logs every request; release only logs responses with status >= 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerMode {
    #[default]
    Debug,
    Release,
}

impl ServerMode {
    /// Maps a raw `SERVER_MODE` value. Anything but `release` is debug.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("release") => Self::Release,
            _ => Self::Debug,
        }
    }

    pub fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }
}

impl FromStr for ServerMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            other => anyhow::bail!("server mode must be 'debug' or 'release', got '{other}'"),
        }
    }
}

impl fmt::Display for ServerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where finished access lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessLogTarget {
    /// Raw line on standard output.
    #[default]
    Stdout,
    /// `tracing::info!` event under the `eweb::access` target.
    Tracing,
}

impl FromStr for AccessLogTarget {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(Self::Stdout),
            "tracing" => Ok(Self::Tracing),
            other => anyhow::bail!("ACCESS_LOG must be 'stdout' or 'tracing', got '{other}'"),
        }
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub mode: ServerMode,
    pub log_level: String,
    pub log_format: String,
    /// Wraps status and method in ANSI color codes when true.
    pub log_color: bool,
    pub access_log: AccessLogTarget,
    /// Served through `ServeDir` for every path no route matches.
    pub static_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8081".to_string(),
            mode: ServerMode::Debug,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            log_color: true,
            access_log: AccessLogTarget::Stdout,
            static_dir: None,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `LOG_COLOR` or `ACCESS_LOG` hold unknown values.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let listen_addr = env::var("LISTEN").unwrap_or(defaults.listen_addr);
        let mode = ServerMode::from_env_value(env::var("SERVER_MODE").ok().as_deref());
        let log_level = env::var("RUST_LOG").unwrap_or(defaults.log_level);
        let log_format = env::var("LOG_FORMAT").unwrap_or(defaults.log_format);

        let log_color = match env::var("LOG_COLOR") {
            Ok(v) => parse_bool(&v).context("Failed to parse LOG_COLOR")?,
            Err(_) => defaults.log_color,
        };

        let access_log = match env::var("ACCESS_LOG") {
            Ok(v) => v.parse()?,
            Err(_) => defaults.access_log,
        };

        let static_dir = env::var("STATIC_DIR").ok().filter(|v| !v.trim().is_empty());

        Ok(Self {
            listen_addr,
            mode,
            log_level,
            log_format,
            log_color,
            access_log,
            static_dir,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not in `host:port` form
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        let Some((_, port)) = self.listen_addr.rsplit_once(':') else {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        };

        if port.parse::<u16>().is_err() {
            anyhow::bail!(
                "LISTEN port must be a number between 0 and 65535, got '{}'",
                port
            );
        }

        Ok(())
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Server mode: {}", self.mode);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Access log: {:?} (color: {})", self.access_log, self.log_color);

        match self.static_dir {
            Some(ref dir) => tracing::info!("  Static files: {}", dir),
            None => tracing::info!("  Static files: disabled"),
        }
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => anyhow::bail!("expected 'true', 'false', '1' or '0', got '{other}'"),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable holds an invalid value or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_server_mode_from_env_value() {
        assert_eq!(ServerMode::from_env_value(Some("release")), ServerMode::Release);
        assert_eq!(ServerMode::from_env_value(Some("RELEASE")), ServerMode::Release);
        assert_eq!(ServerMode::from_env_value(Some("debug")), ServerMode::Debug);
        assert_eq!(ServerMode::from_env_value(Some("test")), ServerMode::Debug);
        assert_eq!(ServerMode::from_env_value(Some("")), ServerMode::Debug);
        assert_eq!(ServerMode::from_env_value(None), ServerMode::Debug);
    }

    #[test]
    fn test_server_mode_parse() {
        assert_eq!("release".parse::<ServerMode>().unwrap(), ServerMode::Release);
        assert_eq!("Debug".parse::<ServerMode>().unwrap(), ServerMode::Debug);
        assert!("prod".parse::<ServerMode>().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("1").unwrap());
        assert!(!parse_bool("FALSE").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("yes").is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        // Test invalid log format
        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());

        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        // Test invalid listen address
        config.listen_addr = "8081".to_string();
        assert!(config.validate().is_err());

        config.listen_addr = "0.0.0.0:http".to_string();
        assert!(config.validate().is_err());

        config.listen_addr = "127.0.0.1:3000".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::remove_var("LISTEN");
            env::remove_var("SERVER_MODE");
            env::remove_var("LOG_FORMAT");
            env::remove_var("LOG_COLOR");
            env::remove_var("ACCESS_LOG");
            env::remove_var("STATIC_DIR");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:8081");
        assert_eq!(config.mode, ServerMode::Debug);
        assert_eq!(config.log_format, "text");
        assert!(config.log_color);
        assert_eq!(config.access_log, AccessLogTarget::Stdout);
        assert!(config.static_dir.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_release_mode() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("SERVER_MODE", "release");
            env::set_var("LOG_COLOR", "0");
            env::set_var("ACCESS_LOG", "tracing");
            env::set_var("STATIC_DIR", "./public");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.mode, ServerMode::Release);
        assert!(!config.log_color);
        assert_eq!(config.access_log, AccessLogTarget::Tracing);
        assert_eq!(config.static_dir.as_deref(), Some("./public"));

        // Cleanup
        unsafe {
            env::remove_var("SERVER_MODE");
            env::remove_var("LOG_COLOR");
            env::remove_var("ACCESS_LOG");
            env::remove_var("STATIC_DIR");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_unknown_sink() {
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("ACCESS_LOG", "syslog");
        }

        assert!(Config::from_env().is_err());

        // Cleanup
        unsafe {
            env::remove_var("ACCESS_LOG");
        }
    }
}
