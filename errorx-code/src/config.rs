//! Process-wide configuration
//!
//! Two settings are shared by the whole process: the code reported for chains
//! that carry none, and whether stack layers record a full backtrace. Both live
//! in atomics, so reads and writes never tear, but they are meant to be set
//! once at startup before errors start flowing.
//!
//! ```text
//! ┌──────────────┬─────────────────────┬──────────────────────────────────┐
//! │ Setting      │ Environment         │ Default                          │
//! ├──────────────┼─────────────────────┼──────────────────────────────────┤
//! │ default_code │ ERRORX_DEFAULT_CODE │ -1                               │
//! │ backtrace    │ ERRORX_BACKTRACE    │ env (follows RUST_BACKTRACE)     │
//! └──────────────┴─────────────────────┴──────────────────────────────────┘
//! ```

use crate::{lookup, ErrorCode, DEFAULT_CODE};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable holding the default code.
pub const DEFAULT_CODE_ENV: &str = "ERRORX_DEFAULT_CODE";

/// Environment variable holding the backtrace mode.
pub const BACKTRACE_ENV: &str = "ERRORX_BACKTRACE";

static BACKTRACE_MODE: AtomicU8 = AtomicU8::new(BacktraceMode::Env as u8);

/// When stack layers record a full backtrace.
///
/// The call site is recorded regardless of the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BacktraceMode {
    /// Never capture.
    Disabled = 0,
    /// Capture when `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE` ask for it.
    #[default]
    Env = 1,
    /// Always capture.
    Always = 2,
}

impl BacktraceMode {
    /// Returns the mode as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            BacktraceMode::Disabled => "off",
            BacktraceMode::Env => "env",
            BacktraceMode::Always => "always",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => BacktraceMode::Disabled,
            2 => BacktraceMode::Always,
            _ => BacktraceMode::Env,
        }
    }
}

impl fmt::Display for BacktraceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BacktraceMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "off" | "false" | "disabled" => Ok(BacktraceMode::Disabled),
            "env" => Ok(BacktraceMode::Env),
            "1" | "on" | "true" | "always" | "full" => Ok(BacktraceMode::Always),
            _ => Err(ConfigError::InvalidBacktrace {
                value: s.to_string(),
            }),
        }
    }
}

/// The backtrace mode currently in effect.
pub fn backtrace_mode() -> BacktraceMode {
    BacktraceMode::from_u8(BACKTRACE_MODE.load(Ordering::Relaxed))
}

/// Change the backtrace mode for stack layers created from now on.
pub fn set_backtrace_mode(mode: BacktraceMode) {
    BACKTRACE_MODE.store(mode as u8, Ordering::Relaxed);
}

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid ERRORX_DEFAULT_CODE value '{value}': expected an integer")]
    InvalidDefaultCode { value: String },

    #[error("invalid ERRORX_BACKTRACE value '{value}': expected off, env or always")]
    InvalidBacktrace { value: String },
}

/// Settings applied to the process-wide cells by [`Config::install`].
///
/// # Example
///
/// ```rust
/// use errorx_code::config::{BacktraceMode, Config};
///
/// let config = Config::new()
///     .with_default_code(500)
///     .with_backtrace(BacktraceMode::Disabled);
/// assert_eq!(config.default_code(), 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    default_code: ErrorCode,
    backtrace: BacktraceMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_code: DEFAULT_CODE,
            backtrace: BacktraceMode::default(),
        }
    }
}

impl Config {
    /// Create a config holding the built-in defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from `ERRORX_DEFAULT_CODE` and `ERRORX_BACKTRACE`.
    ///
    /// Unset variables keep their defaults; malformed ones are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(DEFAULT_CODE_ENV) {
            config.default_code = value
                .trim()
                .parse::<ErrorCode>()
                .map_err(|_| ConfigError::InvalidDefaultCode { value })?;
        }

        if let Some(value) = lookup(BACKTRACE_ENV) {
            config.backtrace = value.parse()?;
        }

        Ok(config)
    }

    /// Get the default code
    pub fn default_code(&self) -> ErrorCode {
        self.default_code
    }

    /// Get the backtrace mode
    pub fn backtrace(&self) -> BacktraceMode {
        self.backtrace
    }

    /// Set the default code
    pub fn with_default_code(mut self, code: ErrorCode) -> Self {
        self.default_code = code;
        self
    }

    /// Set the backtrace mode
    pub fn with_backtrace(mut self, mode: BacktraceMode) -> Self {
        self.backtrace = mode;
        self
    }

    /// Apply this config to the process-wide cells.
    pub fn install(self) {
        lookup::set_default_code(self.default_code);
        set_backtrace_mode(self.backtrace);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            default_code = self.default_code,
            backtrace = %self.backtrace,
            "errorx-code configuration installed"
        );
    }
}
