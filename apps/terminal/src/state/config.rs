//! # Terminal Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SCANPOS_API_URL=http://192.168.1.10:8000                           │
//! │     SCANPOS_EMPLOYEE_CODE=EMP042                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/scanpos/terminal.toml (Linux)                            │
//! │     ~/Library/Application Support/com.scanpos.terminal/... (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [terminal]
//! id = "550e8400-e29b-41d4-a716-446655440000"
//! name = "Register 1"
//!
//! [api]
//! base_url = "http://localhost:8000"
//! timeout_secs = 10
//! employee_code = "EMP001"
//!
//! [scanner]
//! open_delay_ms = 100
//! back_camera_keywords = ["back", "リア"]
//! script_path = "/var/lib/scanpos/demo-scan.txt"
//! frame_interval_ms = 200
//! decoder = "zxing"   # or "text"
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use scanpos_core::DEFAULT_EMPLOYEE_CODE;
use scanpos_scanner::{
    FrameDecoder, FrameStyle, ScannerOptions, TextFrameDecoder, ZxingDecoder,
    DEFAULT_BACK_CAMERA_KEYWORDS,
};

// =============================================================================
// Errors
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidValue(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Identity of this terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalSettings {
    /// Unique terminal identifier, attached to every log line.
    #[serde(default = "new_terminal_id")]
    pub id: String,

    /// Human-readable name.
    #[serde(default = "default_terminal_name")]
    pub name: String,
}

fn new_terminal_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_terminal_name() -> String {
    "Checkout Terminal".to_string()
}

impl Default for TerminalSettings {
    fn default() -> Self {
        TerminalSettings {
            id: new_terminal_id(),
            name: default_terminal_name(),
        }
    }
}

/// Backend API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the checkout backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Employee code sent with every purchase.
    #[serde(default = "default_employee_code")]
    pub employee_code: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_employee_code() -> String {
    DEFAULT_EMPLOYEE_CODE.to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            employee_code: default_employee_code(),
        }
    }
}

/// Camera scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerSettings {
    /// Delay before the scanner opens after a request (milliseconds).
    #[serde(default = "default_open_delay")]
    pub open_delay_ms: u64,

    /// Label substrings that mark a rear camera.
    #[serde(default = "default_back_keywords")]
    pub back_camera_keywords: Vec<String>,

    /// Scan script replayed by the scripted camera. No script, no camera.
    #[serde(default)]
    pub script_path: Option<PathBuf>,

    /// Pace of the scripted camera (milliseconds per frame).
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,

    /// Frame decoder.
    #[serde(default)]
    pub decoder: DecoderKind,
}

/// Which decoder reads camera frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecoderKind {
    /// Image decoding with rxing; the scripted camera renders barcodes.
    #[default]
    Zxing,

    /// Frames carry the code as text.
    Text,
}

fn default_open_delay() -> u64 {
    100
}

fn default_back_keywords() -> Vec<String> {
    DEFAULT_BACK_CAMERA_KEYWORDS
        .iter()
        .map(|k| k.to_string())
        .collect()
}

fn default_frame_interval() -> u64 {
    200
}

impl Default for ScannerSettings {
    fn default() -> Self {
        ScannerSettings {
            open_delay_ms: default_open_delay(),
            back_camera_keywords: default_back_keywords(),
            script_path: None,
            frame_interval_ms: default_frame_interval(),
            decoder: DecoderKind::default(),
        }
    }
}

// =============================================================================
// TerminalConfig
// =============================================================================

/// Complete terminal configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerminalConfig {
    #[serde(default)]
    pub terminal: TerminalSettings,

    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub scanner: ScannerSettings,
}

impl TerminalConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path, else the platform default if present)
    /// 3. Environment variables
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => {
                info!(?path, "Loading terminal config from file");
                Self::from_toml(&std::fs::read_to_string(&path)?)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => {
                    info!(?path, "Loading terminal config from file");
                    Self::from_toml(&std::fs::read_to_string(&path)?)?
                }
                path => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document; missing keys take their defaults.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let url = &self.api.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(format!(
                "api.base_url must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.api.employee_code.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "api.employee_code must not be empty".into(),
            ));
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "api.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.scanner.frame_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "scanner.frame_interval_ms must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `SCANPOS_*` overrides read through `get`.
    fn apply_overrides<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = get("SCANPOS_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(code) = get("SCANPOS_EMPLOYEE_CODE") {
            self.api.employee_code = code;
        }

        if let Some(timeout) = get("SCANPOS_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid SCANPOS_TIMEOUT_SECS"),
            }
        }

        if let Some(path) = get("SCANPOS_SCAN_SCRIPT") {
            self.scanner.script_path = Some(PathBuf::from(path));
        }

        if let Some(decoder) = get("SCANPOS_DECODER") {
            match decoder.as_str() {
                "zxing" => self.scanner.decoder = DecoderKind::Zxing,
                "text" => self.scanner.decoder = DecoderKind::Text,
                _ => warn!(value = %decoder, "Ignoring invalid SCANPOS_DECODER"),
            }
        }

        if let Some(id) = get("SCANPOS_TERMINAL_ID") {
            self.terminal.id = id;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "scanpos", "terminal")
            .map(|dirs| dirs.config_dir().join("terminal.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn open_delay(&self) -> Duration {
        Duration::from_millis(self.scanner.open_delay_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.scanner.frame_interval_ms)
    }

    pub fn scanner_options(&self) -> ScannerOptions {
        ScannerOptions {
            back_camera_keywords: self.scanner.back_camera_keywords.clone(),
        }
    }

    /// Builds the configured frame decoder.
    pub fn frame_decoder(&self) -> Arc<dyn FrameDecoder> {
        match self.scanner.decoder {
            DecoderKind::Zxing => Arc::new(ZxingDecoder::new()),
            DecoderKind::Text => Arc::new(TextFrameDecoder),
        }
    }

    /// Frame style the scripted camera must produce for the decoder.
    pub fn frame_style(&self) -> FrameStyle {
        match self.scanner.decoder {
            DecoderKind::Zxing => FrameStyle::Rendered,
            DecoderKind::Text => FrameStyle::Text,
        }
    }
}
