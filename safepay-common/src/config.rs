//! Configuration loading for the SafePay evidence-analysis gateway
//!
//! Two-tier configuration:
//! 1. **TOML bootstrap**: ports, backend addresses, transcription provider,
//!    upload limits (static, read once at startup)
//! 2. **Environment overrides**: every operationally relevant setting can be
//!    overridden by a `SAFEPAY_*` variable without editing the file
//!
//! # Settings Sources priority
//!
//! 1. Command-line arguments (`--port`, `--config`, `--uploads-dir`)
//! 2. Environment variables (`SAFEPAY_PORT`, `SAFEPAY_ASSEMBLYAI_API_KEY`, ...)
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)
//!
//! A missing TOML file is not an error: every setting has a serviceable
//! default except the transcription API key, which is only required once the
//! audio path actually runs. The resolved [`GatewayConfig`] is immutable and
//! passed explicitly into the orchestration components; nothing reads the
//! process environment after startup.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Bootstrap configuration loaded from TOML file
///
/// These settings cannot change during runtime. The service must restart to
/// pick up changes to the TOML file.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    /// HTTP server port
    ///
    /// Default: 6900 (SafePay gateway standard port)
    #[serde(default)]
    pub port: Option<u16>,

    /// External analysis backend addresses
    #[serde(default)]
    pub backends: BackendsConfig,

    /// Speech-to-text provider settings
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Evidence upload staging settings
    #[serde(default)]
    pub uploads: UploadsConfig,

    /// Outbound HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Base addresses of the external analysis backends
#[derive(Debug, Clone, Deserialize)]
pub struct BackendsConfig {
    /// AI voice-analysis service (transcript verdicts)
    #[serde(default = "default_voice_analysis_url")]
    pub voice_analysis_url: String,

    /// Document service (text prediction + OCR extraction)
    #[serde(default = "default_document_service_url")]
    pub document_service_url: String,

    /// Media service (video + WhatsApp screenshot analysis)
    #[serde(default = "default_media_service_url")]
    pub media_service_url: String,
}

/// Speech-to-text provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionConfig {
    /// Provider API base URL
    #[serde(default = "default_transcription_base_url")]
    pub base_url: String,

    /// Provider API key (required for the audio path)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Delay between transcript status polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Maximum number of status polls before the job is declared timed out
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

/// Evidence upload staging settings
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    /// Directory where binary evidence is staged before upload
    #[serde(default = "default_uploads_dir")]
    pub dir: PathBuf,

    /// Maximum accepted evidence payload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Per-call timeout for outbound requests, in seconds
    ///
    /// Distinct from the transcription polling ceiling: this bounds each
    /// individual call to a backend or the transcription provider.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log filter (trace, debug, info, warn, error, or an EnvFilter directive)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_port() -> u16 {
    6900
}

fn default_voice_analysis_url() -> String {
    "http://localhost:8082".to_string()
}

fn default_document_service_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_media_service_url() -> String {
    "http://localhost:8083".to_string()
}

fn default_transcription_base_url() -> String {
    "https://api.assemblyai.com/v2".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_max_poll_attempts() -> u32 {
    30
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024 // 5 MB
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            voice_analysis_url: default_voice_analysis_url(),
            document_service_url: default_document_service_url(),
            media_service_url: default_media_service_url(),
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            base_url: default_transcription_base_url(),
            api_key: None,
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: default_uploads_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Command-line configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Explicit TOML config file path (error if it does not exist)
    pub config_path: Option<PathBuf>,
    /// HTTP server port
    pub port: Option<u16>,
    /// Evidence staging directory
    pub uploads_dir: Option<PathBuf>,
}

/// Resolved, immutable gateway configuration
///
/// Constructed once at process start via [`GatewayConfig::load`] and passed
/// explicitly into the orchestration components.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// HTTP server port
    pub port: u16,
    /// AI voice-analysis service base URL
    pub voice_analysis_url: String,
    /// Document service (text prediction + OCR) base URL
    pub document_service_url: String,
    /// Media service (video + WhatsApp) base URL
    pub media_service_url: String,
    /// Speech-to-text provider base URL
    pub transcription_base_url: String,
    /// Speech-to-text provider API key (None = audio path unavailable)
    pub transcription_api_key: Option<String>,
    /// Delay between transcript status polls, in milliseconds
    pub poll_interval_ms: u64,
    /// Maximum number of status polls before timeout
    pub max_poll_attempts: u32,
    /// Per-call timeout for outbound requests, in seconds
    pub request_timeout_secs: u64,
    /// Directory where binary evidence is staged
    pub uploads_dir: PathBuf,
    /// Maximum accepted evidence payload size in bytes
    pub max_upload_bytes: usize,
    /// Log filter string
    pub log_filter: String,
}

impl GatewayConfig {
    /// Load the complete gateway configuration.
    ///
    /// Applies the source priority documented at module level:
    /// CLI override > environment variable > TOML file > built-in default.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly requested config file is missing,
    /// or if a present TOML file cannot be read or parsed. A merely absent
    /// default-location file falls back to built-in defaults.
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let toml_config = match locate_config_file(overrides.config_path.as_deref())? {
            Some(path) => {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
                })?;
                let parsed: TomlConfig = toml::from_str(&content).map_err(|e| {
                    Error::Config(format!("Failed to parse {}: {}", path.display(), e))
                })?;
                info!("Loaded TOML configuration from {}", path.display());
                parsed
            }
            None => {
                debug!("No TOML config file found, using built-in defaults");
                TomlConfig::default()
            }
        };

        let port = overrides
            .port
            .or_else(|| env_parsed("SAFEPAY_PORT"))
            .or(toml_config.port)
            .unwrap_or_else(default_port);

        let uploads_dir = overrides
            .uploads_dir
            .or_else(|| env_string("SAFEPAY_UPLOADS_DIR").map(PathBuf::from))
            .unwrap_or(toml_config.uploads.dir);

        let api_key = env_string("SAFEPAY_ASSEMBLYAI_API_KEY")
            .or(toml_config.transcription.api_key)
            .filter(|key| is_valid_key(key));

        Ok(Self {
            port,
            voice_analysis_url: env_string("SAFEPAY_VOICE_ANALYSIS_URL")
                .unwrap_or(toml_config.backends.voice_analysis_url),
            document_service_url: env_string("SAFEPAY_DOCUMENT_SERVICE_URL")
                .unwrap_or(toml_config.backends.document_service_url),
            media_service_url: env_string("SAFEPAY_MEDIA_SERVICE_URL")
                .unwrap_or(toml_config.backends.media_service_url),
            transcription_base_url: env_string("SAFEPAY_ASSEMBLYAI_URL")
                .unwrap_or(toml_config.transcription.base_url),
            transcription_api_key: api_key,
            poll_interval_ms: toml_config.transcription.poll_interval_ms,
            max_poll_attempts: toml_config.transcription.max_poll_attempts,
            request_timeout_secs: toml_config.http.request_timeout_secs,
            uploads_dir,
            max_upload_bytes: env_parsed("SAFEPAY_MAX_UPLOAD_BYTES")
                .unwrap_or(toml_config.uploads.max_upload_bytes),
            log_filter: env_string("SAFEPAY_LOG").unwrap_or(toml_config.logging.level),
        })
    }

    /// Delay between transcript status polls
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Per-call timeout for outbound HTTP requests
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let toml = TomlConfig::default();
        Self {
            port: default_port(),
            voice_analysis_url: toml.backends.voice_analysis_url,
            document_service_url: toml.backends.document_service_url,
            media_service_url: toml.backends.media_service_url,
            transcription_base_url: toml.transcription.base_url,
            transcription_api_key: None,
            poll_interval_ms: toml.transcription.poll_interval_ms,
            max_poll_attempts: toml.transcription.max_poll_attempts,
            request_timeout_secs: toml.http.request_timeout_secs,
            uploads_dir: toml.uploads.dir,
            max_upload_bytes: toml.uploads.max_upload_bytes,
            log_filter: toml.logging.level,
        }
    }
}

/// Validate an API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Locate the TOML config file.
///
/// Priority: explicit path (must exist) > `SAFEPAY_CONFIG` environment
/// variable > `<user config dir>/safepay/safepay-ea.toml` >
/// `/etc/safepay/safepay-ea.toml` (Unix).
fn locate_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(Some(path.to_path_buf()));
        }
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    if let Some(path) = env_string("SAFEPAY_CONFIG").map(PathBuf::from) {
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(Error::Config(format!(
            "SAFEPAY_CONFIG points at a missing file: {}",
            path.display()
        )));
    }

    if let Some(path) = dirs::config_dir().map(|d| d.join("safepay").join("safepay-ea.toml")) {
        if path.exists() {
            return Ok(Some(path));
        }
    }

    let system_config = PathBuf::from("/etc/safepay/safepay-ea.toml");
    if system_config.exists() {
        return Ok(Some(system_config));
    }

    Ok(None)
}

/// Read a non-empty environment variable
fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read and parse an environment variable, warning on invalid values
fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env_string(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Invalid value for {}: '{}', ignoring", name, raw);
            None
        }
    }
}
