use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub stt_api_key: String,
    pub stt_base_url: String,
    pub stt_model: String,
    pub stt_language: String,
    pub listen_timeout: Duration,
    pub espeak_bin: PathBuf,
    pub canvas_path: PathBuf,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let stt_api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))?;

        let stt_base_url = std::env::var("STT_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string())
            .trim_end_matches('/')
            .to_string();
        if !stt_base_url.starts_with("http://") && !stt_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "STT_BASE_URL".to_string(),
                format!("'{}' is not an http(s) URL", stt_base_url),
            ));
        }

        let stt_model = std::env::var("STT_MODEL").unwrap_or_else(|_| "whisper-1".to_string());
        let stt_language = std::env::var("STT_LANGUAGE").unwrap_or_else(|_| "en".to_string());

        let timeout_str = std::env::var("LISTEN_TIMEOUT_SECS").unwrap_or_else(|_| "5".to_string());
        let listen_timeout = match timeout_str.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                return Err(ConfigError::InvalidValue(
                    "LISTEN_TIMEOUT_SECS".to_string(),
                    format!("'{}' is not a positive number of seconds", timeout_str),
                ));
            }
        };

        let espeak_bin = std::env::var("ESPEAK_BIN")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("espeak-ng"));

        let canvas_path = std::env::var("CANVAS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./eduvox-canvas.png"));

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            stt_api_key,
            stt_base_url,
            stt_model,
            stt_language,
            listen_timeout,
            espeak_bin,
            canvas_path,
            log_level,
        })
    }
}
