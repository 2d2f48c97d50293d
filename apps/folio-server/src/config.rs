//! Configuration management for Folio Server

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub storage: StorageConfig,
    pub sessions: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Multipart body limit in bytes
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    /// `None` leaves the server running; every generation then fails.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory for uploaded PDFs and generated images
    pub work_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Abandoned sessions are swept only when this is set
    pub ttl_secs: Option<u64>,
    pub sweep_interval_secs: u64,
}

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp-image-generation";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: DEFAULT_PORT,
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            gemini: GeminiConfig {
                api_key: None,
                model: DEFAULT_GEMINI_MODEL.to_string(),
                base_url: DEFAULT_GEMINI_ENDPOINT.to_string(),
                timeout_secs: DEFAULT_GEMINI_TIMEOUT_SECS,
            },
            storage: StorageConfig {
                work_dir: env::temp_dir(),
            },
            sessions: SessionConfig {
                ttl_secs: None,
                sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT").unwrap_or(defaults.server.port),
                max_upload_bytes: parse_var("MAX_UPLOAD_BYTES")
                    .unwrap_or(defaults.server.max_upload_bytes),
            },
            gemini: GeminiConfig {
                api_key: env::var("GEMINI_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
                model: env::var("GEMINI_MODEL").unwrap_or(defaults.gemini.model),
                base_url: env::var("GEMINI_BASE_URL").unwrap_or(defaults.gemini.base_url),
                timeout_secs: parse_var("GEMINI_TIMEOUT_SECS")
                    .unwrap_or(defaults.gemini.timeout_secs),
            },
            storage: StorageConfig {
                work_dir: env::var("FOLIO_WORK_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.work_dir),
            },
            sessions: SessionConfig {
                ttl_secs: parse_var("SESSION_TTL_SECS"),
                sweep_interval_secs: parse_var("SESSION_SWEEP_SECS")
                    .unwrap_or(defaults.sessions.sweep_interval_secs),
            },
        }
    }
}

impl GeminiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

/// Read and parse an environment variable, ignoring unset or malformed values
fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring malformed {}={:?}", name, raw);
                None
            }
        },
        Err(_) => None,
    }
}
