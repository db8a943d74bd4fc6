// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub site: SiteConfig,
    pub resume: ResumeConfig,
    pub contact: ContactConfig,
    #[serde(default)]
    pub health: HealthConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Pending connection queue length
    pub backlog: i32,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

impl LoggingConfig {
    pub fn is_debug(&self) -> bool {
        self.level.eq_ignore_ascii_case("debug") || self.level.eq_ignore_ascii_case("trace")
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Static site hosting configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Built client bundle (index.html + assets)
    pub dist_dir: String,
    /// Public assets served at the site root, checked before the bundle
    pub public_dir: String,
    pub index_files: Vec<String>,
    /// Serve the bundle's index file for unmatched non-API paths
    pub spa_fallback: bool,
}

/// Resume download behaviour
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResumeConfig {
    /// Stream a file from disk as an attachment
    File { path: String, download_name: String },
    /// Redirect to a static path
    Redirect { target: String },
}

/// Contact form configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ContactConfig {
    /// Acknowledgment delay used when no relay is configured
    pub ack_delay_ms: u64,
    #[serde(default)]
    pub relay: Option<RelayConfig>,
}

/// Third-party form relay (e.g. Formspree)
#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    pub endpoint: String,
    #[serde(default = "default_relay_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_relay_timeout() -> u64 {
    10
}

#[allow(clippy::missing_const_for_fn)]
fn default_subject_prefix() -> String {
    "Portfolio Contact from".to_string()
}

/// Health check configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoints
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    /// Readiness probe path (default: /readyz)
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}
