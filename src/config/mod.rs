// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HealthConfig, RelayConfig, ResumeConfig, SiteConfig};

/// Config file used when neither a CLI argument nor `PORTFOLIO_CONFIG` is given
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; every key has a default, and
    /// `PORTFOLIO__<SECTION>__<KEY>` environment variables override both.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("PORTFOLIO").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.backlog", 128)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "portfolio-server/0.1")?
            .set_default("http.enable_cors", true)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("site.dist_dir", "client/dist")?
            .set_default("site.public_dir", "public")?
            .set_default("site.index_files", vec!["index.html"])?
            .set_default("site.spa_fallback", true)?
            .set_default("resume.type", "file")?
            .set_default("resume.path", "public/resume.pdf")?
            .set_default("resume.download_name", "Pratyush_Goutam_Resume.pdf")?
            .set_default("contact.ack_delay_ms", 1000)?
            .build()?;

        settings.try_deserialize()
    }

    /// Resolve the config path from the first CLI argument or `PORTFOLIO_CONFIG`
    pub fn resolve_path(cli_arg: Option<String>) -> String {
        cli_arg
            .or_else(|| std::env::var("PORTFOLIO_CONFIG").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
