use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};
use websignin_directory::{DEFAULT_API_BASE_URL, DEFAULT_PROGRAM, DirectoryBackend, PollSettings};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub plugin: PluginConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        // Poll validation
        if self.poll.max_attempts == 0 {
            return Err("poll.max_attempts must be > 0".into());
        }
        // Directory validation
        if self.directory.backend == DirectoryBackend::AzCli
            && self.directory.program.trim().is_empty()
        {
            return Err("directory.program must not be empty for the az-cli backend".into());
        }
        match url::Url::parse(&self.directory.api_base_url) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => {}
            Ok(u) => {
                return Err(format!(
                    "directory.api_base_url must use http or https, got '{}'",
                    u.scheme()
                ));
            }
            Err(e) => return Err(format!("directory.api_base_url is not a valid URL: {e}")),
        }
        if self.server.body_limit_bytes == 0 {
            return Err("server.body_limit_bytes must be > 0".into());
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        let ip = self
            .server
            .host
            .parse()
            .unwrap_or(std::net::IpAddr::from([127, 0, 0, 1]));
        SocketAddr::new(ip, self.server.port)
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            max_attempts: self.poll.max_attempts,
            interval: Duration::from_millis(self.poll.interval_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// 0 binds an ephemeral port
    #[serde(default)]
    pub port: u16,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_body_limit() -> usize {
    1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 0,
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub backend: DirectoryBackend,
    /// Executable invoked by the az-cli backend
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_program() -> String {
    DEFAULT_PROGRAM.into()
}
fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.into()
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            backend: DirectoryBackend::default(),
            program: default_program(),
            api_base_url: default_api_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_max_attempts() -> u32 {
    30
}
fn default_interval_ms() -> u64 {
    1000
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PluginConfig {
    /// Overrides the version reported by GetPluginInfo
    #[serde(default)]
    pub version: Option<String>,
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub const DEFAULT_CONFIG_PATH: &str = "websignin.toml";

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        load_config_with_env(path, "WEBSIGNIN")
    }

    /// Load with environment overrides under `prefix`, e.g.
    /// `WEBSIGNIN__POLL__MAX_ATTEMPTS=10`.
    pub fn load_config_with_env(path: Option<&str>, prefix: &str) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_PATH));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        builder = builder.add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("__")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}
