use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

const ENV_PREFIX: &str = "RESOURCEFLOW_";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Env(#[from] envy::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Runtime settings, read from `RESOURCEFLOW_*` environment variables
/// (a `.env` file is honoured).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_http_addr")]
    pub http_addr: String,
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Plain,
    Json,
}

fn default_http_addr() -> String {
    "0.0.0.0:3000".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "plain".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            snapshot_path: None,
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = envy::prefixed(ENV_PREFIX).from_env::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    /// Same as [`Config::from_env`] but reads from the given pairs, which
    /// must carry the `RESOURCEFLOW_` prefix.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::prefixed(ENV_PREFIX).from_iter::<_, Config>(pairs)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;
        match self.log_level.to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "RESOURCEFLOW_LOG_LEVEL must be one of trace, debug, info, warn, error (got '{other}')"
                )));
            }
        }
        self.log_format()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.http_addr.parse().map_err(|_| {
            ConfigError::Invalid(format!(
                "RESOURCEFLOW_HTTP_ADDR '{}' is not a socket address",
                self.http_addr
            ))
        })
    }

    fn log_format(&self) -> Result<LogFormat, ConfigError> {
        match self.log_format.to_ascii_lowercase().as_str() {
            "plain" | "pretty" | "text" => Ok(LogFormat::Plain),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::Invalid(format!(
                "RESOURCEFLOW_LOG_FORMAT must be plain or json (got '{other}')"
            ))),
        }
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.to_ascii_lowercase(),
            format: self.log_format().unwrap_or(LogFormat::Plain),
        }
    }
}
