use serde::Deserialize;

use crate::error::BurstResult;

/// Root application configuration. Loaded from an optional TOML file with
/// environment variables prefixed `BURST_REPORT__` layered on top.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub windows: WindowsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default = "default_log_json")]
    pub json: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowsConfig {
    /// Campaign roster consulted when no `--roster` flag is given.
    #[serde(default)]
    pub roster_path: Option<String>,
}

// Default functions
fn default_pretty() -> bool {
    true
}
fn default_log_filter() -> String {
    "burst_report=info,burst_reporting=info".to_string()
}
fn default_log_json() -> bool {
    false
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: default_log_json(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
            windows: WindowsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional config file and environment variables.
    pub fn load(path: Option<&str>) -> BurstResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let builder = builder.add_source(
            config::Environment::with_prefix("BURST_REPORT")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
