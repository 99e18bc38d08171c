//! admon-relay.toml configuration parser.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Category, ServerId};

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/admon-relay/admon-relay.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    pub store: StoreConfig,
    pub sink: SinkConfig,
    #[serde(default)]
    pub servers: ServersConfig,
    #[serde(default)]
    pub collector: CollectorConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Local admon recording database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    pub path: PathBuf,
    /// Bound on a single snapshot fetch.
    #[serde(default = "default_store_timeout", with = "duration_str")]
    pub timeout: Duration,
}

/// Remote metrics sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SinkConfig {
    pub host: String,
    #[serde(default = "default_sink_port")]
    pub port: u16,
    /// Prefix for target collection names (`{namespace}-{category}`).
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Bound on a single document submission.
    #[serde(default = "default_sink_timeout", with = "duration_str")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServersConfig {
    #[serde(default)]
    pub meta: Vec<ServerId>,
    #[serde(default)]
    pub storage: Vec<ServerId>,
}

impl ServersConfig {
    pub fn for_category(&self, category: Category) -> &[ServerId] {
        match category {
            Category::Meta => &self.meta,
            Category::Storage => &self.storage,
        }
    }
}

/// What to do with a category that has no configured servers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyCategoryPolicy {
    /// Produce no document and do not count the cycle as failed.
    #[default]
    Skip,
    /// Produce no document and count the cycle as failed.
    Fail,
}

/// How a category reacts when some of its servers could not be fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialFetchPolicy {
    /// Any failed fetch skips the category for the cycle.
    #[default]
    AbortCategory,
    /// Aggregate whatever was fetched; only an all-failed category is skipped.
    Tolerate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Consecutive failed cycles tolerated before the agent exits.
    #[serde(default = "default_failure_budget")]
    pub failure_budget: u32,
    /// Cycles after which the failure counter is cleared unconditionally.
    #[serde(default = "default_reset_window_cycles")]
    pub reset_window_cycles: u32,
    #[serde(default)]
    pub empty_category: EmptyCategoryPolicy,
    #[serde(default)]
    pub partial_fetch: PartialFetchPolicy,
}

impl CollectorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            failure_budget: default_failure_budget(),
            reset_window_cycles: default_reset_window_cycles(),
            empty_category: EmptyCategoryPolicy::default(),
            partial_fetch: PartialFetchPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

fn default_store_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_sink_port() -> u16 {
    9200
}

fn default_namespace() -> String {
    "fhgfs".to_string()
}

fn default_sink_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_failure_budget() -> u32 {
    5
}

fn default_reset_window_cycles() -> u32 {
    10
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Upper bound on `store.timeout`; it also serves as SQLite's busy timeout.
const MAX_STORE_TIMEOUT: Duration = Duration::from_secs(3600);

/// Characters the sink refuses in collection names.
const FORBIDDEN_NAMESPACE_CHARS: &[char] = &['/', '\\', '*', '?', '"', '<', '>', '|', ' ', ',', '#'];

impl RelayConfig {
    /// Read, parse and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate config text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: RelayConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.path.as_os_str().is_empty() {
            return Err(invalid("store.path must not be empty"));
        }
        if self.store.timeout.is_zero() {
            return Err(invalid("store.timeout must be greater than zero"));
        }
        if self.store.timeout > MAX_STORE_TIMEOUT {
            return Err(invalid(format!(
                "store.timeout must not exceed {}s",
                MAX_STORE_TIMEOUT.as_secs()
            )));
        }

        if self.sink.host.trim().is_empty() {
            return Err(invalid("sink.host must not be empty"));
        }
        if self.sink.port == 0 {
            return Err(invalid("sink.port must not be 0"));
        }
        if self.sink.timeout.is_zero() {
            return Err(invalid("sink.timeout must be greater than zero"));
        }
        validate_namespace(&self.sink.namespace)?;

        for category in Category::ALL {
            let mut seen = HashSet::new();
            for id in self.servers.for_category(category) {
                if !seen.insert(id) {
                    return Err(invalid(format!(
                        "duplicate server '{id}' in servers.{category}"
                    )));
                }
            }
        }

        let c = &self.collector;
        if c.poll_interval_secs == 0 {
            return Err(invalid("collector.poll_interval_secs must be positive"));
        }
        if c.failure_budget == 0 {
            return Err(invalid("collector.failure_budget must be positive"));
        }
        if c.reset_window_cycles == 0 {
            return Err(invalid("collector.reset_window_cycles must be positive"));
        }
        Ok(())
    }
}

fn validate_namespace(namespace: &str) -> Result<(), ConfigError> {
    if namespace.is_empty() {
        return Err(invalid("sink.namespace must not be empty"));
    }
    if namespace.chars().any(|c| c.is_uppercase()) {
        return Err(invalid(format!("sink.namespace '{namespace}' must be lower-case")));
    }
    if let Some(c) = namespace.chars().find(|c| FORBIDDEN_NAMESPACE_CHARS.contains(c)) {
        return Err(invalid(format!(
            "sink.namespace '{namespace}' contains forbidden character '{c}'"
        )));
    }
    Ok(())
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

/// Parse a duration string like "5s", "500ms", "2m", or bare seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}

/// Serde adapter for human-readable duration strings.
mod duration_str {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        if d.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", d.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", d.as_millis()))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_duration(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid duration '{s}'")))
    }
}
