use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct GraphSettings {
    /// Expand linear pools through their wrapped token instead of the bare main token.
    #[serde(default = "default_false")]
    pub wrap_main_tokens: bool,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            wrap_main_tokens: default_false(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LookupSettings {
    /// Per-source timeout for a single pool lookup.
    #[serde(default = "default_lookup_timeout_ms")]
    pub timeout_ms: u64,
    /// Sources beyond this count are ignored by the fallback repository.
    #[serde(default = "default_max_sources")]
    pub max_sources: usize,
}

impl LookupSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_lookup_timeout_ms(),
            max_sources: default_max_sources(),
        }
    }
}

fn default_false() -> bool {
    false
}
fn default_lookup_timeout_ms() -> u64 {
    8_000
}
fn default_max_sources() -> usize {
    4
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub graph: GraphSettings,
    #[serde(default)]
    pub lookup: LookupSettings,
}

impl Settings {
    /// Loads `PoolGraph.toml` from the working directory if present, then applies
    /// `POOL_GRAPH__<SECTION>__<KEY>` environment overrides.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_path("PoolGraph.toml")
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("POOL_GRAPH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = s.try_deserialize()?;
        if settings.lookup.max_sources == 0 {
            return Err(ConfigError::Message(
                "lookup.max_sources must be at least 1".to_string(),
            ));
        }
        Ok(settings)
    }
}
