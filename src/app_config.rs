use crate::device_directory::DuplicatePolicy;
use crate::domain::directive::FrontendParams;
use crate::platform_table::PlatformTable;
use config::{Config, ConfigError};
use serde::de::Unexpected;
use serde::{Deserialize, Deserializer, de};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::Level;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    core: Core,
    devices: Devices,
    directives: Directives,
    #[serde(default)]
    certificates: Certificates,
    #[serde(default)]
    platforms: Platforms,
    #[serde(default)]
    reload: Reload,
    #[serde(default)]
    frontend: FrontendParams,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::with_prefix("GLASSHOUSE").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn devices(&self) -> &Devices {
        &self.devices
    }

    pub fn directives(&self) -> &Directives {
        &self.directives
    }

    pub fn certificates(&self) -> &Certificates {
        &self.certificates
    }

    pub fn reload(&self) -> &Reload {
        &self.reload
    }

    pub fn frontend(&self) -> &FrontendParams {
        &self.frontend
    }

    /// Built-in platform tables extended with the configured aliases and structured output platforms.
    pub fn platform_table(&self) -> PlatformTable {
        PlatformTable::default().extend(&self.platforms.aliases, &self.platforms.supported, &self.platforms.structured_output)
    }
}

#[derive(Debug, Deserialize)]
pub struct Core {
    #[serde(default = "default_log_level", deserialize_with = "deserialize_level")]
    log_level: Level,
}

impl Core {
    pub fn log_level(&self) -> Level {
        self.log_level
    }
}

impl Default for Core {
    fn default() -> Self {
        Core { log_level: default_log_level() }
    }
}

fn default_log_level() -> Level {
    Level::INFO
}

fn deserialize_level<'de, D>(deserializer: D) -> Result<Level, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    value
        .parse()
        .map_err(|_| de::Error::invalid_value(Unexpected::Str(&value), &"one of trace, debug, info, warn or error"))
}

#[derive(Debug, Deserialize)]
pub struct Devices {
    file: String,
    #[serde(default)]
    duplicate_ids: DuplicatePolicy,
}

impl Devices {
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn duplicate_ids(&self) -> DuplicatePolicy {
        self.duplicate_ids
    }
}

#[derive(Debug, Deserialize)]
pub struct Directives {
    directory: String,
    #[serde(default = "default_extension")]
    extension: String,
}

impl Directives {
    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

fn default_extension() -> String {
    "json".to_string()
}

#[derive(Debug, Deserialize)]
pub struct Certificates {
    directory: String,
}

impl Certificates {
    pub fn directory(&self) -> &Path {
        Path::new(&self.directory)
    }
}

impl Default for Certificates {
    fn default() -> Self {
        Certificates { directory: "certs".to_string() }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Platforms {
    #[serde(default)]
    aliases: HashMap<String, String>,
    #[serde(default)]
    supported: Vec<String>,
    #[serde(default)]
    structured_output: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Reload {
    #[serde(default, with = "humantime_serde")]
    interval: Option<Duration>,
}

impl Reload {
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        let resources = format!("{}/tests/resources", env!("CARGO_MANIFEST_DIR"));
        AppConfigBuilder {
            config: AppConfig {
                core: Core::default(),
                devices: Devices {
                    file: format!("{}/devices.json", resources),
                    duplicate_ids: DuplicatePolicy::Reject,
                },
                directives: Directives {
                    directory: format!("{}/directives", resources),
                    extension: default_extension(),
                },
                certificates: Certificates {
                    directory: std::env::temp_dir().join("glasshouse-certs").to_string_lossy().into_owned(),
                },
                platforms: Platforms::default(),
                reload: Reload::default(),
                frontend: FrontendParams::default(),
            },
        }
    }

    pub fn devices_file(mut self, file: String) -> Self {
        self.config.devices.file = file;
        self
    }

    pub fn directives_directory(mut self, directory: String) -> Self {
        self.config.directives.directory = directory;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
