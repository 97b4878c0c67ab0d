// SPDX-License-Identifier: MIT OR Apache-2.0
use anyhow::Result;
use lapse_core::config::{CounterConfig, LapseConfig, StopwatchConfig, TasksConfig};
use lapse_core::error::{LapseError, LapseResult};
use log::LevelFilter;
use serde::Deserialize;
use smol::fs;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use xdg::BaseDirectories;

/// XDG prefix of the lapse configuration directories.
pub const XDG_PREFIX: &str = "lapse";

/// Name of the configuration file looked up in every XDG location.
pub const CONFIG_FILE: &str = "config.toml";

/// The main configuration structure for the application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General application settings
    #[serde(default)]
    pub general: GeneralSettings,
    /// Stopwatch settings
    #[serde(default)]
    pub stopwatch: StopwatchSettings,
    /// Counter settings
    #[serde(default)]
    pub counter: CounterSettings,
    /// Task runner settings
    #[serde(default)]
    pub tasks: TasksSettings,
    /// Any other sections are captured here
    #[serde(flatten)]
    pub other: HashMap<String, toml::Value>,
}

impl Config {
    /// Parse a configuration file's contents.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralSettings {
    pub debug: Option<bool>,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopwatchSettings {
    pub tick_period_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CounterSettings {
    pub initial: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TasksSettings {
    pub workers: Option<usize>,
    pub stack_size: Option<usize>,
}

/// Registry for managing application settings.
#[derive(Debug, Default)]
pub struct SettingsRegistry {
    config: Config,
}

impl SettingsRegistry {
    /// Create a new SettingsRegistry and load configuration from standard locations.
    pub async fn new() -> Result<Self> {
        let mut registry = Self::empty();
        registry.load().await?;
        Ok(registry)
    }

    /// A registry holding only defaults, without touching the file system.
    pub fn empty() -> Self {
        Self {
            config: Config {
                general: GeneralSettings {
                    debug: Some(false),
                    log_level: None,
                },
                ..Default::default()
            },
        }
    }

    /// Load configuration from standard locations in precedence order.
    ///
    /// Order (later overrides earlier):
    /// 1. System Data: /usr/share/lapse/config.toml (and XDG_DATA_DIRS)
    /// 2. System Config: /etc/xdg/lapse/config.toml (and XDG_CONFIG_DIRS)
    /// 3. User Config: ~/.config/lapse/config.toml (XDG_CONFIG_HOME)
    pub async fn load(&mut self) -> Result<()> {
        let xdg_dirs = BaseDirectories::with_prefix(XDG_PREFIX)?;

        // 1. Load from system data directories
        for path in xdg_dirs.find_data_files(CONFIG_FILE).rev() {
            self.load_file(&path).await;
        }

        // 2. Load from system config directories
        for path in xdg_dirs.find_config_files(CONFIG_FILE).rev() {
            self.load_file(&path).await;
        }

        // 3. Load from user config directory
        if let Some(user_config_path) = xdg_dirs.find_config_file(CONFIG_FILE) {
            self.load_file(&user_config_path).await;
        } else {
            let user_config_path = xdg_dirs.get_config_home().join(CONFIG_FILE);
            if user_config_path.exists() {
                self.load_file(&user_config_path).await;
            }
        }

        Ok(())
    }

    async fn load_file(&mut self, path: &Path) {
        log::info!("Loading config from: {:?}", path);
        match fs::read_to_string(path).await {
            Ok(content) => match Config::from_toml(&content) {
                Ok(loaded_config) => {
                    self.merge(loaded_config);
                },
                Err(e) => {
                    log::error!("Failed to parse config file {:?}: {}", path, e);
                },
            },
            Err(e) => {
                log::warn!("Failed to read config file {:?}: {}", path, e);
            },
        }
    }

    /// Merge a loaded config into the current config.
    fn merge(&mut self, other: Config) {
        // General
        if let Some(debug) = other.general.debug {
            self.config.general.debug = Some(debug);
        }
        if other.general.log_level.is_some() {
            self.config.general.log_level = other.general.log_level;
        }

        // Stopwatch
        if other.stopwatch.tick_period_ms.is_some() {
            self.config.stopwatch.tick_period_ms = other.stopwatch.tick_period_ms;
        }

        // Counter
        if other.counter.initial.is_some() {
            self.config.counter.initial = other.counter.initial;
        }

        // Tasks
        if other.tasks.workers.is_some() {
            self.config.tasks.workers = other.tasks.workers;
        }
        if other.tasks.stack_size.is_some() {
            self.config.tasks.stack_size = other.tasks.stack_size;
        }

        // Other
        self.config.other.extend(other.other);
    }

    /// Get the current configuration.
    pub fn get(&self) -> &Config {
        &self.config
    }

    /// Load configuration from multiple custom paths asynchronously.
    ///
    /// Unlike the standard lookup, failures are reported per path instead of only being logged.
    pub async fn load_from_paths_async(&mut self, paths: Vec<PathBuf>) -> Vec<Result<()>> {
        let mut results = Vec::new();

        for path in paths {
            let result = async {
                let content = fs::read_to_string(&path)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to read config file {:?}: {}", path, e))?;

                let loaded_config = Config::from_toml(&content)
                    .map_err(|e| anyhow::anyhow!("Failed to parse config file {:?}: {}", path, e))?;

                self.merge(loaded_config);
                Ok(())
            }
            .await;

            results.push(result);
        }

        results
    }

    /// Reload configuration asynchronously (re-runs the full load process).
    pub async fn reload_async(&mut self) -> Result<()> {
        *self = Self::empty();
        self.load().await
    }

    /// The log level to install, if one is configured.
    ///
    /// An explicit `general.log_level` wins; otherwise `general.debug = true` means [LevelFilter::Debug].
    pub fn log_level(&self) -> LapseResult<Option<LevelFilter>> {
        match &self.config.general.log_level {
            Some(level) => level
                .parse::<LevelFilter>()
                .map(Some)
                .map_err(|e| LapseError::invalid_setting("general.log_level", format!("{level:?}: {e}"))),
            None if self.config.general.debug == Some(true) => Ok(Some(LevelFilter::Debug)),
            None => Ok(None),
        }
    }

    /// Build the runtime configuration from the loaded settings.
    pub fn to_config(&self) -> LapseResult<LapseConfig> {
        let mut stopwatch = StopwatchConfig::default();
        if let Some(ms) = self.config.stopwatch.tick_period_ms {
            if ms == 0 {
                return Err(LapseError::invalid_setting(
                    "stopwatch.tick_period_ms",
                    "must be greater than zero",
                ));
            }
            stopwatch.tick_period = Duration::from_millis(ms);
        }

        let counter = CounterConfig {
            initial: self.config.counter.initial.unwrap_or_default(),
        };

        let settings = &self.config.tasks;
        let tasks = if settings.workers.is_some() || settings.stack_size.is_some() {
            let mut tasks = TasksConfig::default();
            if let Some(workers) = settings.workers {
                tasks.workers = NonZeroUsize::new(workers).ok_or_else(|| {
                    LapseError::invalid_setting("tasks.workers", "must be at least 1")
                })?;
            }
            if let Some(stack_size) = settings.stack_size {
                tasks.stack_size = stack_size;
            }
            Some(tasks)
        } else {
            None
        };

        let config = LapseConfig {
            tasks,
            stopwatch,
            counter,
        };
        config.validate()?;
        Ok(config)
    }
}
