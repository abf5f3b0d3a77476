//! Configuration file and environment variable sources

use std::path::{Path, PathBuf};

use super::{parser, ConfigSource};
use crate::error::{DepqError, Result};
use crate::models::config::PartialSettings;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".depq.toml";

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
    priority: u8,
}

impl FileConfig {
    /// Create a new file configuration source with the default path
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "default config file".to_string(),
            priority: 20,
        }
    }

    /// Create a new file configuration source with a custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
            priority: 20,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Get the path of this configuration file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialSettings> {
        if !self.is_available() {
            return Err(DepqError::ConfigNotFound {
                path: self.path.clone(),
            });
        }

        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Variable suffixes understood by [`EnvConfig`]
const ENV_KEYS: &[&str] = &[
    "BASE_DIR",
    "ROOTS",
    "IGNORE",
    "INCLUDE",
    "PATTERN_SYNTAX",
    "TESTS",
    "STDLIB",
    "GOROOT",
    "GOPATH",
    "STOP_AT",
    "MAX_PACKAGES",
    "OUTPUT_FORMAT",
    "OUTPUT_FILE",
];

/// Environment variable configuration source.
///
/// List values are comma separated, except `GOPATH` which uses the platform
/// path separator.
pub struct EnvConfig {
    prefix: String,
    name: String,
    priority: u8,
}

impl EnvConfig {
    /// Create a new environment variable configuration source
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
            priority: 10,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, key))
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    fn list(&self, key: &str) -> Option<Vec<String>> {
        self.var(key).map(|value| {
            value
                .split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        })
    }

    fn flag(&self, key: &str) -> Result<Option<bool>> {
        let Some(value) = self.var(key) else {
            return Ok(None);
        };
        match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            other => Err(DepqError::config_error(format!(
                "{}_{} must be a boolean, got {:?}",
                self.prefix, key, other
            ))),
        }
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>>
    where
        T::Err: std::fmt::Display,
    {
        self.var(key)
            .map(|value| {
                value.trim().parse::<T>().map_err(|err| {
                    DepqError::config_error(format!("{}_{}: {}", self.prefix, key, err))
                })
            })
            .transpose()
    }
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        Ok(PartialSettings {
            base_dir: self.var("BASE_DIR").map(PathBuf::from),
            roots: self.list("ROOTS"),
            ignore_patterns: self.list("IGNORE"),
            include_patterns: self.list("INCLUDE"),
            pattern_syntax: self.parsed("PATTERN_SYNTAX")?,
            include_tests: self.flag("TESTS")?,
            include_stdlib: self.flag("STDLIB")?,
            goroot: self.var("GOROOT").map(PathBuf::from),
            gopath: self
                .var("GOPATH")
                .map(|value| std::env::split_paths(&value).collect()),
            stop_at: self.list("STOP_AT"),
            max_packages: self.parsed("MAX_PACKAGES")?,
            output_format: self.parsed("OUTPUT_FORMAT")?,
            output_file: self.var("OUTPUT_FILE").map(PathBuf::from),
            ..Default::default()
        })
    }

    fn is_available(&self) -> bool {
        ENV_KEYS.iter().any(|key| self.var(key).is_some())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
