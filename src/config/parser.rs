//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use super::file::DEFAULT_CONFIG_FILE;
use crate::error::{DepqError, Result, ResultExt};
use crate::models::config::PartialSettings;

/// Parse a TOML configuration file into PartialSettings
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DepqError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| DepqError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config_content(&content, path)
}

/// Parse TOML configuration content into PartialSettings
pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    let settings: PartialSettings = toml::from_str(content).map_err(|e| DepqError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate_partial_settings(&settings, path)?;

    Ok(settings)
}

/// Validate partial settings for obvious errors.
///
/// Pattern compilation is left to [`super::SettingsValidator`] since the
/// syntax may come from another source.
pub fn validate_partial_settings<P: AsRef<Path>>(
    settings: &PartialSettings,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let invalid = |message: String| {
        DepqError::config_error(format!("{} in config file: {}", message, path.display()))
    };

    if let Some(base_dir) = &settings.base_dir {
        if base_dir.as_os_str().is_empty() {
            return Err(invalid("Invalid empty base_dir".to_string()));
        }
    }

    if let Some(roots) = &settings.roots {
        if roots.iter().any(|root| root.trim().is_empty()) {
            return Err(invalid("Empty root package".to_string()));
        }
    }

    let pattern_lists = [
        ("ignore_patterns", &settings.ignore_patterns),
        ("include_patterns", &settings.include_patterns),
        ("stop_at", &settings.stop_at),
    ];
    for (field, patterns) in pattern_lists {
        if let Some(patterns) = patterns {
            if patterns.iter().any(String::is_empty) {
                return Err(invalid(format!("Empty entry in {}", field)));
            }
        }
    }

    if settings.max_packages == Some(0) {
        return Err(invalid("Invalid max_packages 0 (must be at least 1)".to_string()));
    }

    if let Some(output_file) = &settings.output_file {
        if output_file.as_os_str().is_empty() {
            return Err(invalid("Invalid empty output_file".to_string()));
        }
    }

    Ok(())
}

/// Candidate configuration files, most specific first
pub fn default_config_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
    if let Some(home_dir) = dirs::home_dir() {
        locations.push(home_dir.join(DEFAULT_CONFIG_FILE));
    }
    if let Some(config_dir) = dirs::config_dir() {
        locations.push(config_dir.join("depq").join("config.toml"));
    }
    locations
}

/// Find and load configuration from default locations
pub fn find_default_config() -> Result<Option<PartialSettings>> {
    for location in default_config_locations() {
        if location.is_file() {
            tracing::debug!(path = %location.display(), "found default configuration");
            return Ok(Some(parse_config_file(location)?));
        }
    }
    Ok(None)
}

/// Create a default configuration file at the specified path
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    let default_config = include_str!("default_config.toml");
    fs::write(path, default_config).with_context(|| format!("writing {}", path.display()))?;

    Ok(())
}
