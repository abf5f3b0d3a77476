//! Validation of merged settings

use std::path::Path;

use crate::core::filter::compile_patterns;
use crate::error::{DepqError, Result};
use crate::models::config::Settings;

/// Settings validator for ensuring configuration is valid
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate settings and return errors if invalid
    pub fn validate(settings: &Settings) -> Result<()> {
        if !settings.base_dir.is_dir() {
            return Err(DepqError::InvalidPath {
                path: settings.base_dir.clone(),
            });
        }

        compile_patterns(&settings.ignore_patterns, settings.pattern_syntax)?;
        compile_patterns(&settings.include_patterns, settings.pattern_syntax)?;

        if settings.max_packages == Some(0) {
            return Err(DepqError::config_error("max_packages must be at least 1"));
        }

        if let Some(goroot) = &settings.goroot {
            if !goroot.is_dir() {
                return Err(DepqError::InvalidPath {
                    path: goroot.clone(),
                });
            }
        }

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    /// The directory an output file goes into must already exist
    fn validate_output_path(path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
                Err(DepqError::OutputDirectoryNotFound {
                    path: parent.to_path_buf(),
                })
            }
            _ => Ok(()),
        }
    }
}
