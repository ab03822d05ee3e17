use std::path::{Path, PathBuf};

use folformal::options::ParseOptions;
use log::debug;
use serde::{Deserialize, Serialize};
use strum::EnumIs;

use crate::{
    error::{ReportError, ReportResult},
    magic::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, ENV_CONFIG_PATH},
};

/// What the batch driver does after a record fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumIs, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Report the failure in the summary and keep processing.
    #[default]
    Skip,
    /// Stop handing out records and return the first error.
    Abort,
}

/// Report configuration, usually read from a TOML file:
///
/// ```toml
/// max_depth = 100
/// threads = 4
/// failure_policy = "skip"
/// pretty_json = true
/// ```
///
/// Missing keys take their default value; unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Nesting limit handed to the parser and composer.
    pub max_depth: usize,
    /// Number of batch workers; `0` uses the available parallelism.
    pub threads: usize,
    pub failure_policy: FailurePolicy,
    /// Indent JSON documents.
    pub pretty_json: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_depth: ParseOptions::DEFAULT_MAX_DEPTH,
            threads: 0,
            failure_policy: FailurePolicy::Skip,
            pretty_json: true,
        }
    }
}

impl ReportConfig {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::with_max_depth(self.max_depth)
    }

    /// Resolved number of workers, at least one.
    pub fn worker_count(&self) -> usize {
        match self.threads {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => n,
        }
    }

    /// Get the default path to the configuration file.
    pub fn default_path() -> PathBuf {
        if let Ok(config_path) = std::env::var(ENV_CONFIG_PATH) {
            return config_path.into();
        }

        let mut path = PathBuf::new();

        #[cfg(target_os = "windows")]
        {
            if let Ok(appdata) = std::env::var("APPDATA") {
                path.push(appdata);
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
                path.push(xdg_config_home);
            } else if let Ok(home) = std::env::var("HOME") {
                path.push(home);
                path.push(".config");
            }
        }

        path.push(CONFIG_DIR_NAME);
        path.push(CONFIG_FILE_NAME);
        path
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(toml_str: &str) -> ReportResult<Self> {
        toml::from_str(toml_str).map_err(|e| ReportError::ConfigParseError {
            source: e,
            file: "<string>".to_string(),
        })
    }

    /// Load a configuration from a TOML file.
    pub fn load_from_toml(path: &Path) -> ReportResult<Self> {
        let toml_str = std::fs::read_to_string(path)?;

        toml::from_str(&toml_str).map_err(|e| ReportError::ConfigParseError {
            source: e,
            file: path.display().to_string(),
        })
    }

    /// Load the file at [`ReportConfig::default_path`], or the defaults when it does not exist.
    pub fn load_or_default() -> ReportResult<Self> {
        let path = Self::default_path();
        if !path.exists() {
            debug!(
                "No configuration at `{}`, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_toml(&path)
    }

    /// Save the configuration to a TOML file, creating parent directories as needed.
    pub fn save_to_toml(&self, path: &Path) -> ReportResult<()> {
        let toml_str = toml::to_string(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, toml_str)?;
        Ok(())
    }
}
