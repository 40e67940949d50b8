//! Application settings from YAML
//!
//! ```yaml
//! conf_dir: /home/me/.config/text-pipeline/conf
//! default_indent: "4 espaces"
//! script:
//!   loop_iteration_limit: 1000000
//!   recursion_limit: 256
//! ```

use crate::core::IndentStyle;
use crate::script::ScriptLimits;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up inside the configuration directory
pub const SETTINGS_FILE: &str = "settings.yaml";

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding the custom processor store
    #[serde(default = "default_conf_dir")]
    pub conf_dir: PathBuf,

    /// Execution budget for custom scripts
    #[serde(default)]
    pub script: ScriptLimits,

    /// Indentation for formatter steps added without an explicit one
    #[serde(default)]
    pub default_indent: IndentStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            conf_dir: default_conf_dir(),
            script: ScriptLimits::default(),
            default_indent: IndentStyle::default(),
        }
    }
}

/// `<platform config dir>/text-pipeline/conf`, or `./conf` when the platform has none
pub fn default_conf_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("text-pipeline").join("conf"))
        .unwrap_or_else(|| PathBuf::from("conf"))
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid settings file {}", path.display()))
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Resolve the settings for a run.
    ///
    /// An explicit `settings_path` must exist. Otherwise `settings.yaml` is
    /// read from the configuration directory if present. `conf_dir` always
    /// wins over the directory named in the file.
    pub fn load(settings_path: Option<&Path>, conf_dir: Option<&Path>) -> Result<Self> {
        let mut settings = match settings_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let dir = conf_dir.map(Path::to_path_buf).unwrap_or_else(default_conf_dir);
                let candidate = dir.join(SETTINGS_FILE);
                if candidate.is_file() {
                    Self::from_file(&candidate)?
                } else {
                    debug!("No settings file at {}, using defaults", candidate.display());
                    Self::default()
                }
            }
        };

        if let Some(dir) = conf_dir {
            settings.conf_dir = dir.to_path_buf();
        }
        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.script.loop_iteration_limit == 0 {
            anyhow::bail!("script.loop_iteration_limit must be greater than zero");
        }
        if self.script.recursion_limit == 0 {
            anyhow::bail!("script.recursion_limit must be greater than zero");
        }
        Ok(())
    }
}
