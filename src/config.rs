//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treelayout/treelayout.toml`
//! 3. Local config: `--config <file>` or `./.treelayout.toml`
//! 4. Environment variables: `TREELAYOUT_*` prefix (e.g. `TREELAYOUT_LAYOUT__SPACE_X=30`)
//!
//! Command-line flags are applied on top by the CLI.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{LayoutConfig, Orientation};

/// File name of a local config file in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".treelayout.toml";

/// Node size, spacing and orientation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    pub node_width: f64,
    pub node_height: f64,
    pub space_x: f64,
    pub space_y: f64,
    pub orientation: Orientation,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        let config = LayoutConfig::default();
        Self {
            node_width: config.node_width,
            node_height: config.node_height,
            space_x: config.space_x,
            space_y: config.space_y,
            orientation: Orientation::Horizontal,
        }
    }
}

/// Raw layout settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutSettings {
    pub node_width: Option<f64>,
    pub node_height: Option<f64>,
    pub space_x: Option<f64>,
    pub space_y: Option<f64>,
    pub orientation: Option<Orientation>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub layout: RawLayoutSettings,
}

impl LayoutSettings {
    /// Overlay wins for every field it specifies.
    pub fn merge(&self, overlay: &RawLayoutSettings) -> Self {
        Self {
            node_width: overlay.node_width.unwrap_or(self.node_width),
            node_height: overlay.node_height.unwrap_or(self.node_height),
            space_x: overlay.space_x.unwrap_or(self.space_x),
            space_y: overlay.space_y.unwrap_or(self.space_y),
            orientation: overlay.orientation.unwrap_or(self.orientation),
        }
    }

    /// Sizes and spacing for the pure layout functions.
    pub fn to_config(&self) -> LayoutConfig {
        LayoutConfig {
            node_width: self.node_width,
            node_height: self.node_height,
            space_x: self.space_x,
            space_y: self.space_y,
        }
    }
}

/// Unified configuration for treelayout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutSettings,
}

/// Get the XDG config directory for treelayout.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treelayout").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treelayout.toml"))
}

/// Get the path of the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional local config file; it must exist when given
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), local)
    }

    /// Load with explicit file layers.
    ///
    /// A missing global file is skipped, a missing local file is an error.
    pub fn load_layers(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(local_path) = local {
            if !local_path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", local_path.display()),
                });
            }
            debug!("loading local config {}", local_path.display());
            let raw = load_raw_settings(local_path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        Self::apply_env_overrides(current)
    }

    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            layout: self.layout.merge(&overlay.layout),
        }
    }

    /// Apply TREELAYOUT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("TREELAYOUT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Some(val) = env_value::<f64>(&config, "layout.node_width")? {
            settings.layout.node_width = val;
        }
        if let Some(val) = env_value::<f64>(&config, "layout.node_height")? {
            settings.layout.node_height = val;
        }
        if let Some(val) = env_value::<f64>(&config, "layout.space_x")? {
            settings.layout.space_x = val;
        }
        if let Some(val) = env_value::<f64>(&config, "layout.space_y")? {
            settings.layout.space_y = val;
        }
        if let Some(val) = env_value::<String>(&config, "layout.orientation")? {
            settings.layout.orientation = val.parse()?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treelayout configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treelayout/treelayout.toml
#   Local:  ./.treelayout.toml or --config <file>
#   Env:    TREELAYOUT_* environment variables, e.g. TREELAYOUT_LAYOUT__SPACE_X=30
#   Flags:  --node-width, --node-height, --space-x, --space-y, --orientation

[layout]
# Fixed size of every node box
# node_width = 120
# node_height = 60

# Gap between siblings (horizontal) or between levels (vertical)
# space_x = 20

# Gap between levels (horizontal) or between siblings (vertical)
# space_y = 80

# horizontal | vertical ("radial" is rejected by the layout engine)
# orientation = "horizontal"
"#
        .to_string()
    }
}

/// Unset keys are skipped; values that do not convert are errors.
fn env_value<T: DeserializeOwned>(config: &Config, key: &str) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
