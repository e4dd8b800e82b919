//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/tricheck/tricheck.toml`
//! 3. Explicit config file (e.g. `--config <file>`)
//! 4. Environment variables: `TRICHECK_*` prefix, `__` between nested keys

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::FieldNames;

/// Raw field names for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawFieldNames {
    pub label: Option<String>,
    pub value: Option<String>,
    pub children: Option<String>,
    pub checked: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub close_deeper_columns: Option<bool>,
    pub reconcile_on_build: Option<bool>,
    pub fields: RawFieldNames,
}

/// Settings of one checkbox tree instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Close columns right of an activated row before opening its children
    pub close_deeper_columns: bool,
    /// Re-derive parent states from children right after construction
    pub reconcile_on_build: bool,
    /// Record field names read during construction
    pub fields: FieldNames,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            close_deeper_columns: true,
            reconcile_on_build: false,
            fields: FieldNames::default(),
        }
    }
}

/// Get the XDG config directory for tricheck.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tricheck").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("tricheck.toml"))
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
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let fields = &overlay.fields;
        Self {
            close_deeper_columns: overlay
                .close_deeper_columns
                .unwrap_or(self.close_deeper_columns),
            reconcile_on_build: overlay.reconcile_on_build.unwrap_or(self.reconcile_on_build),
            fields: FieldNames {
                label: fields
                    .label
                    .clone()
                    .unwrap_or_else(|| self.fields.label.clone()),
                value: fields
                    .value
                    .clone()
                    .unwrap_or_else(|| self.fields.value.clone()),
                children: fields
                    .children
                    .clone()
                    .unwrap_or_else(|| self.fields.children.clone()),
                checked: fields
                    .checked
                    .clone()
                    .unwrap_or_else(|| self.fields.checked.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; must exist if given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        Self::apply_env_overrides(current)
    }

    /// Load from a single file on top of the defaults, ignoring global config and env.
    pub fn from_file(path: &Path) -> Result<Self, ApplicationError> {
        Ok(Self::default().merge_with(&load_raw_settings(path)?))
    }

    /// Apply TRICHECK_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TRICHECK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(config.get_bool("close_deeper_columns"))? {
            settings.close_deeper_columns = val;
        }
        if let Some(val) = env_value(config.get_bool("reconcile_on_build"))? {
            settings.reconcile_on_build = val;
        }
        if let Some(val) = env_value(config.get_string("fields.label"))? {
            settings.fields.label = val;
        }
        if let Some(val) = env_value(config.get_string("fields.value"))? {
            settings.fields.value = val;
        }
        if let Some(val) = env_value(config.get_string("fields.children"))? {
            settings.fields.children = val;
        }
        if let Some(val) = env_value(config.get_string("fields.checked"))? {
            settings.fields.checked = val;
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
        r#"# tricheck configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/tricheck/tricheck.toml
#   File:   --config <file>
#   Env:    TRICHECK_* environment variables, e.g. TRICHECK_FIELDS__LABEL=name

# Close columns right of an activated row before opening its children.
# With false, re-activating a row whose children are open keeps deeper columns.
# close_deeper_columns = true

# Re-derive parent states from their children right after loading the tree
# reconcile_on_build = false

[fields]
# Record field names
# label = "label"
# value = "value"
# children = "children"
# checked = "checked"
"#
        .to_string()
    }
}

/// An unset variable is `None`; a set but malformed one is an error.
fn env_value<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match result {
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
