//! Configuration for the schema converter
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schemas-to-ts.toml)
//! - Environment variables (SCHEMAS_TO_TS__*)
//!
//! ## Example config file (schemas-to-ts.toml):
//! ```toml
//! accepted_runtime_modes = ["development"]
//! verbose_logging = false
//! always_suffix_component_names = false
//! use_external_formatter_if_available = true
//! ids_to_ignore = [
//!     "plugin::upload.folder",
//!     { pattern = "plugin::content-releases\\..*" },
//! ]
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Converter configuration
///
/// Passed by reference into every conversion stage; nothing reads ambient
/// state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Runtime modes in which the conversion is allowed to run
    #[serde(default = "default_runtime_modes")]
    pub accepted_runtime_modes: Vec<String>,

    /// Log every skipped and converted schema
    #[serde(default)]
    pub verbose_logging: bool,

    /// Accepted for compatibility; currently has no effect on the output
    #[serde(default)]
    pub always_suffix_enum_names: bool,

    /// Schema ids to leave out of the generated module
    #[serde(default = "default_ids_to_ignore")]
    pub ids_to_ignore: Vec<IgnoreRule>,

    /// Append `Component` to every component declaration name
    #[serde(default)]
    pub always_suffix_component_names: bool,

    /// Run the external formatter when a config for it is found
    #[serde(default = "default_true")]
    pub use_external_formatter_if_available: bool,
}

/// One entry of the ignore list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IgnoreRule {
    /// Matches the id exactly, and is also tried as a pattern
    Exact(String),
    /// Only tried as a regular expression
    Pattern { pattern: String },
}

impl IgnoreRule {
    /// Build a pattern-only rule
    pub fn pattern(pattern: impl Into<String>) -> Self {
        IgnoreRule::Pattern { pattern: pattern.into() }
    }

    /// The text used when the rule is compiled as a regular expression
    pub fn pattern_source(&self) -> &str {
        match self {
            IgnoreRule::Exact(s) => s,
            IgnoreRule::Pattern { pattern } => pattern,
        }
    }
}

impl From<&str> for IgnoreRule {
    fn from(s: &str) -> Self {
        IgnoreRule::Exact(s.to_string())
    }
}

// Default value functions
fn default_runtime_modes() -> Vec<String> {
    vec!["development".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_ids_to_ignore() -> Vec<IgnoreRule> {
    vec![
        IgnoreRule::from("plugin::upload.folder"),
        IgnoreRule::from("plugin::i18n.locale"),
        IgnoreRule::pattern(r"plugin::content-releases\..*"),
        IgnoreRule::from("plugin::users-permissions.permission"),
        IgnoreRule::pattern(r"plugin::review-workflows\..*"),
    ]
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            accepted_runtime_modes: default_runtime_modes(),
            verbose_logging: false,
            always_suffix_enum_names: false,
            ids_to_ignore: default_ids_to_ignore(),
            always_suffix_component_names: false,
            use_external_formatter_if_available: true,
        }
    }
}

impl PluginConfig {
    /// Load configuration, layering a specific file over the default locations
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "schemas-to-ts.toml",
            ".schemas-to-ts.toml",
            "config/schemas-to-ts.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "schemas-to-ts", "schemas-to-ts") {
            let xdg_config = config_dir.config_dir().join("schemas-to-ts.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("SCHEMAS_TO_TS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Whether the converter may run in the given runtime mode
    pub fn accepts_mode(&self, mode: &str) -> bool {
        self.accepted_runtime_modes.iter().any(|m| m == mode)
    }
}
