//! Command-line configuration
//!
//! Read from `minipas.toml` in the working directory, or from an explicit
//! path. Every key is optional.
//!
//! ```toml
//! log_level = "debug"
//!
//! [output]
//! show_scopes = true
//! show_store = true
//!
//! [format]
//! indent = 2
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::render::RenderOptions;

/// File looked up by [`Config::discover`]
pub const CONFIG_FILE: &str = "minipas.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `tracing` filter directive, e.g. `debug` or `minipas=trace`
    pub log_level: Option<String>,
    pub output: OutputConfig,
    pub format: FormatConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Print each scope table when analysis leaves it
    pub show_scopes: bool,
    /// Print the runtime store after `run`
    pub show_store: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            show_scopes: false,
            show_store: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatConfig {
    /// Spaces per nesting level
    pub indent: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent: RenderOptions::default().indent,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> miette::Result<Self> {
        toml::from_str(text).map_err(|e| miette::miette!("Invalid configuration: {}", e))
    }

    /// Load an explicit configuration file
    pub fn load(path: &Path) -> miette::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| miette::miette!("Failed to read {}: {}", path.display(), e))?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_toml(&text)
    }

    /// `minipas.toml` in `dir` if present, defaults otherwise
    pub fn discover(dir: &Path) -> miette::Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            indent: self.format.indent,
        }
    }
}
