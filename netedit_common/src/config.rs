//! Runtime configuration for an editing session.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::CommonError;

/// Session-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Separator between hierarchy levels in cell and net names.
    pub hierarchy_separator: char,
    /// Template used when `insert` has to create its own buffer.
    pub buffer_template: String,
    /// Suffix appended to the net name to name a created buffer.
    pub buffer_suffix: String,
    /// Prefix of automatically named downhill nets.
    pub insert_net_prefix: String,
    /// Log every query match.
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hierarchy_separator: '/',
            buffer_template: "BUF".to_string(),
            buffer_suffix: "_BUF".to_string(),
            insert_net_prefix: "_insert_cell_".to_string(),
            verbose: false,
        }
    }
}

impl Config {
    /// Starts a builder from the defaults.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CommonError::ConfigJson`] when the text is not a valid configuration.
    pub fn from_json_str(text: &str) -> Result<Self, CommonError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CommonError::ConfigIo`] if the file cannot be read and
    /// [`CommonError::ConfigJson`] if it does not parse.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CommonError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!("Loaded configuration from {}", path.as_ref().display());
        Self::from_json_str(&text)
    }

    /// Name given to a buffer created for `net`.
    #[must_use]
    pub fn buffer_name(&self, net: &str) -> String {
        format!("{net}{}", self.buffer_suffix)
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Sets the hierarchy separator.
    #[must_use]
    pub fn hierarchy_separator(mut self, separator: char) -> Self {
        self.config.hierarchy_separator = separator;
        self
    }

    /// Sets the template used for created buffers.
    #[must_use]
    pub fn buffer_template(mut self, template: impl Into<String>) -> Self {
        self.config.buffer_template = template.into();
        self
    }

    /// Sets the suffix used to name created buffers.
    #[must_use]
    pub fn buffer_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.buffer_suffix = suffix.into();
        self
    }

    /// Sets the prefix of automatically named downhill nets.
    #[must_use]
    pub fn insert_net_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.insert_net_prefix = prefix.into();
        self
    }

    /// Enables verbose query logging.
    #[must_use]
    pub fn verbose(mut self, on: bool) -> Self {
        self.config.verbose = on;
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}
