//! # Configuration Utilities
//!
//! Optional TOML settings for the `steg` binary. Every section and key may be
//! omitted; command-line flags take precedence over anything set here.
//!
//! # Example TOML
//!
//! ```toml
//! [logging]
//! level = "info"
//!
//! [embed]
//! auto_fit = false
//! filter = "lanczos3"
//!
//! [extract]
//! max_dimension = 10000
//! ```

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::processing::lsb::{LsbCodec, MAX_DIMENSION};
use crate::processing::payload::ResampleFilter;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: StegConfig = load_config("steg.toml")?;
/// ```
pub fn load_config<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: T = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegConfig {
    pub logging: LoggingConfig,
    pub embed: EmbedConfig,
    pub extract: ExtractConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.level
            .parse()
            .with_context(|| format!("invalid log level {:?}", self.level))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// Shrink images that do not fit instead of failing
    pub auto_fit: bool,
    /// Resampling filter used when shrinking
    pub filter: ResampleFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Largest believable width or height in a decoded header
    pub max_dimension: u32,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_dimension: MAX_DIMENSION,
        }
    }
}

impl StegConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_config(path)
    }

    /// Codec settings described by this configuration.
    pub fn codec(&self) -> LsbCodec {
        LsbCodec::new()
            .with_auto_fit(self.embed.auto_fit)
            .with_filter(self.embed.filter)
            .with_max_dimension(self.extract.max_dimension)
    }
}
