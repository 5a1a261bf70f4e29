//! Editor configuration: parsing, validation, and loading.
//!
//! A TOML document with four optional sections; every field has a default,
//! so an empty file is a valid configuration.
//!
//! ```toml
//! [viewport]
//! width = 800.0
//! height = 600.0
//! [viewport.margins]
//! left = 60.0
//! right = 20.0
//! top = 20.0
//! bottom = 60.0
//!
//! [mapping]
//! price_padding = 0.0          # fraction of the price range added on each side
//! fallback_price_span = 1.0    # span used for a flat series
//! fallback_time_span_secs = 86400
//!
//! [session]
//! skip_duplicate_points = true
//!
//! [import]
//! legacy_gap_secs = 30
//! ```
//!
//! Entrypoints:
//! - Parse + validate from a TOML string: [`load_config_str`]
//! - Parse + validate from a file path: [`load_config_path`]
//! - Path taken from `PATTERN_CANVAS_CONFIG`, defaults otherwise: [`load_config_from_env`]

use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mapper::MappingOptions;
use crate::models::viewport::Viewport;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "PATTERN_CANVAS_CONFIG";

/// Errors related to editor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Initial canvas geometry until the shell reports a real size.
    pub viewport: Viewport,
    pub mapping: MappingCfg,
    pub session: SessionCfg,
    pub import: ImportCfg,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingCfg {
    pub price_padding: f64,
    pub fallback_price_span: f64,
    pub fallback_time_span_secs: i64,
}

impl Default for MappingCfg {
    fn default() -> Self {
        Self {
            price_padding: 0.0,
            fallback_price_span: 1.0,
            fallback_time_span_secs: 86_400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionCfg {
    /// Drop a sample equal to the previous one. Only pointer-down and
    /// pointer-move record samples, so this never affects the release.
    pub skip_duplicate_points: bool,
}

impl Default for SessionCfg {
    fn default() -> Self {
        Self {
            skip_duplicate_points: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportCfg {
    /// Forward time gap that starts a new stroke in legacy pattern files.
    pub legacy_gap_secs: i64,
}

impl Default for ImportCfg {
    fn default() -> Self {
        Self { legacy_gap_secs: 30 }
    }
}

impl EditorConfig {
    pub fn mapping_options(&self) -> MappingOptions {
        MappingOptions {
            price_padding: self.mapping.price_padding,
            fallback_price_span: self.mapping.fallback_price_span,
            fallback_time_span: secs(self.mapping.fallback_time_span_secs),
        }
    }

    pub fn legacy_gap(&self) -> TimeDelta {
        secs(self.import.legacy_gap_secs)
    }

    /// Reject values that would make mapping or import meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let vp = &self.viewport;
        if !(vp.width.is_finite() && vp.height.is_finite()) || vp.width <= 0.0 || vp.height <= 0.0 {
            return Err(ConfigError::Invalid(
                "viewport width and height must be positive".into(),
            ));
        }
        let m = &vp.margins;
        if [m.left, m.right, m.top, m.bottom].iter().any(|v| *v < 0.0) {
            return Err(ConfigError::Invalid("viewport margins cannot be negative".into()));
        }
        if vp.drawable_width() <= 0.0 || vp.drawable_height() <= 0.0 {
            return Err(ConfigError::Invalid(
                "viewport margins leave no drawable area".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mapping.price_padding) {
            return Err(ConfigError::Invalid(
                "mapping.price_padding must be within 0.0..=1.0".into(),
            ));
        }
        if self.mapping.fallback_price_span <= 0.0 {
            return Err(ConfigError::Invalid(
                "mapping.fallback_price_span must be positive".into(),
            ));
        }
        if self.mapping.fallback_time_span_secs <= 0 {
            return Err(ConfigError::Invalid(
                "mapping.fallback_time_span_secs must be positive".into(),
            ));
        }
        if TimeDelta::try_seconds(self.mapping.fallback_time_span_secs).is_none() {
            return Err(ConfigError::Invalid(
                "mapping.fallback_time_span_secs is out of range".into(),
            ));
        }
        if self.import.legacy_gap_secs < 0 {
            return Err(ConfigError::Invalid(
                "import.legacy_gap_secs cannot be negative".into(),
            ));
        }
        if TimeDelta::try_seconds(self.import.legacy_gap_secs).is_none() {
            return Err(ConfigError::Invalid(
                "import.legacy_gap_secs is out of range".into(),
            ));
        }
        Ok(())
    }
}

/// Seconds as a `TimeDelta`, saturating for configs that skipped [`EditorConfig::validate`].
fn secs(value: i64) -> TimeDelta {
    TimeDelta::try_seconds(value).unwrap_or(if value < 0 {
        TimeDelta::MIN
    } else {
        TimeDelta::MAX
    })
}

/// Parse and validate a configuration from a TOML string.
pub fn load_config_str(toml_str: &str) -> Result<EditorConfig, ConfigError> {
    let cfg: EditorConfig = toml::from_str(toml_str)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Read a configuration file from disk, parse, and validate it.
pub fn load_config_path(path: impl AsRef<Path>) -> Result<EditorConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_str(&text)
}

/// Load the file named by [`CONFIG_ENV_VAR`], or defaults when it is unset.
pub fn load_config_from_env() -> Result<EditorConfig, ConfigError> {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) => load_config_path(PathBuf::from(path)),
        None => Ok(EditorConfig::default()),
    }
}
