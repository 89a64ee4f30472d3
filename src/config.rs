use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shape::Rgba;

/// Environment variable naming a JSON config file read at startup.
pub const CONFIG_ENV_VAR: &str = "MASK_EDITOR_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Colours and widths used when painting the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub stroke_color: Rgba,
    pub stroke_width: f32,
    pub highlight_color: Rgba,
    pub highlight_width: f32,
    pub vertex_color: Rgba,
    pub vertex_radius: f32,
    pub path_color: Rgba,
    pub path_width: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            stroke_color: Rgba::rgb(0x25, 0x63, 0xeb),
            stroke_width: 2.0,
            highlight_color: Rgba::rgb(0xff, 0xea, 0x00),
            highlight_width: 3.0,
            vertex_color: Rgba::rgb(0xff, 0x00, 0x00),
            vertex_radius: 3.0,
            path_color: Rgba::rgba(0, 0, 0, 0.5),
            path_width: 1.0,
        }
    }
}

/// Editor settings. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Images wider than this are downscaled, keeping their aspect ratio.
    pub max_width: u32,
    /// Class index written at the start of every encoded line.
    pub class_index: u32,
    /// Alpha of the random fill colour given to each finished shape.
    pub fill_alpha: f32,
    pub style: RenderStyle,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_width: 800,
            class_index: 0,
            fill_alpha: 0.35,
            style: RenderStyle::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Read the file named by [`CONFIG_ENV_VAR`], if the variable is set.
    pub fn from_env() -> Option<Result<Self, ConfigError>> {
        let path = std::env::var_os(CONFIG_ENV_VAR)?;
        Some(Self::load(path))
    }

    /// Keep `self` if it passes [`Self::validate`], otherwise fall back to the defaults.
    pub fn validated_or_default(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(err) => {
                log::warn!("Discarding saved config: {err}");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_width == 0 {
            return Err(ConfigError::Invalid("max_width must be positive".to_owned()));
        }
        if !(0.0..=1.0).contains(&self.fill_alpha) {
            return Err(ConfigError::Invalid(format!(
                "fill_alpha must be within 0..=1, got {}",
                self.fill_alpha
            )));
        }
        Ok(())
    }
}
