//! Widget configuration module.
//!
//! Handles loading and validating `memories.toml`. Every option has a default
//! matching the host page contract, so the file is optional and sparse:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! container_id = "memories-grid"        # Grid container element id
//! inline_data_id = "memories-data"      # Embedded JSON manifest element id
//! carousel_class = "memories-carousel"  # Container class selecting carousel mode
//! manifest_path = "assets/memories/index.json"
//! stylesheet = "assets/css/memories.css"
//!
//! [carousel]
//! min_duration = 44.0         # Seconds, lower bound for row 1
//! seconds_per_image = 9.0     # Row 1 duration grows with the image count
//! second_row_speed = 0.9      # Row 2 duration as a fraction of row 1
//! second_row_offset = 0.3     # Row 2 start offset as a fraction of row 1
//!
//! [fallback]
//! count = 15
//! src_pattern = "assets/memories/{n}.webp"
//! title_pattern = "Photo {n}"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::ImageDescriptor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Widget configuration loaded from `memories.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetConfig {
    /// Id of the grid container element. No container, no widget.
    pub container_id: String,
    /// Id of the optional element holding an embedded JSON manifest.
    pub inline_data_id: String,
    /// Container class that switches the grid to carousel mode.
    pub carousel_class: String,
    /// Manifest path fetched relative to the page when no inline data is usable.
    pub manifest_path: String,
    /// Stylesheet linked from full-page renders.
    pub stylesheet: String,
    /// Carousel animation timing.
    pub carousel: CarouselConfig,
    /// Placeholder set used when the manifest cannot be fetched.
    pub fallback: FallbackConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            container_id: "memories-grid".to_string(),
            inline_data_id: "memories-data".to_string(),
            carousel_class: "memories-carousel".to_string(),
            manifest_path: "assets/memories/index.json".to_string(),
            stylesheet: "assets/css/memories.css".to_string(),
            carousel: CarouselConfig::default(),
            fallback: FallbackConfig::default(),
        }
    }
}

impl WidgetConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("container_id", &self.container_id),
            ("inline_data_id", &self.inline_data_id),
            ("carousel_class", &self.carousel_class),
            ("manifest_path", &self.manifest_path),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        let c = &self.carousel;
        if !(c.min_duration >= 0.0) {
            return Err(ConfigError::Validation(
                "carousel.min_duration must be >= 0".into(),
            ));
        }
        if !(c.seconds_per_image > 0.0) {
            return Err(ConfigError::Validation(
                "carousel.seconds_per_image must be positive".into(),
            ));
        }
        if !(c.second_row_speed > 0.0 && c.second_row_speed <= 1.0) {
            return Err(ConfigError::Validation(
                "carousel.second_row_speed must be in (0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&c.second_row_offset) {
            return Err(ConfigError::Validation(
                "carousel.second_row_offset must be in [0, 1]".into(),
            ));
        }
        if self.fallback.count == 0 {
            return Err(ConfigError::Validation(
                "fallback.count must be at least 1".into(),
            ));
        }
        if !self.fallback.src_pattern.contains("{n}") {
            return Err(ConfigError::Validation(
                "fallback.src_pattern must contain {n}".into(),
            ));
        }
        Ok(())
    }
}

/// Carousel row timing. Durations are in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    pub min_duration: f64,
    pub seconds_per_image: f64,
    pub second_row_speed: f64,
    pub second_row_offset: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            min_duration: 44.0,
            seconds_per_image: 9.0,
            second_row_speed: 0.9,
            second_row_offset: 0.3,
        }
    }
}

/// Placeholder descriptors, numbered from 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FallbackConfig {
    pub count: usize,
    /// Image path; `{n}` is replaced with the 1-based number.
    pub src_pattern: String,
    /// Caption; `{n}` is replaced with the 1-based number.
    pub title_pattern: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            count: 15,
            src_pattern: "assets/memories/{n}.webp".to_string(),
            title_pattern: "Photo {n}".to_string(),
        }
    }
}

impl FallbackConfig {
    /// Expand the patterns into `count` descriptors.
    pub fn images(&self) -> Vec<ImageDescriptor> {
        (1..=self.count)
            .map(|n| {
                let n = n.to_string();
                ImageDescriptor::new(self.src_pattern.replace("{n}", &n))
                    .with_title(self.title_pattern.replace("{n}", &n))
            })
            .collect()
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse and validate config from TOML text.
pub fn parse_config(content: &str) -> Result<WidgetConfig, ConfigError> {
    let config: WidgetConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from a `memories.toml` file.
///
/// Missing keys take their defaults; unknown keys and out-of-range values
/// are errors.
pub fn load_config(path: &Path) -> Result<WidgetConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `memories.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Memories Widget Configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Id of the grid container. The widget does nothing when it is missing.
container_id = "memories-grid"

# Id of an optional element whose text is an embedded JSON manifest.
# A non-empty embedded manifest is used without any network request.
inline_data_id = "memories-data"

# Class on the container that selects the dual-row carousel layout.
carousel_class = "memories-carousel"

# Manifest fetched (relative to the page) when no inline data is usable.
# A cache-busting ?v=<timestamp> parameter is appended on every load.
manifest_path = "assets/memories/index.json"

# Stylesheet linked from full-page renders.
stylesheet = "assets/css/memories.css"

# ---------------------------------------------------------------------------
# Carousel timing (seconds)
# ---------------------------------------------------------------------------
[carousel]
# Row 1 duration is max(min_duration, image_count * seconds_per_image).
min_duration = 44.0
seconds_per_image = 9.0

# Row 2 runs at this fraction of row 1's duration...
second_row_speed = 0.9

# ...and starts this fraction of row 1's duration into its loop.
second_row_offset = 0.3

# ---------------------------------------------------------------------------
# Fallback set, used when the manifest cannot be fetched
# ---------------------------------------------------------------------------
[fallback]
count = 15
src_pattern = "assets/memories/{n}.webp"
title_pattern = "Photo {n}"
"##
}
