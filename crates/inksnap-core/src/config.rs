//! Engine tuning parameters.
//!
//! Every threshold the recognizer, hold tracker, eraser and lasso use lives
//! here so a host can tune them from a JSON file without recompiling.

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Hold-to-snap timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldConfig {
    /// How long the pointer must stay still before shape detection runs.
    pub hold_duration_ms: u64,
    /// Movement (in page units) that counts as "still drawing".
    pub stillness_threshold: f64,
    /// Minimum number of stroke points before detection may run.
    pub min_stroke_points: usize,
}

impl HoldConfig {
    pub fn hold_duration(&self) -> Duration {
        Duration::from_millis(self.hold_duration_ms)
    }
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self {
            hold_duration_ms: 1000,
            stillness_threshold: 5.0,
            min_stroke_points: 3,
        }
    }
}

/// Corner detection and classification thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Degrees a vertex must deviate from straight to count as a corner.
    pub angle_threshold: f64,
    /// Vertices sharper than this (in degrees) are treated as noise spikes.
    pub min_corner_angle: f64,
    /// Strokes with fewer points never yield corners.
    pub min_corner_points: usize,
    /// Look-ahead distance as a fraction of the smaller bounding dimension.
    pub lookahead_factor: f64,
    /// Minimum spacing between accepted corners, as a fraction of the
    /// smaller bounding dimension.
    pub corner_spacing_factor: f64,
    /// Aspect ratio at or above which a stroke is a line.
    pub line_aspect_ratio: f64,
    /// Aspect ratio below which a round stroke is a circle rather than an oval.
    pub circle_aspect_ratio: f64,
    /// Start/end gap, as a fraction of the larger bounding dimension, under
    /// which a stroke counts as closed.
    pub closure_factor: f64,
    /// Total heading change, in degrees, at which an open stroke is treated
    /// as a loop for corner detection.
    pub loop_turning: f64,
    /// Upper bound on resampled points fed to the corner detector.
    pub max_resample_points: usize,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            angle_threshold: 25.0,
            min_corner_angle: 15.0,
            min_corner_points: 12,
            lookahead_factor: 0.02,
            corner_spacing_factor: 0.15,
            line_aspect_ratio: 3.5,
            circle_aspect_ratio: 1.3,
            closure_factor: 0.25,
            loop_turning: 170.0,
            max_resample_points: 2048,
        }
    }
}

/// Live resize settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Smallest dimension any snapped shape may take.
    pub min_size: f64,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self { min_size: 5.0 }
    }
}

/// Eraser settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EraserConfig {
    /// Eraser diameter; the hit radius is half of this.
    pub thickness: f64,
    /// Opacity applied to elements marked for deletion.
    pub preview_opacity: f64,
}

impl Default for EraserConfig {
    fn default() -> Self {
        Self {
            thickness: 20.0,
            preview_opacity: 0.3,
        }
    }
}

/// Lasso selection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Opacity applied to selected elements while the selection is active.
    pub selected_opacity: f64,
    /// Hit radius around the scale handle.
    pub handle_tolerance: f64,
    /// Marching-ants dash advance, in page units per second.
    pub dash_speed: f64,
    /// Dash pattern period; the offset wraps at this value.
    pub dash_period: f64,
    /// Smallest allowed scale factor for a single scale gesture.
    pub min_scale: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            selected_opacity: 0.6,
            handle_tolerance: 12.0,
            dash_speed: 24.0,
            dash_period: 12.0,
            min_scale: 0.05,
        }
    }
}

/// Highlighter stroke style overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlighterConfig {
    pub min_width: f64,
    pub opacity: f64,
}

impl Default for HighlighterConfig {
    fn default() -> Self {
        Self {
            min_width: 12.0,
            opacity: 0.5,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub hold: HoldConfig,
    pub recognizer: RecognizerConfig,
    pub resize: ResizeConfig,
    pub eraser: EraserConfig,
    pub selection: SelectionConfig,
    pub highlighter: HighlighterConfig,
}

impl EngineConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::debug!("Loaded engine config from {}", path.display());
        Self::from_json(&json)
    }

    /// Check that every threshold is usable.
    pub fn validate(&self) -> EngineResult<()> {
        let positive = [
            ("hold.stillness_threshold", self.hold.stillness_threshold),
            ("recognizer.angle_threshold", self.recognizer.angle_threshold),
            ("recognizer.lookahead_factor", self.recognizer.lookahead_factor),
            ("recognizer.line_aspect_ratio", self.recognizer.line_aspect_ratio),
            ("recognizer.circle_aspect_ratio", self.recognizer.circle_aspect_ratio),
            ("recognizer.loop_turning", self.recognizer.loop_turning),
            ("resize.min_size", self.resize.min_size),
            ("eraser.thickness", self.eraser.thickness),
            ("selection.dash_period", self.selection.dash_period),
            ("selection.min_scale", self.selection.min_scale),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        if self.hold.hold_duration_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "hold.hold_duration_ms must be positive".to_string(),
            ));
        }
        if self.recognizer.min_corner_angle >= 180.0 - self.recognizer.angle_threshold {
            return Err(EngineError::InvalidConfig(
                "recognizer.min_corner_angle leaves no room for corners".to_string(),
            ));
        }
        if self.recognizer.circle_aspect_ratio > self.recognizer.line_aspect_ratio {
            return Err(EngineError::InvalidConfig(
                "recognizer.circle_aspect_ratio exceeds line_aspect_ratio".to_string(),
            ));
        }
        for (name, value) in [
            ("eraser.preview_opacity", self.eraser.preview_opacity),
            ("selection.selected_opacity", self.selection.selected_opacity),
            ("highlighter.opacity", self.highlighter.opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} must be within 0..=1, got {value}"
                )));
            }
        }
        Ok(())
    }
}
