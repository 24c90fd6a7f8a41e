//! Canvas settings.
//!
//! Every value has a default matching the planner's stock behavior, so a
//! host only needs to override what it cares about:
//!
//! ```ignore
//! let config = CanvasConfig::from_json_str(r#"{ "project_id": "launch-q3", "drag_threshold": 8 }"#)?;
//! let ctrl = CanvasController::with_config(config);
//! ```

use crate::error::ConfigError;
use crate::geometry::Size;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Project the remote store scopes nodes and edges to.
    pub project_id: String,
    /// Fixed hit-test box of every node, in canvas units.
    pub node_size: Size,
    /// Pointer travel (screen px) before a press turns into a drag.
    pub drag_threshold: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    /// Zoom change per wheel notch or keyboard shortcut.
    pub zoom_step: f32,
    /// Debounce window for position syncs, in milliseconds.
    pub position_debounce_ms: u64,
    /// Silent retries for a position sync that hit a network error.
    pub position_retry_limit: u32,
    /// Minimum horizontal control-point offset of edge curves.
    pub edge_curve_offset: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            node_size: Size::new(240.0, 120.0),
            drag_threshold: 5.0,
            zoom_min: 0.5,
            zoom_max: 1.5,
            zoom_step: 0.1,
            position_debounce_ms: 200,
            position_retry_limit: 2,
            edge_curve_offset: 50.0,
        }
    }
}

impl CanvasConfig {
    /// Parse and validate settings from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CanvasConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.zoom_min > 0.0 && self.zoom_min <= 1.0 && self.zoom_max >= 1.0) {
            return Err(ConfigError::ZoomBounds {
                min: self.zoom_min,
                max: self.zoom_max,
            });
        }
        let positive = [
            ("zoom_step", self.zoom_step),
            ("node_size.width", self.node_size.width),
            ("node_size.height", self.node_size.height),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.drag_threshold < 0.0 {
            return Err(ConfigError::NotPositive {
                field: "drag_threshold",
                value: self.drag_threshold,
            });
        }
        Ok(())
    }

    pub fn position_debounce(&self) -> Duration {
        Duration::from_millis(self.position_debounce_ms)
    }
}
