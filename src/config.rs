use serde::{Deserialize, Serialize};

use crate::error::{Result, VizError};
use crate::params::Defaults;

/// Settings for one experiment view, owned by that view for its lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DemoConfig {
    /// Id of the `<canvas>` the background is drawn into.
    pub canvas_id: String,
    /// Id of the text element styled from the parameters.
    pub overlay_id: String,
    /// Id of the element the control panel is appended to.
    pub panel_id: String,
    /// Scale the drawing buffer by `devicePixelRatio`.
    pub use_pixel_ratio: bool,
    pub defaults: Defaults,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            canvas_id: "waveCanvas".to_string(),
            overlay_id: "believe-text".to_string(),
            panel_id: "controls".to_string(),
            use_pixel_ratio: true,
            defaults: Defaults::default(),
        }
    }
}

impl DemoConfig {
    /// Parses a JSON config; missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(VizError::InvalidConfig)
    }
}
