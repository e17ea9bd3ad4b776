//! Editor configuration.

use serde::Deserialize;

/// Tunables for snapping, history, interaction and image proxying.
///
/// Every field has a default, so a partial JSON object (or `{}`) is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Guide snap distance in canvas units.
    pub snap_threshold: f64,
    pub grid_enabled: bool,
    /// Grid size is `canvas.width / grid_divisions`.
    pub grid_divisions: u32,
    /// Maximum number of undo steps kept.
    pub history_limit: usize,
    /// Offset applied to duplicated elements on both axes.
    pub duplicate_offset: f64,
    /// Pointer travel (canvas units) before a press becomes a drag.
    pub drag_threshold: f64,
    pub nudge_step: f64,
    /// Nudge distance with Shift held.
    pub nudge_step_large: f64,
    /// Smallest width/height a resize may produce.
    pub min_extent: f64,
    /// Lower bound for auto-fit font sizes.
    pub min_font_size: f64,
    /// Same-origin endpoint that proxies cross-origin images.
    pub proxy_endpoint: String,
    /// Page origin (e.g. `https://example.com`). `None` treats every
    /// absolute http(s) URL as cross-origin.
    pub origin: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_threshold: crate::snap::SNAP_THRESHOLD,
            grid_enabled: false,
            grid_divisions: 20,
            history_limit: 50,
            duplicate_offset: 20.0,
            drag_threshold: 3.0,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            min_extent: 10.0,
            min_font_size: crate::text_fit::MIN_FONT_SIZE,
            proxy_endpoint: "/api/proxy-image".into(),
            origin: None,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON configuration.
    ///
    /// # Errors
    /// Returns the serde error if the JSON is malformed or a field has the
    /// wrong type.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let c = EditorConfig::from_json_str(r#"{ "historyLimit": 10, "gridEnabled": true }"#)
            .unwrap();
        assert_eq!(c.history_limit, 10);
        assert!(c.grid_enabled);
        assert_eq!(c.snap_threshold, 8.0);
        assert_eq!(c.proxy_endpoint, "/api/proxy-image");
    }

    #[test]
    fn wrong_type_is_an_error() {
        assert!(EditorConfig::from_json_str(r#"{ "snapThreshold": "wide" }"#).is_err());
    }
}
