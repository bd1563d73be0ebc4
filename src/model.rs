//! Shared data types for the clipper widget and the demo page.

use serde::{Deserialize, Serialize};

/// Raster format the cropped image is exported in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    Jpeg,
    Png,
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Png => "image/png",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "JPEG",
            ExportFormat::Png => "PNG",
        }
    }
}

/// Crop options the demo page lets the user tweak. Persisted to localStorage
/// between sessions; fed to the widget as props.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipperSettings {
    /// Crop window size in design units (750 = full screen width).
    pub clip_width: f64,
    pub clip_height: f64,
    /// Maximum zoom multiplier, >= 1.
    pub max_scale: f64,
    pub format: ExportFormat,
    /// Export quality factor, 0..=1.
    pub quality: f64,
}

impl Default for ClipperSettings {
    fn default() -> Self {
        Self {
            clip_width: 500.0,
            clip_height: 500.0,
            max_scale: 5.0,
            format: ExportFormat::default(),
            quality: 1.0,
        }
    }
}
