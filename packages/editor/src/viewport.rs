//! Viewport model: named device presets or a custom size.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportPreset {
    Desktop,
    Tablet,
    Mobile,
}

/// A screen-size context an override was authored in. Serializes as the
/// preset name (`"mobile"`) or a `{width, height}` object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Viewport {
    Named(ViewportPreset),
    Custom { width: u32, height: u32 },
}

impl Viewport {
    pub const DESKTOP: Viewport = Viewport::Named(ViewportPreset::Desktop);
    pub const TABLET: Viewport = Viewport::Named(ViewportPreset::Tablet);
    pub const MOBILE: Viewport = Viewport::Named(ViewportPreset::Mobile);

    pub fn custom(width: u32, height: u32) -> Self {
        Viewport::Custom { width, height }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Viewport::Named(ViewportPreset::Desktop) => (1920, 1080),
            Viewport::Named(ViewportPreset::Tablet) => (768, 1024),
            Viewport::Named(ViewportPreset::Mobile) => (375, 667),
            Viewport::Custom { width, height } => (*width, *height),
        }
    }

    pub fn width(&self) -> u32 {
        self.dimensions().0
    }

    pub fn height(&self) -> u32 {
        self.dimensions().1
    }

    /// Grouping key: the preset name, or `custom-<w>x<h>`
    pub fn key(&self) -> String {
        match self {
            Viewport::Named(ViewportPreset::Desktop) => "desktop".to_string(),
            Viewport::Named(ViewportPreset::Tablet) => "tablet".to_string(),
            Viewport::Named(ViewportPreset::Mobile) => "mobile".to_string(),
            Viewport::Custom { width, height } => format!("custom-{width}x{height}"),
        }
    }
}

impl From<ViewportPreset> for Viewport {
    fn from(preset: ViewportPreset) -> Self {
        Viewport::Named(preset)
    }
}
