/// Window after a touch-driven selection during which synthetic clicks are
/// discarded. Empirically sized to absorb the browser's post-touch click.
pub const TOUCH_SUPPRESSION_SECS: f64 = 0.5;

/// Full-range tooltip fade duration.
pub const TOOLTIP_FADE_SECS: f32 = 0.22;

pub const TOOLTIP_OPACITY_SELECTED: f32 = 1.0;
pub const TOOLTIP_OPACITY_HOVERED: f32 = 0.85;
pub const TOOLTIP_OPACITY_RECOMMENDED: f32 = 0.72;

/// World-space tooltip panel dimensions.
pub const TOOLTIP_PANEL_WIDTH: f32 = 1.7;
pub const TOOLTIP_PANEL_HEIGHT: f32 = 0.95;

/// Extra lift above a POI's own anchor height.
pub const TOOLTIP_ANCHOR_LIFT: f32 = 0.45;

/// Tooltip raster target in pixels.
pub const TOOLTIP_TEXTURE_WIDTH: u32 = 512;
pub const TOOLTIP_TEXTURE_HEIGHT: u32 = 288;

/// Quiet period before the scene counts as idle.
pub const IDLE_AFTER_SECS: f64 = 6.0;

/// Cadence for rotating the recommended tour stop while idle.
pub const RECOMMENDATION_ROTATE_SECS: f64 = 9.0;

/// Exponential ease rate for the per-frame focus smoothing.
pub const FOCUS_EASE_RATE: f32 = 9.0;

/// Decay rate for the selection activation pulse.
pub const ACTIVATION_DECAY_RATE: f32 = 1.8;

/// Marker geometry and glow tuning.
pub const MARKER_RADIUS: f32 = 0.22;
pub const MARKER_HEIGHT: f32 = 0.9;
pub const MARKER_EMISSIVE_BASE: f32 = 0.7;
pub const MARKER_EMISSIVE_FOCUS_BOOST: f32 = 2.6;
pub const MARKER_EMISSIVE_ACTIVATION_BOOST: f32 = 3.4;
pub const MARKER_FOCUS_SCALE_BOOST: f32 = 0.16;
