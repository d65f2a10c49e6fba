//! World-anchored tooltip presenter.
//!
//! Mode resolution (`selected` → `hovered` → `recommended` → none), opacity
//! fades, cached rasterization, anchor tracking, and camera billboarding.
//! The presenter itself is a pure state machine; rasterization sits behind
//! the `TooltipSurface` seam and the scene-graph wiring lives in `display`.

use bevy::prelude::*;

use crate::engine::core::app_state::AppState;

/// Browser canvas rasterizer (real glyphs via the 2D context).
#[cfg(target_arch = "wasm32")]
pub mod canvas_surface;

/// Content model and per-channel prompt copy.
pub mod content;

/// Scene-graph wiring: panel entity, anchoring, billboarding, disposal.
pub mod display;

/// Mode/fade/cache state machine.
pub mod presenter;

/// Rasterization seam and the native procedural panel rasterizer.
pub mod surface;

pub struct TooltipPlugin;

impl Plugin for TooltipPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<display::TooltipDisplay>()
            .add_systems(OnEnter(AppState::Running), display::setup_tooltip)
            .add_systems(
                Update,
                (display::update_tooltip, display::anchor_tooltip)
                    .chain()
                    .run_if(in_state(AppState::Running)),
            )
            .add_systems(PostUpdate, display::dispose_on_exit);
    }
}
