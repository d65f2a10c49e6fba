//! POI interaction core: hit-testing, focus arbitration, and event dispatch.
//!
//! Translates pointer, touch, and keyboard input into a single canonical
//! hover/selection state with deterministic precedence, and fans transition
//! edges out to listeners, analytics hooks, and the browser adapters.
//!
//! ## Arbitration Flow
//!
//! ```text
//! CursorMoved / TouchInput / KeyCode
//!   └─> hit-test (ray vs invisible hit volumes, nearest wins)
//!       └─> InteractionManager handler
//!           └─> pure transition on InteractionState
//!               ├─> focus-target writes on the markers
//!               └─> edge events
//!                   ├─> InteractionDispatcher (listeners + analytics)
//!                   └─> PoiSelectedEvent / PoiHoveredEvent broadcasts
//!                       ├─> DOM CustomEvents (WASM)
//!                       └─> JSON-RPC notifications
//! ```
//!
//! ## Precedence Rules
//!
//! - A selection is sticky: hover changes never darken the selected marker.
//! - Hover yields to selection only while something is selected; with no
//!   selection, exactly one marker is focused (or none).
//! - Clicks arriving inside the touch-suppression window are the browser's
//!   synthetic post-touch click and are discarded unconditionally.
//! - Keyboard cycling restarts whenever another channel moves the focus.
//!
//! All transition functions are pure and clock-injected, so the whole core
//! unit-tests without a window, a GPU, or DOM mocking.

use bevy::prelude::*;
use bevy::transform::TransformSystem;

use crate::engine::core::app_state::AppState;
use crate::engine::scene::markers::PoiRegistry;

/// Optional analytics hooks and the guided-tour preference capability.
pub mod capabilities;

/// Typed listener registry fed by state-transition edges.
pub mod dispatcher;

/// Broadcast events and the shared effect-application plumbing.
pub mod events;

/// Keyboard cyclic navigation and activation.
pub mod keyboard;

/// Interaction manager resource: configuration, disposal, input handlers.
pub mod manager;

/// Ray casting against POI hit volumes.
pub mod picking;

/// Mouse and touch arbitration systems.
pub mod pointer;

/// Pure hover/selection state machine and its transition effects.
pub mod state;

/// Wires the interaction systems into the schedule. Picking runs after
/// transform propagation so hit volumes never see stale world matrices.
pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<manager::InteractionManager>()
            .init_resource::<dispatcher::InteractionDispatcher>()
            .init_resource::<pointer::PrimaryTouch>()
            .init_resource::<PoiRegistry>()
            .add_event::<events::PoiSelectedEvent>()
            .add_event::<events::PoiHoveredEvent>()
            .add_event::<events::SelectPoiRequest>()
            .add_systems(
                PostUpdate,
                (
                    pointer::pointer_input_system,
                    pointer::touch_input_system,
                    keyboard::keyboard_nav_system,
                    events::handle_select_requests,
                    events::teardown_on_exit,
                )
                    .chain()
                    .after(TransformSystem::TransformPropagate)
                    .run_if(in_state(AppState::Running)),
            );
    }
}
