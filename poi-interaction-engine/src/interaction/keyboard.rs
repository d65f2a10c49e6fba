use bevy::prelude::*;

use crate::interaction::events::InteractionOutput;
use crate::interaction::manager::InteractionManager;

/// Cyclic keyboard navigation: arrows cycle hover through registry order
/// with wrap-around, Enter/Space promotes the hover to a selection, Escape
/// clears the selection only. The whole channel is opt-out via
/// `InteractionConfig::keyboard_nav`, enforced inside the manager.
pub fn keyboard_nav_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut manager: ResMut<InteractionManager>,
    mut out: InteractionOutput,
) {
    let poi_count = out.registry.len();

    if keyboard.any_just_pressed([KeyCode::ArrowRight, KeyCode::ArrowDown]) {
        let fx = manager.key_nav(true, poi_count);
        out.apply(fx);
    }
    if keyboard.any_just_pressed([KeyCode::ArrowLeft, KeyCode::ArrowUp]) {
        let fx = manager.key_nav(false, poi_count);
        out.apply(fx);
    }
    if keyboard.any_just_pressed([KeyCode::Enter, KeyCode::Space]) {
        let fx = manager.key_activate();
        out.apply(fx);
    }
    if keyboard.just_pressed(KeyCode::Escape) {
        let fx = manager.clear_selection();
        out.apply(fx);
    }
}
