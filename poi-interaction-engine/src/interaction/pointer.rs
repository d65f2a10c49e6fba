use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::window::{CursorLeft, CursorMoved, PrimaryWindow};

use crate::engine::scene::markers::PoiHitVolume;
use crate::interaction::events::InteractionOutput;
use crate::interaction::manager::InteractionManager;
use crate::interaction::picking::pick_at;

/// First touch id of the current gesture. Later touch ids are ignored for
/// hover purposes until the primary lifts, so multi-touch tolerates extra
/// fingers without flicker.
#[derive(Resource, Default)]
pub struct PrimaryTouch {
    id: Option<u64>,
}

/// Mouse hover and click handling. Hit-test always completes before the
/// transition, and the transition before dispatch, within one event.
pub fn pointer_input_system(
    mut cursor_moved: EventReader<CursorMoved>,
    mut cursor_left: EventReader<CursorLeft>,
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    volumes: Query<(&GlobalTransform, &PoiHitVolume)>,
    time: Res<Time>,
    mut manager: ResMut<InteractionManager>,
    mut out: InteractionOutput,
) {
    // Hover follows the last cursor sample of the frame.
    let mut last_move = None;
    for event in cursor_moved.read() {
        last_move = Some(event.position);
    }
    if let Some(position) = last_move {
        let candidate = pick_at(position, &windows, &cameras, &out.registry, &volumes);
        let fx = manager.pointer_moved(candidate);
        out.apply(fx);
    }

    if cursor_left.read().next().is_some() {
        let fx = manager.pointer_left();
        out.apply(fx);
    }

    if buttons.just_pressed(MouseButton::Left) {
        let Ok(window) = windows.single() else { return };
        let Some(position) = window.cursor_position() else { return };
        let candidate = pick_at(position, &windows, &cameras, &out.registry, &volumes);
        let fx = manager.clicked(candidate, time.elapsed_secs_f64());
        out.apply(fx);
    }
}

/// Touch hover and tap-to-select handling. Only the primary touch of a
/// gesture drives hover; release on a POI selects it and opens the
/// suppression window for the browser's synthetic click.
pub fn touch_input_system(
    mut touch_events: EventReader<TouchInput>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    volumes: Query<(&GlobalTransform, &PoiHitVolume)>,
    time: Res<Time>,
    mut primary: ResMut<PrimaryTouch>,
    mut manager: ResMut<InteractionManager>,
    mut out: InteractionOutput,
) {
    for event in touch_events.read() {
        match event.phase {
            TouchPhase::Started => {
                if primary.id.is_none() {
                    primary.id = Some(event.id);
                }
                if primary.id != Some(event.id) {
                    continue;
                }
                let candidate =
                    pick_at(event.position, &windows, &cameras, &out.registry, &volumes);
                let fx = manager.touch_moved(candidate);
                out.apply(fx);
            }
            TouchPhase::Moved => {
                if primary.id != Some(event.id) {
                    continue;
                }
                let candidate =
                    pick_at(event.position, &windows, &cameras, &out.registry, &volumes);
                let fx = manager.touch_moved(candidate);
                out.apply(fx);
            }
            TouchPhase::Ended => {
                if primary.id != Some(event.id) {
                    continue;
                }
                primary.id = None;
                let candidate =
                    pick_at(event.position, &windows, &cameras, &out.registry, &volumes);
                let fx = manager.touch_ended(candidate, time.elapsed_secs_f64());
                out.apply(fx);
            }
            TouchPhase::Canceled => {
                if primary.id != Some(event.id) {
                    continue;
                }
                primary.id = None;
                let fx = manager.touch_cancelled();
                out.apply(fx);
            }
        }
    }
}
