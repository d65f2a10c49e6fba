use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::engine::assets::poi_manifest::PoiMetadata;
use crate::engine::scene::markers::{PoiFocus, PoiRegistry};
use crate::interaction::dispatcher::InteractionDispatcher;
use crate::interaction::manager::InteractionManager;
use crate::interaction::state::{Effects, InputMethod, InteractionEvent, PoiIndex};

/// Broadcast on each selection edge; `poi: None` carries a deselect. The DOM
/// and RPC adapters re-emit these for consumers outside the listener registry.
#[derive(Event, Debug, Clone)]
pub struct PoiSelectedEvent {
    pub poi: Option<PoiMetadata>,
    pub input_method: InputMethod,
}

/// Broadcast on each hover change; `poi: None` on hover-clear.
#[derive(Event, Debug, Clone)]
pub struct PoiHoveredEvent {
    pub poi: Option<PoiMetadata>,
    pub input_method: InputMethod,
}

/// Programmatic selection by POI identifier, e.g. from the frontend.
#[derive(Event, Debug, Clone)]
pub struct SelectPoiRequest {
    pub id: String,
}

/// Everything a transition's effects touch downstream: focus targets on the
/// markers, the listener registry, and the broadcast events. Bundled so each
/// input system applies effects the same way.
#[derive(SystemParam)]
pub struct InteractionOutput<'w, 's> {
    pub registry: Res<'w, PoiRegistry>,
    dispatcher: ResMut<'w, InteractionDispatcher>,
    focus: Query<'w, 's, &'static mut PoiFocus>,
    metadata: Query<'w, 's, &'static PoiMetadata>,
    selected_events: EventWriter<'w, PoiSelectedEvent>,
    hovered_events: EventWriter<'w, PoiHoveredEvent>,
}

impl InteractionOutput<'_, '_> {
    pub fn apply(&mut self, fx: Effects) {
        // Focus writes land before any listener runs.
        for (index, target) in fx.focus {
            let Some(entity) = self.registry.entity(index) else { continue };
            if let Ok(mut focus) = self.focus.get_mut(entity) {
                focus.target = target;
            }
        }

        for event in fx.events {
            let meta = event_poi(&event)
                .and_then(|index| self.registry.entity(index))
                .and_then(|entity| self.metadata.get(entity).ok())
                .cloned();
            self.dispatcher.dispatch(&event, meta.as_ref());

            match event {
                InteractionEvent::HoverChanged { method, .. } => {
                    self.hovered_events.write(PoiHoveredEvent {
                        poi: meta.clone(),
                        input_method: method,
                    });
                }
                InteractionEvent::Selected { method, .. } => {
                    self.selected_events.write(PoiSelectedEvent {
                        poi: meta.clone(),
                        input_method: method,
                    });
                }
                InteractionEvent::SelectionCleared { method, .. } => {
                    self.selected_events.write(PoiSelectedEvent {
                        poi: None,
                        input_method: method,
                    });
                }
                _ => {}
            }
        }
    }
}

/// The POI whose metadata accompanies a given edge.
fn event_poi(event: &InteractionEvent) -> Option<PoiIndex> {
    match *event {
        InteractionEvent::HoverStarted { poi, .. } => Some(poi),
        InteractionEvent::HoverEnded { poi } => Some(poi),
        InteractionEvent::HoverChanged { poi, .. } => poi,
        InteractionEvent::Selected { poi, .. } => Some(poi),
        InteractionEvent::SelectionCleared { poi, .. } => Some(poi),
    }
}

/// Resolve frontend selection requests against the registry.
pub fn handle_select_requests(
    mut requests: EventReader<SelectPoiRequest>,
    mut manager: ResMut<InteractionManager>,
    mut out: InteractionOutput,
) {
    for request in requests.read() {
        match out.registry.index_of_id(&request.id) {
            Some(index) => {
                let fx = manager.select_index(index);
                out.apply(fx);
            }
            None => warn!("select_poi: unknown POI id '{}'", request.id),
        }
    }
}

/// Dispose the manager when the app shuts down, so a still-active selection
/// fires its cleared edge exactly once as part of teardown.
pub fn teardown_on_exit(
    mut exit_events: EventReader<AppExit>,
    mut manager: ResMut<InteractionManager>,
    mut out: InteractionOutput,
) {
    if exit_events.is_empty() {
        return;
    }
    exit_events.clear();
    let fx = manager.dispose();
    out.apply(fx);
}
