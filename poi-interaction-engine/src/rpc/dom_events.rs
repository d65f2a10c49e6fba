use bevy::prelude::*;

use crate::interaction::events::{PoiHoveredEvent, PoiSelectedEvent};
use crate::rpc::web_rpc::poi_payload;

/// Re-emits interaction broadcasts as DOM CustomEvents on `window`, for
/// page-level consumers outside the iframe RPC channel. Adapter only: the
/// typed listener registry remains the primary contract. No-op off-browser.
pub struct DomEventsPlugin;

impl Plugin for DomEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, emit_dom_events);
    }
}

fn emit_dom_events(
    mut selected: EventReader<PoiSelectedEvent>,
    mut hovered: EventReader<PoiHoveredEvent>,
) {
    for event in selected.read() {
        dispatch_custom_event("poi:selected", &poi_payload(&event.poi, event.input_method));
    }
    for event in hovered.read() {
        dispatch_custom_event("poi:hovered", &poi_payload(&event.poi, event.input_method));
    }
}

#[cfg(target_arch = "wasm32")]
fn dispatch_custom_event(name: &str, payload: &serde_json::Value) {
    use wasm_bindgen::JsValue;

    let Some(window) = web_sys::window() else {
        warn!("Window object unavailable, dropping {name}");
        return;
    };

    let detail = serde_json::to_string(payload)
        .ok()
        .and_then(|json| js_sys::JSON::parse(&json).ok())
        .unwrap_or(JsValue::NULL);

    let init = web_sys::CustomEventInit::new();
    init.set_detail(&detail);

    match web_sys::CustomEvent::new_with_event_init_dict(name, &init) {
        Ok(event) => {
            if window.dispatch_event(&event).is_err() {
                warn!("Failed to dispatch {name}");
            }
        }
        Err(e) => error!("Failed to construct {name}: {e:?}"),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn dispatch_custom_event(name: &str, payload: &serde_json::Value) {
    let _ = (name, payload);
}
