use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::assets::poi_manifest::PoiMetadata;
use crate::engine::scene::markers::PoiContentUpdate;
use crate::interaction::capabilities::SharedTourPreference;
use crate::interaction::events::{PoiHoveredEvent, PoiSelectedEvent, SelectPoiRequest};
use crate::interaction::state::InputMethod;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }
}

/// Shared payload shape for selection/hover broadcasts: the CustomEvent
/// `detail` and the RPC notification params are the same object.
pub fn poi_payload(poi: &Option<PoiMetadata>, method: InputMethod) -> serde_json::Value {
    serde_json::json!({
        "poi": poi,
        "inputMethod": method.as_str(),
    })
}

/// Resource managing bidirectional RPC communication with the embedding
/// frontend. Outgoing traffic is queued during the frame and flushed once.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the frontend without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing the RPC layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    broadcast_interaction_notifications,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Queue filled from the JS event loop, drained on the app schedule.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();
            // Cheap pre-filter before JSON parsing on the app side.
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        window
            .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            .expect("Failed to register message listener");
    }

    // Ownership of the callback moves to the JS side for the app's lifetime.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping the thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Incoming RPC message from the frontend.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Res<DiagnosticsStore>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut select_requests: EventWriter<SelectPoiRequest>,
    mut content_updates: EventWriter<PoiContentUpdate>,
    mut tour_preference: ResMut<SharedTourPreference>,
) {
    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("RPC parse error: {parse_error}");
                continue;
            }
        };

        // Side effects run for requests and notifications alike; only
        // requests (with an id) get a response queued.
        let result = dispatch_method(
            &request,
            &diagnostics,
            &mut select_requests,
            &mut content_updates,
            &mut tour_preference,
            &mut rpc_interface,
        );

        if let Some(id) = request.id.clone() {
            let response = match result {
                Ok(value) => RpcResponse {
                    jsonrpc: "2.0".to_string(),
                    result: Some(value),
                    error: None,
                    id: Some(id),
                },
                Err(error) => RpcResponse {
                    jsonrpc: "2.0".to_string(),
                    result: None,
                    error: Some(error),
                    id: Some(id),
                },
            };
            rpc_interface.queue_response(response);
        } else if let Err(error) = result {
            warn!("RPC notification '{}' failed: {}", request.method, error.message);
        }
    }
}

fn dispatch_method(
    request: &RpcRequest,
    diagnostics: &DiagnosticsStore,
    select_requests: &mut EventWriter<SelectPoiRequest>,
    content_updates: &mut EventWriter<PoiContentUpdate>,
    tour_preference: &mut SharedTourPreference,
    rpc_interface: &mut WebRpcInterface,
) -> Result<serde_json::Value, RpcError> {
    match request.method.as_str() {
        "select_poi" => {
            #[derive(Deserialize)]
            struct SelectParams {
                id: String,
            }
            let params = serde_json::from_value::<SelectParams>(request.params.clone())
                .map_err(|_| RpcError::invalid_params("Expected 'id' parameter"))?;
            select_requests.write(SelectPoiRequest { id: params.id.clone() });
            info!("Selection requested via RPC: {}", params.id);
            Ok(serde_json::json!({ "success": true, "id": params.id }))
        }
        "set_tour_preference" => {
            #[derive(Deserialize)]
            struct PreferenceParams {
                enabled: bool,
            }
            let params = serde_json::from_value::<PreferenceParams>(request.params.clone())
                .map_err(|_| RpcError::invalid_params("Expected 'enabled' parameter"))?;
            tour_preference.set(params.enabled);
            rpc_interface.send_notification(
                "tour_preference_changed",
                serde_json::json!({ "enabled": params.enabled }),
            );
            Ok(serde_json::json!({ "success": true, "enabled": params.enabled }))
        }
        "poi_update" => {
            let update = serde_json::from_value::<PoiContentUpdate>(request.params.clone())
                .map_err(|_| RpcError::invalid_params("Expected 'id' plus content fields"))?;
            content_updates.write(update);
            Ok(serde_json::json!({ "success": true }))
        }
        "get_fps" => {
            let fps = diagnostics
                .get(&FrameTimeDiagnosticsPlugin::FPS)
                .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
                .unwrap_or(0.0) as f32;
            Ok(serde_json::json!({ "fps": fps }))
        }
        other => {
            warn!("Unknown RPC method: {other}");
            Err(RpcError::method_not_found(other))
        }
    }
}

/// Mirror the interaction broadcasts as RPC notifications so the embedding
/// frontend can follow hover/selection without registering Rust listeners.
fn broadcast_interaction_notifications(
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut selected: EventReader<PoiSelectedEvent>,
    mut hovered: EventReader<PoiHoveredEvent>,
) {
    for event in selected.read() {
        let payload = poi_payload(&event.poi, event.input_method);
        if event.poi.is_some() {
            rpc_interface.send_notification("poi_selected", payload.clone());
        }
        rpc_interface.send_notification("selection_state", payload);
    }
    for event in hovered.read() {
        rpc_interface.send_notification("poi_hovered", poi_payload(&event.poi, event.input_method));
    }
}

/// Flush queued notifications and responses to the frontend.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }
    // Responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send one serialized message to the parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op outside the browser.
        let _ = message;
    }
}
