//! Browser-facing adapter layers.
//!
//! JSON-RPC 2.0 over iframe `postMessage` for the embedding frontend, plus
//! DOM CustomEvent re-emission for decoupled page-level consumers. Both are
//! fed from the same interaction broadcasts; neither is the source of truth.

/// `poi:selected` / `poi:hovered` CustomEvents on `window`.
pub mod dom_events;

/// Bidirectional JSON-RPC: incoming control methods, outgoing notifications.
pub mod web_rpc;
