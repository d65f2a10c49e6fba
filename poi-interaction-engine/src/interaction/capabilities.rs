use bevy::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::assets::poi_manifest::PoiMetadata;
use crate::interaction::dispatcher::ListenerError;
use crate::interaction::state::InputMethod;

/// Optional analytics capability. Every hook defaults to a no-op so
/// implementers override only the edges they care about; hooks fire exactly
/// once per transition edge, never per frame.
pub trait InteractionAnalytics {
    fn hover_started(
        &mut self,
        _poi: &PoiMetadata,
        _method: InputMethod,
    ) -> Result<(), ListenerError> {
        Ok(())
    }

    fn hover_ended(&mut self, _poi: &PoiMetadata) -> Result<(), ListenerError> {
        Ok(())
    }

    fn selected(&mut self, _poi: &PoiMetadata, _method: InputMethod) -> Result<(), ListenerError> {
        Ok(())
    }

    fn selection_cleared(&mut self) -> Result<(), ListenerError> {
        Ok(())
    }
}

/// Analytics sink that logs edges through the engine's diagnostics channel.
/// Stands in until the frontend registers something richer.
#[derive(Default)]
pub struct LogAnalytics;

impl InteractionAnalytics for LogAnalytics {
    fn selected(&mut self, poi: &PoiMetadata, method: InputMethod) -> Result<(), ListenerError> {
        info!("POI selected: {} via {}", poi.id, method.as_str());
        Ok(())
    }

    fn selection_cleared(&mut self) -> Result<(), ListenerError> {
        info!("POI selection cleared");
        Ok(())
    }
}

/// Consumer seam for the guided-tour preference. Only gates whether the
/// `recommended` tooltip mode may render.
pub trait TourPreference {
    fn is_enabled(&self) -> bool;

    /// Register a change listener; called with the new value on every toggle.
    fn subscribe(&mut self, listener: Box<dyn FnMut(bool) + Send + Sync>);
}

/// Shared-flag implementation toggled by the frontend over RPC.
#[derive(Resource)]
pub struct SharedTourPreference {
    enabled: Arc<AtomicBool>,
    subscribers: Vec<Box<dyn FnMut(bool) + Send + Sync>>,
}

impl SharedTourPreference {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
            subscribers: Vec::new(),
        }
    }

    pub fn set(&mut self, enabled: bool) {
        let previous = self.enabled.swap(enabled, Ordering::Relaxed);
        if previous != enabled {
            for subscriber in &mut self.subscribers {
                subscriber(enabled);
            }
        }
    }
}

impl Default for SharedTourPreference {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TourPreference for SharedTourPreference {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    fn subscribe(&mut self, listener: Box<dyn FnMut(bool) + Send + Sync>) {
        self.subscribers.push(listener);
    }
}
