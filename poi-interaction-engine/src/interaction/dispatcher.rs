use bevy::prelude::*;
use thiserror::Error;

use crate::engine::assets::poi_manifest::PoiMetadata;
use crate::interaction::capabilities::InteractionAnalytics;
use crate::interaction::state::{InputMethod, InteractionEvent};

/// Failure reported by a listener or analytics hook. Surfaced as a warning;
/// never propagated back into the input handler.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ListenerError(pub String);

impl From<&str> for ListenerError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

/// Channel attribution passed alongside selection payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionContext {
    pub input_method: InputMethod,
}

type SelectionListener =
    Box<dyn FnMut(&PoiMetadata, &SelectionContext) -> Result<(), ListenerError> + Send + Sync>;
type HoverListener =
    Box<dyn FnMut(Option<&PoiMetadata>) -> Result<(), ListenerError> + Send + Sync>;
type SelectionStateListener = Box<
    dyn FnMut(Option<&PoiMetadata>, &SelectionContext) -> Result<(), ListenerError> + Send + Sync,
>;

/// Typed listener registry invoked synchronously, in registration order,
/// after each state transition. This registry is the primary contract; the
/// DOM/RPC broadcasts are adapter layers fed from the same edges.
#[derive(Resource, Default)]
pub struct InteractionDispatcher {
    selection_listeners: Vec<SelectionListener>,
    hover_listeners: Vec<HoverListener>,
    selection_state_listeners: Vec<SelectionStateListener>,
    analytics: Option<Box<dyn InteractionAnalytics + Send + Sync>>,
}

impl InteractionDispatcher {
    /// Fires on each new selection (not on clearing).
    pub fn on_selection(
        &mut self,
        listener: impl FnMut(&PoiMetadata, &SelectionContext) -> Result<(), ListenerError>
        + Send
        + Sync
        + 'static,
    ) {
        self.selection_listeners.push(Box::new(listener));
    }

    /// Fires on every hover change; `None` on hover-clear.
    pub fn on_hover(
        &mut self,
        listener: impl FnMut(Option<&PoiMetadata>) -> Result<(), ListenerError> + Send + Sync + 'static,
    ) {
        self.hover_listeners.push(Box::new(listener));
    }

    /// Fires on both select and deselect; `None` carries the deselect.
    pub fn on_selection_state(
        &mut self,
        listener: impl FnMut(Option<&PoiMetadata>, &SelectionContext) -> Result<(), ListenerError>
        + Send
        + Sync
        + 'static,
    ) {
        self.selection_state_listeners.push(Box::new(listener));
    }

    pub fn set_analytics(&mut self, analytics: impl InteractionAnalytics + Send + Sync + 'static) {
        self.analytics = Some(Box::new(analytics));
    }

    /// Route one transition edge to listeners and analytics. `metadata` is
    /// the metadata of the POI named by the edge, resolved by the caller
    /// before dispatch.
    pub fn dispatch(&mut self, event: &InteractionEvent, metadata: Option<&PoiMetadata>) {
        match *event {
            InteractionEvent::HoverStarted { method, .. } => {
                if let (Some(analytics), Some(meta)) = (self.analytics.as_mut(), metadata) {
                    if let Err(e) = analytics.hover_started(meta, method) {
                        warn!("Analytics hover_started failed: {e}");
                    }
                }
            }
            InteractionEvent::HoverEnded { .. } => {
                if let (Some(analytics), Some(meta)) = (self.analytics.as_mut(), metadata) {
                    if let Err(e) = analytics.hover_ended(meta) {
                        warn!("Analytics hover_ended failed: {e}");
                    }
                }
            }
            InteractionEvent::HoverChanged { .. } => {
                for listener in &mut self.hover_listeners {
                    if let Err(e) = listener(metadata) {
                        warn!("Hover listener failed: {e}");
                    }
                }
            }
            InteractionEvent::Selected { method, .. } => {
                let context = SelectionContext {
                    input_method: method,
                };
                let Some(meta) = metadata else {
                    warn!("Selection dispatched without metadata");
                    return;
                };
                for listener in &mut self.selection_listeners {
                    if let Err(e) = listener(meta, &context) {
                        warn!("Selection listener failed: {e}");
                    }
                }
                for listener in &mut self.selection_state_listeners {
                    if let Err(e) = listener(Some(meta), &context) {
                        warn!("Selection-state listener failed: {e}");
                    }
                }
                if let Some(analytics) = self.analytics.as_mut() {
                    if let Err(e) = analytics.selected(meta, method) {
                        warn!("Analytics selected failed: {e}");
                    }
                }
            }
            InteractionEvent::SelectionCleared { method, .. } => {
                let context = SelectionContext {
                    input_method: method,
                };
                for listener in &mut self.selection_state_listeners {
                    if let Err(e) = listener(None, &context) {
                        warn!("Selection-state listener failed: {e}");
                    }
                }
                if let Some(analytics) = self.analytics.as_mut() {
                    if let Err(e) = analytics.selection_cleared() {
                        warn!("Analytics selection_cleared failed: {e}");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::manager::InteractionManager;
    use crate::interaction::state::Effects;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn meta(id: &str) -> PoiMetadata {
        PoiMetadata {
            id: id.into(),
            title: id.to_uppercase(),
            summary: "exhibit".into(),
            category: "engineering".into(),
            status: None,
            metrics: vec![],
            links: vec![],
            revision: 0,
        }
    }

    /// Feed a transition's effects through the dispatcher the way the input
    /// systems do, resolving metadata from a fixed two-POI catalog.
    fn run(dispatcher: &mut InteractionDispatcher, fx: Effects) {
        let catalog = [meta("a"), meta("b")];
        for event in &fx.events {
            let poi = match *event {
                InteractionEvent::HoverStarted { poi, .. } => Some(poi),
                InteractionEvent::HoverEnded { poi } => Some(poi),
                InteractionEvent::HoverChanged { poi, .. } => poi,
                InteractionEvent::Selected { poi, .. } => Some(poi),
                InteractionEvent::SelectionCleared { poi, .. } => Some(poi),
            };
            dispatcher.dispatch(event, poi.map(|i| &catalog[i]));
        }
    }

    #[derive(Default)]
    struct CountingAnalytics {
        hover_started: usize,
        hover_ended: usize,
        selected: usize,
        cleared: usize,
    }

    #[derive(Clone, Default)]
    struct SharedCounts(Arc<Mutex<CountingAnalytics>>);

    impl InteractionAnalytics for SharedCounts {
        fn hover_started(
            &mut self,
            _poi: &PoiMetadata,
            _method: InputMethod,
        ) -> Result<(), ListenerError> {
            self.0.lock().unwrap().hover_started += 1;
            Ok(())
        }
        fn hover_ended(&mut self, _poi: &PoiMetadata) -> Result<(), ListenerError> {
            self.0.lock().unwrap().hover_ended += 1;
            Ok(())
        }
        fn selected(
            &mut self,
            _poi: &PoiMetadata,
            _method: InputMethod,
        ) -> Result<(), ListenerError> {
            self.0.lock().unwrap().selected += 1;
            Ok(())
        }
        fn selection_cleared(&mut self) -> Result<(), ListenerError> {
            self.0.lock().unwrap().cleared += 1;
            Ok(())
        }
    }

    #[test]
    fn pointer_hover_then_click_fires_expected_listeners() {
        let mut dispatcher = InteractionDispatcher::default();
        let hovered = Arc::new(Mutex::new(Vec::<Option<String>>::new()));
        let selections = Arc::new(Mutex::new(Vec::<(String, InputMethod)>::new()));

        let hover_sink = hovered.clone();
        dispatcher.on_hover(move |meta| {
            hover_sink
                .lock()
                .unwrap()
                .push(meta.map(|m| m.id.clone()));
            Ok(())
        });
        let selection_sink = selections.clone();
        dispatcher.on_selection(move |meta, ctx| {
            selection_sink
                .lock()
                .unwrap()
                .push((meta.id.clone(), ctx.input_method));
            Ok(())
        });

        let mut manager = InteractionManager::default();
        run(&mut dispatcher, manager.pointer_moved(Some(0)));
        run(&mut dispatcher, manager.clicked(Some(0), 1.0));

        assert_eq!(*hovered.lock().unwrap(), vec![Some("a".to_string())]);
        assert_eq!(
            *selections.lock().unwrap(),
            vec![("a".to_string(), InputMethod::Pointer)]
        );
    }

    #[test]
    fn touch_selection_suppresses_the_synthetic_click() {
        let mut dispatcher = InteractionDispatcher::default();
        let count = Arc::new(AtomicUsize::new(0));
        let sink = count.clone();
        dispatcher.on_selection(move |_, _| {
            sink.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let mut manager = InteractionManager::default();
        run(&mut dispatcher, manager.touch_moved(Some(0)));
        run(&mut dispatcher, manager.touch_ended(Some(0), 10.0));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Synthetic click right after the touch: no extra invocation.
        run(&mut dispatcher, manager.clicked(Some(0), 10.2));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // A genuine click on the other POI after the window fires again.
        run(&mut dispatcher, manager.clicked(Some(1), 10.8));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn selection_state_fires_on_both_edges_selection_only_on_select() {
        let mut dispatcher = InteractionDispatcher::default();
        let states = Arc::new(Mutex::new(Vec::<Option<String>>::new()));
        let selected = Arc::new(AtomicUsize::new(0));

        let state_sink = states.clone();
        dispatcher.on_selection_state(move |meta, _| {
            state_sink.lock().unwrap().push(meta.map(|m| m.id.clone()));
            Ok(())
        });
        let select_sink = selected.clone();
        dispatcher.on_selection(move |_, _| {
            select_sink.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let mut manager = InteractionManager::default();
        run(&mut dispatcher, manager.clicked(Some(1), 0.0));
        run(&mut dispatcher, manager.clear_selection());

        assert_eq!(
            *states.lock().unwrap(),
            vec![Some("b".to_string()), None]
        );
        assert_eq!(selected.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failing_listener_does_not_block_the_rest() {
        let mut dispatcher = InteractionDispatcher::default();
        let reached = Arc::new(AtomicUsize::new(0));

        dispatcher.on_selection(|_, _| Err("listener exploded".into()));
        let sink = reached.clone();
        dispatcher.on_selection(move |_, _| {
            sink.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let mut manager = InteractionManager::default();
        run(&mut dispatcher, manager.clicked(Some(0), 0.0));
        assert_eq!(reached.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn analytics_edges_fire_once_per_transition() {
        let mut dispatcher = InteractionDispatcher::default();
        let counts = SharedCounts::default();
        dispatcher.set_analytics(counts.clone());

        let mut manager = InteractionManager::default();
        run(&mut dispatcher, manager.pointer_moved(Some(0)));
        run(&mut dispatcher, manager.pointer_moved(Some(1)));
        run(&mut dispatcher, manager.clicked(Some(1), 0.0));
        // Redundant events must not re-fire edges.
        run(&mut dispatcher, manager.pointer_moved(Some(1)));
        run(&mut dispatcher, manager.clicked(Some(1), 0.1));

        {
            let c = counts.0.lock().unwrap();
            assert_eq!(c.hover_started, 2);
            assert_eq!(c.hover_ended, 1);
            assert_eq!(c.selected, 1);
            assert_eq!(c.cleared, 0);
        }

        // Disposal with the selection still active: exactly one cleared edge.
        run(&mut dispatcher, manager.dispose());
        run(&mut dispatcher, manager.dispose());
        let c = counts.0.lock().unwrap();
        assert_eq!(c.cleared, 1);
    }
}
