use serde::{Deserialize, Serialize};

/// Position of a POI in registry order. Stable for the whole session.
pub type PoiIndex = usize;

/// Input channel that most recently produced a focus change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    Pointer,
    Touch,
    Keyboard,
}

impl InputMethod {
    /// Convert to the string identifier used in event payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pointer => "pointer",
            Self::Touch => "touch",
            Self::Keyboard => "keyboard",
        }
    }
}

/// Transition edge produced by the state machine. Each variant fires at most
/// once per transition; the dispatcher maps edges onto listener calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEvent {
    HoverStarted {
        poi: PoiIndex,
        method: InputMethod,
    },
    HoverEnded {
        poi: PoiIndex,
    },
    /// Fired on every hover change, including hover-clear (`poi: None`).
    HoverChanged {
        poi: Option<PoiIndex>,
        method: InputMethod,
    },
    Selected {
        poi: PoiIndex,
        method: InputMethod,
    },
    SelectionCleared {
        poi: PoiIndex,
        method: InputMethod,
    },
}

/// Side effects of one transition: focus-target writes plus edge events.
/// Applied by the caller after the transition function returns, so hit-test,
/// transition, and dispatch keep their in-frame ordering.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Effects {
    pub focus: Vec<(PoiIndex, f32)>,
    pub events: Vec<InteractionEvent>,
}

impl Effects {
    pub fn is_empty(&self) -> bool {
        self.focus.is_empty() && self.events.is_empty()
    }

    pub fn extend(&mut self, other: Effects) {
        self.focus.extend(other.focus);
        self.events.extend(other.events);
    }

    fn set_focus(&mut self, poi: PoiIndex, target: f32) {
        self.focus.push((poi, target));
    }

    fn emit(&mut self, event: InteractionEvent) {
        self.events.push(event);
    }
}

/// Canonical hover/selection snapshot advanced by pure transition functions.
///
/// Hover and selection are independent references that may alias the same POI
/// or differ; no fourth state exists. `keyboard_index` survives only while
/// focus changes keep coming from the keyboard channel.
#[derive(Debug, Default, Clone)]
pub struct InteractionState {
    pub hovered: Option<PoiIndex>,
    pub selected: Option<PoiIndex>,
    pub keyboard_index: Option<PoiIndex>,
    pub last_method: Option<InputMethod>,
    suppress_clicks_until: f64,
}

impl InteractionState {
    /// Move hover to `candidate`. No-op when the target is unchanged.
    pub fn hover(&mut self, candidate: Option<PoiIndex>, method: InputMethod) -> Effects {
        if self.hovered == candidate {
            return Effects::default();
        }

        let mut fx = Effects::default();
        if let Some(prev) = self.hovered {
            // Selection keeps its focus through a hover change.
            if Some(prev) != self.selected {
                fx.set_focus(prev, 0.0);
            }
            fx.emit(InteractionEvent::HoverEnded { poi: prev });
        }

        match candidate {
            Some(poi) => fx.set_focus(poi, 1.0),
            None => {
                // Re-assert the selection so it never goes dark on hover-clear.
                if let Some(sel) = self.selected {
                    fx.set_focus(sel, 1.0);
                }
            }
        }

        self.hovered = candidate;
        self.note_method(method);
        if let Some(poi) = candidate {
            fx.emit(InteractionEvent::HoverStarted { poi, method });
        }
        fx.emit(InteractionEvent::HoverChanged {
            poi: candidate,
            method,
        });
        fx
    }

    /// Select `poi`. No-op when it is already selected.
    pub fn select(&mut self, poi: PoiIndex, method: InputMethod) -> Effects {
        if self.selected == Some(poi) {
            return Effects::default();
        }

        let mut fx = Effects::default();
        if let Some(prev) = self.selected {
            if Some(prev) != self.hovered {
                fx.set_focus(prev, 0.0);
            }
        }
        fx.set_focus(poi, 1.0);

        self.selected = Some(poi);
        self.note_method(method);
        fx.emit(InteractionEvent::Selected { poi, method });
        fx
    }

    /// Clear the selection only; hover from other channels is untouched.
    pub fn clear_selection(&mut self, method: InputMethod) -> Effects {
        let Some(prev) = self.selected.take() else {
            return Effects::default();
        };

        let mut fx = Effects::default();
        if Some(prev) != self.hovered {
            fx.set_focus(prev, 0.0);
        }
        fx.emit(InteractionEvent::SelectionCleared { poi: prev, method });
        fx
    }

    /// Click at a hit-test result. Clicks inside the touch-suppression window
    /// are discarded unconditionally: they are the browser's synthetic
    /// post-touch click, not a second user intent.
    pub fn clicked(&mut self, candidate: Option<PoiIndex>, now: f64) -> Effects {
        if self.suppression_active(now) {
            return Effects::default();
        }
        match candidate {
            Some(poi) => self.select(poi, InputMethod::Pointer),
            None => Effects::default(),
        }
    }

    /// Primary-touch contact or drag over `candidate`.
    pub fn touch_moved(&mut self, candidate: Option<PoiIndex>) -> Effects {
        self.hover(candidate, InputMethod::Touch)
    }

    /// Primary-touch release. A hit at the release position becomes a
    /// selection and opens the suppression window.
    pub fn touch_ended(
        &mut self,
        candidate: Option<PoiIndex>,
        now: f64,
        suppression_secs: f64,
    ) -> Effects {
        let mut fx = self.hover(candidate, InputMethod::Touch);
        if let Some(poi) = self.hovered {
            fx.extend(self.select(poi, InputMethod::Touch));
            self.suppress_clicks_until = now + suppression_secs;
        }
        fx
    }

    /// Cancelled gesture clears hover without selecting.
    pub fn touch_cancelled(&mut self) -> Effects {
        self.hover(None, InputMethod::Touch)
    }

    /// Cycle the keyboard index through `poi_count` entries, wrapping in both
    /// directions, and hover the indexed POI.
    pub fn key_nav(&mut self, forward: bool, poi_count: usize) -> Effects {
        if poi_count == 0 {
            return Effects::default();
        }
        let next = match self.keyboard_index {
            None if forward => 0,
            None => poi_count - 1,
            Some(i) if forward => (i + 1) % poi_count,
            Some(i) => (i + poi_count - 1) % poi_count,
        };
        self.keyboard_index = Some(next);
        self.hover(Some(next), InputMethod::Keyboard)
    }

    /// Promote the current hover to a selection.
    pub fn key_activate(&mut self) -> Effects {
        match self.hovered {
            Some(poi) => self.select(poi, InputMethod::Keyboard),
            None => Effects::default(),
        }
    }

    pub fn suppression_active(&self, now: f64) -> bool {
        now < self.suppress_clicks_until
    }

    fn note_method(&mut self, method: InputMethod) {
        self.last_method = Some(method);
        // Hover/selection changes from other channels restart keyboard cycling.
        if method != InputMethod::Keyboard {
            self.keyboard_index = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Applies focus effects the way the ECS layer would, tracking the set of
    /// POIs currently at focus target 1.
    fn focused_after(transitions: &[Effects]) -> Vec<PoiIndex> {
        let mut targets: HashMap<PoiIndex, f32> = HashMap::new();
        for fx in transitions {
            for &(poi, target) in &fx.focus {
                targets.insert(poi, target);
            }
        }
        let mut focused: Vec<PoiIndex> = targets
            .into_iter()
            .filter(|&(_, t)| t >= 1.0)
            .map(|(poi, _)| poi)
            .collect();
        focused.sort_unstable();
        focused
    }

    #[test]
    fn hover_changes_keep_single_focus_without_selection() {
        let mut state = InteractionState::default();
        let fx = vec![
            state.hover(Some(0), InputMethod::Pointer),
            state.hover(Some(3), InputMethod::Pointer),
            state.hover(Some(1), InputMethod::Pointer),
        ];
        assert_eq!(focused_after(&fx), vec![1]);

        let mut fx = fx;
        fx.push(state.hover(None, InputMethod::Pointer));
        assert_eq!(focused_after(&fx), Vec::<PoiIndex>::new());
    }

    #[test]
    fn selection_and_hover_may_both_hold_focus() {
        let mut state = InteractionState::default();
        let mut fx = vec![state.select(0, InputMethod::Pointer)];
        fx.push(state.hover(Some(2), InputMethod::Pointer));
        assert_eq!(focused_after(&fx), vec![0, 2]);

        // Clearing hover leaves only the selection lit.
        fx.push(state.hover(None, InputMethod::Pointer));
        assert_eq!(focused_after(&fx), vec![0]);
    }

    #[test]
    fn hover_aliasing_the_selection_reports_one_focus() {
        let mut state = InteractionState::default();
        let fx = vec![
            state.select(1, InputMethod::Pointer),
            state.hover(Some(1), InputMethod::Pointer),
        ];
        assert_eq!(focused_after(&fx), vec![1]);
    }

    #[test]
    fn hover_is_idempotent() {
        let mut state = InteractionState::default();
        state.hover(Some(2), InputMethod::Pointer);
        assert!(state.hover(Some(2), InputMethod::Pointer).is_empty());
        assert!(state.hover(Some(2), InputMethod::Touch).is_empty());
    }

    #[test]
    fn reselecting_the_same_poi_is_a_no_op() {
        let mut state = InteractionState::default();
        state.select(4, InputMethod::Pointer);
        assert!(state.select(4, InputMethod::Pointer).is_empty());
    }

    #[test]
    fn replacing_a_selection_keeps_hovered_previous_selection_lit() {
        let mut state = InteractionState::default();
        state.select(0, InputMethod::Pointer);
        state.hover(Some(0), InputMethod::Pointer);
        let fx = state.select(2, InputMethod::Pointer);
        // POI 0 is still hovered, so it must not be defocused.
        assert!(!fx.focus.contains(&(0, 0.0)));
        assert!(fx.focus.contains(&(2, 1.0)));
    }

    #[test]
    fn escape_clears_selection_but_not_hover() {
        let mut state = InteractionState::default();
        state.hover(Some(1), InputMethod::Pointer);
        state.select(3, InputMethod::Pointer);
        let fx = state.clear_selection(InputMethod::Keyboard);
        assert_eq!(state.selected, None);
        assert_eq!(state.hovered, Some(1));
        assert!(fx.focus.contains(&(3, 0.0)));
        assert!(matches!(
            fx.events[..],
            [InteractionEvent::SelectionCleared { poi: 3, .. }]
        ));
    }

    #[test]
    fn clearing_without_selection_is_a_no_op() {
        let mut state = InteractionState::default();
        assert!(state.clear_selection(InputMethod::Keyboard).is_empty());
    }

    #[test]
    fn keyboard_cycles_forward_with_wrap() {
        let mut state = InteractionState::default();
        let n = 4;
        let mut visited = Vec::new();
        for _ in 0..n + 1 {
            state.key_nav(true, n);
            visited.push(state.keyboard_index.unwrap());
        }
        assert_eq!(visited, vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn keyboard_retreat_is_the_exact_inverse() {
        let mut state = InteractionState::default();
        let n = 3;
        state.key_nav(false, n);
        assert_eq!(state.keyboard_index, Some(2));
        state.key_nav(false, n);
        assert_eq!(state.keyboard_index, Some(1));
        state.key_nav(true, n);
        assert_eq!(state.keyboard_index, Some(2));
    }

    #[test]
    fn key_nav_with_no_pois_does_nothing() {
        let mut state = InteractionState::default();
        assert!(state.key_nav(true, 0).is_empty());
        assert_eq!(state.keyboard_index, None);
    }

    #[test]
    fn pointer_hover_resets_keyboard_index() {
        let mut state = InteractionState::default();
        state.key_nav(true, 5);
        state.key_nav(true, 5);
        assert_eq!(state.keyboard_index, Some(1));
        state.hover(Some(4), InputMethod::Pointer);
        assert_eq!(state.keyboard_index, None);
        // Cycling restarts from the beginning.
        state.key_nav(true, 5);
        assert_eq!(state.keyboard_index, Some(0));
    }

    #[test]
    fn key_activate_promotes_hover() {
        let mut state = InteractionState::default();
        state.key_nav(true, 2);
        let fx = state.key_activate();
        assert_eq!(state.selected, Some(0));
        assert!(matches!(
            fx.events[..],
            [InteractionEvent::Selected {
                poi: 0,
                method: InputMethod::Keyboard,
            }]
        ));
        // Without a hover there is nothing to activate.
        let mut bare = InteractionState::default();
        assert!(bare.key_activate().is_empty());
    }

    #[test]
    fn touch_end_selects_and_opens_suppression_window() {
        let mut state = InteractionState::default();
        state.touch_moved(Some(1));
        let fx = state.touch_ended(Some(1), 10.0, 0.5);
        assert_eq!(state.selected, Some(1));
        assert!(fx
            .events
            .iter()
            .any(|e| matches!(e, InteractionEvent::Selected { poi: 1, method: InputMethod::Touch })));

        // The synthetic click inside the window is discarded.
        assert!(state.clicked(Some(2), 10.3).is_empty());
        assert_eq!(state.selected, Some(1));

        // A genuine click after the window selects normally.
        let fx = state.clicked(Some(2), 10.6);
        assert_eq!(state.selected, Some(2));
        assert!(!fx.is_empty());
    }

    #[test]
    fn touch_end_on_empty_space_clears_hover_without_selecting() {
        let mut state = InteractionState::default();
        state.touch_moved(Some(0));
        let fx = state.touch_ended(None, 5.0, 0.5);
        assert_eq!(state.selected, None);
        assert_eq!(state.hovered, None);
        assert!(!state.suppression_active(5.1));
        assert!(fx
            .events
            .iter()
            .all(|e| !matches!(e, InteractionEvent::Selected { .. })));
    }

    #[test]
    fn touch_cancel_clears_hover_without_selecting() {
        let mut state = InteractionState::default();
        state.touch_moved(Some(2));
        let fx = state.touch_cancelled();
        assert_eq!(state.hovered, None);
        assert_eq!(state.selected, None);
        assert!(matches!(
            fx.events[..],
            [
                InteractionEvent::HoverEnded { poi: 2 },
                InteractionEvent::HoverChanged { poi: None, .. },
            ]
        ));
    }

    #[test]
    fn hover_change_emits_ordered_edges() {
        let mut state = InteractionState::default();
        state.hover(Some(0), InputMethod::Pointer);
        let fx = state.hover(Some(1), InputMethod::Pointer);
        assert_eq!(
            fx.events,
            vec![
                InteractionEvent::HoverEnded { poi: 0 },
                InteractionEvent::HoverStarted {
                    poi: 1,
                    method: InputMethod::Pointer,
                },
                InteractionEvent::HoverChanged {
                    poi: Some(1),
                    method: InputMethod::Pointer,
                },
            ]
        );
    }

    #[test]
    fn input_method_strings_match_payload_contract() {
        assert_eq!(InputMethod::Pointer.as_str(), "pointer");
        assert_eq!(InputMethod::Touch.as_str(), "touch");
        assert_eq!(InputMethod::Keyboard.as_str(), "keyboard");
    }
}
