use bevy::prelude::*;

use super::state::{Effects, InputMethod, InteractionState, PoiIndex};

/// Behavioural configuration for the interaction core. The magnitudes are
/// tunable; defaults live in the shared constants crate.
#[derive(Debug, Clone)]
pub struct InteractionConfig {
    /// When false, keyboard navigation events are ignored entirely.
    pub keyboard_nav: bool,
    pub touch_suppression_secs: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            keyboard_nav: true,
            touch_suppression_secs: constants::interaction::TOUCH_SUPPRESSION_SECS,
        }
    }
}

/// Resource owning the canonical interaction state. Input systems resolve a
/// hit-test candidate first, then call one handler here; every handler
/// returns the effects to apply downstream and is inert after disposal.
#[derive(Resource, Default)]
pub struct InteractionManager {
    state: InteractionState,
    config: InteractionConfig,
    disposed: bool,
}

impl InteractionManager {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            state: InteractionState::default(),
            config,
            disposed: false,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn pointer_moved(&mut self, candidate: Option<PoiIndex>) -> Effects {
        if self.disposed {
            return Effects::default();
        }
        self.state.hover(candidate, InputMethod::Pointer)
    }

    /// Pointer left the render surface. A live selection keeps its focus
    /// through the selection reference, not the hover.
    pub fn pointer_left(&mut self) -> Effects {
        if self.disposed {
            return Effects::default();
        }
        self.state.hover(None, InputMethod::Pointer)
    }

    pub fn clicked(&mut self, candidate: Option<PoiIndex>, now: f64) -> Effects {
        if self.disposed {
            return Effects::default();
        }
        self.state.clicked(candidate, now)
    }

    pub fn touch_moved(&mut self, candidate: Option<PoiIndex>) -> Effects {
        if self.disposed {
            return Effects::default();
        }
        self.state.touch_moved(candidate)
    }

    pub fn touch_ended(&mut self, candidate: Option<PoiIndex>, now: f64) -> Effects {
        if self.disposed {
            return Effects::default();
        }
        self.state
            .touch_ended(candidate, now, self.config.touch_suppression_secs)
    }

    pub fn touch_cancelled(&mut self) -> Effects {
        if self.disposed {
            return Effects::default();
        }
        self.state.touch_cancelled()
    }

    pub fn key_nav(&mut self, forward: bool, poi_count: usize) -> Effects {
        if self.disposed || !self.config.keyboard_nav {
            return Effects::default();
        }
        self.state.key_nav(forward, poi_count)
    }

    pub fn key_activate(&mut self) -> Effects {
        if self.disposed || !self.config.keyboard_nav {
            return Effects::default();
        }
        self.state.key_activate()
    }

    pub fn clear_selection(&mut self) -> Effects {
        if self.disposed || !self.config.keyboard_nav {
            return Effects::default();
        }
        self.state.clear_selection(InputMethod::Keyboard)
    }

    /// Programmatic selection by registry index. Behaves like an interactive
    /// selection; attributed to the keyboard channel since it has no
    /// pointer or touch origin.
    pub fn select_index(&mut self, poi: PoiIndex) -> Effects {
        if self.disposed {
            return Effects::default();
        }
        self.state.select(poi, InputMethod::Keyboard)
    }

    /// Tear the manager down: clear hover and selection so the matching
    /// transition edges fire exactly once, then ignore all further input.
    /// Repeated disposal is a no-op.
    pub fn dispose(&mut self) -> Effects {
        if self.disposed {
            return Effects::default();
        }
        let mut fx = self.state.hover(None, InputMethod::Pointer);
        fx.extend(self.state.clear_selection(InputMethod::Pointer));
        self.disposed = true;
        fx
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
