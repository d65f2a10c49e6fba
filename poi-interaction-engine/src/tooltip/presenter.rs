use constants::interaction::{
    TOOLTIP_FADE_SECS, TOOLTIP_OPACITY_HOVERED, TOOLTIP_OPACITY_RECOMMENDED,
    TOOLTIP_OPACITY_SELECTED,
};

use crate::interaction::state::PoiIndex;

/// Active presentation mode. Absence (faded out / nothing to show) is
/// modelled as `Option<TooltipMode>` on the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipMode {
    Hovered,
    Selected,
    Recommended,
}

impl TooltipMode {
    pub fn target_opacity(&self) -> f32 {
        match self {
            Self::Selected => TOOLTIP_OPACITY_SELECTED,
            Self::Hovered => TOOLTIP_OPACITY_HOVERED,
            Self::Recommended => TOOLTIP_OPACITY_RECOMMENDED,
        }
    }
}

/// Per-frame inputs resolved by the scene: interaction state, the ambient
/// recommendation, and the two gates that decide whether the recommendation
/// may render at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct TooltipInputs {
    pub hovered: Option<PoiIndex>,
    pub selected: Option<PoiIndex>,
    pub recommended: Option<PoiIndex>,
    pub idle: bool,
    pub tour_enabled: bool,
}

/// What the scene layer must do with this frame: optionally re-rasterize for
/// `render`, apply `opacity`, and show or hide the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipFrame {
    pub mode: Option<TooltipMode>,
    pub target: Option<PoiIndex>,
    pub opacity: f32,
    pub visible: bool,
    pub render: Option<PoiIndex>,
}

/// Mode/fade/cache state machine behind the world-anchored tooltip panel.
/// Pure: callers supply the elapsed delta and a revision lookup, so every
/// behaviour is unit-testable without a scene graph.
#[derive(Debug)]
pub struct TooltipPresenter {
    mode: Option<TooltipMode>,
    target: Option<PoiIndex>,
    opacity: f32,
    visible: bool,
    /// Target and metadata revision of the last rasterized panel.
    cached: Option<(PoiIndex, u64)>,
    fade_secs: f32,
}

impl Default for TooltipPresenter {
    fn default() -> Self {
        Self {
            mode: None,
            target: None,
            opacity: 0.0,
            visible: false,
            cached: None,
            fade_secs: TOOLTIP_FADE_SECS,
        }
    }
}

impl TooltipPresenter {
    /// Mode precedence: selected → hovered → recommended (idle- and
    /// preference-gated) → none.
    pub fn resolve_mode(inputs: &TooltipInputs) -> Option<(PoiIndex, TooltipMode)> {
        if let Some(selected) = inputs.selected {
            return Some((selected, TooltipMode::Selected));
        }
        if let Some(hovered) = inputs.hovered {
            return Some((hovered, TooltipMode::Hovered));
        }
        if inputs.idle && inputs.tour_enabled {
            if let Some(recommended) = inputs.recommended {
                return Some((recommended, TooltipMode::Recommended));
            }
        }
        None
    }

    /// Advance one frame. `revision_of` resolves a POI to its current
    /// metadata revision; a target that resolves to `None` is stale and
    /// fades out rather than rendering old content.
    pub fn update(
        &mut self,
        inputs: &TooltipInputs,
        revision_of: &dyn Fn(PoiIndex) -> Option<u64>,
        dt: f32,
    ) -> TooltipFrame {
        let resolved = Self::resolve_mode(inputs)
            .and_then(|(target, mode)| revision_of(target).map(|rev| (target, mode, rev)));

        let mut render = None;
        match resolved {
            Some((target, mode, revision)) => {
                self.mode = Some(mode);
                self.target = Some(target);
                self.visible = true;
                if self.cached != Some((target, revision)) {
                    render = Some(target);
                    self.cached = Some((target, revision));
                }
            }
            None => self.mode = None,
        }

        // Linear, frame-rate-independent approach toward the mode's opacity.
        let goal = self.mode.map_or(0.0, |mode| mode.target_opacity());
        let step = if self.fade_secs > 0.0 {
            dt / self.fade_secs
        } else {
            1.0
        };
        self.opacity = (self.opacity + (goal - self.opacity).clamp(-step, step)).clamp(0.0, 1.0);

        if self.mode.is_none() && self.opacity <= f32::EPSILON {
            self.opacity = 0.0;
            self.visible = false;
            self.target = None;
        }

        TooltipFrame {
            mode: self.mode,
            target: self.target,
            opacity: self.opacity,
            visible: self.visible,
            render,
        }
    }

    pub fn mode(&self) -> Option<TooltipMode> {
        self.mode
    }

    pub fn target(&self) -> Option<PoiIndex> {
        self.target
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every POI exists at revision 0 unless the test says otherwise.
    fn any_revision(_: PoiIndex) -> Option<u64> {
        Some(0)
    }

    fn settle(presenter: &mut TooltipPresenter, inputs: &TooltipInputs) -> TooltipFrame {
        let mut frame = presenter.update(inputs, &any_revision, 1.0);
        // A second long step guarantees the fade has converged.
        frame = presenter.update(inputs, &any_revision, 1.0);
        frame
    }

    #[test]
    fn selected_outranks_hovered() {
        let mut presenter = TooltipPresenter::default();
        let inputs = TooltipInputs {
            hovered: Some(1),
            selected: Some(0),
            ..Default::default()
        };
        let frame = presenter.update(&inputs, &any_revision, 0.016);
        assert_eq!(frame.mode, Some(TooltipMode::Selected));
        assert_eq!(frame.target, Some(0));

        // Clearing the selection flips to hovered on the next update.
        let inputs = TooltipInputs {
            hovered: Some(1),
            ..Default::default()
        };
        let frame = presenter.update(&inputs, &any_revision, 0.016);
        assert_eq!(frame.mode, Some(TooltipMode::Hovered));
        assert_eq!(frame.target, Some(1));
    }

    #[test]
    fn recommended_requires_both_idle_and_preference() {
        let mut presenter = TooltipPresenter::default();
        let mut inputs = TooltipInputs {
            recommended: Some(2),
            idle: true,
            tour_enabled: false,
            ..Default::default()
        };
        let frame = presenter.update(&inputs, &any_revision, 0.016);
        assert_eq!(frame.mode, None);

        inputs.tour_enabled = true;
        let frame = presenter.update(&inputs, &any_revision, 0.016);
        assert_eq!(frame.mode, Some(TooltipMode::Recommended));

        inputs.idle = false;
        let frame = presenter.update(&inputs, &any_revision, 0.016);
        assert_eq!(frame.mode, None);
    }

    #[test]
    fn hover_preempts_recommendation() {
        let mut presenter = TooltipPresenter::default();
        let inputs = TooltipInputs {
            hovered: Some(1),
            recommended: Some(2),
            idle: true,
            tour_enabled: true,
            ..Default::default()
        };
        let frame = presenter.update(&inputs, &any_revision, 0.016);
        assert_eq!(frame.mode, Some(TooltipMode::Hovered));
    }

    #[test]
    fn opacity_eases_toward_mode_target_and_clamps() {
        let mut presenter = TooltipPresenter::default();
        let inputs = TooltipInputs {
            selected: Some(0),
            ..Default::default()
        };
        let step = presenter.update(&inputs, &any_revision, TOOLTIP_FADE_SECS * 0.5);
        assert!(step.opacity > 0.0 && step.opacity < 1.0);
        let settled = settle(&mut presenter, &inputs);
        assert_eq!(settled.opacity, TOOLTIP_OPACITY_SELECTED);

        // Dropping to hovered eases down toward 0.85, never below.
        let inputs = TooltipInputs {
            hovered: Some(0),
            ..Default::default()
        };
        let settled = settle(&mut presenter, &inputs);
        assert_eq!(settled.opacity, TOOLTIP_OPACITY_HOVERED);
    }

    #[test]
    fn fading_out_keeps_anchor_until_fully_hidden() {
        let mut presenter = TooltipPresenter::default();
        let hovered = TooltipInputs {
            hovered: Some(3),
            ..Default::default()
        };
        settle(&mut presenter, &hovered);

        let empty = TooltipInputs::default();
        let frame = presenter.update(&empty, &any_revision, TOOLTIP_FADE_SECS * 0.25);
        assert_eq!(frame.mode, None);
        assert!(frame.visible, "panel stays visible while fading");
        assert_eq!(frame.target, Some(3), "anchor tracked through the fade");

        let frame = settle(&mut presenter, &empty);
        assert!(!frame.visible);
        assert_eq!(frame.target, None, "tracked POI cleared once hidden");
        assert_eq!(frame.opacity, 0.0);
    }

    #[test]
    fn rerenders_only_on_target_or_revision_change() {
        let mut presenter = TooltipPresenter::default();
        let inputs = TooltipInputs {
            hovered: Some(0),
            ..Default::default()
        };
        let frame = presenter.update(&inputs, &any_revision, 0.016);
        assert_eq!(frame.render, Some(0));

        // Same target, same revision: cached render is reused.
        let frame = presenter.update(&inputs, &any_revision, 0.016);
        assert_eq!(frame.render, None);

        // Content update bumps the revision and invalidates the cache.
        let bumped = |_: PoiIndex| Some(1u64);
        let frame = presenter.update(&inputs, &bumped, 0.016);
        assert_eq!(frame.render, Some(0));

        // Target change re-renders as well.
        let inputs = TooltipInputs {
            hovered: Some(4),
            ..Default::default()
        };
        let frame = presenter.update(&inputs, &bumped, 0.016);
        assert_eq!(frame.render, Some(4));
    }

    #[test]
    fn stale_target_fades_out_instead_of_rendering() {
        let mut presenter = TooltipPresenter::default();
        let inputs = TooltipInputs {
            hovered: Some(0),
            ..Default::default()
        };
        settle(&mut presenter, &inputs);

        let gone = |_: PoiIndex| None;
        let frame = presenter.update(&inputs, &gone, 0.016);
        assert_eq!(frame.mode, None);
        assert_eq!(frame.render, None);
        assert!(frame.opacity < TOOLTIP_OPACITY_HOVERED);
    }
}
