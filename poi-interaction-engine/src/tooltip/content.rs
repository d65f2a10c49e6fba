use bevy::prelude::*;

use constants::category::{get_category_accent, get_category_label};

use crate::engine::assets::poi_manifest::PoiMetadata;
use crate::interaction::state::InputMethod;
use crate::tooltip::presenter::TooltipMode;

/// Everything a surface needs to rasterize one tooltip panel. Built fresh on
/// each re-render; the presenter's cache decides when that happens.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub title: String,
    pub category_label: String,
    pub accent: LinearRgba,
    pub summary: String,
    pub status: Option<String>,
    pub metrics: Vec<(String, String)>,
    pub prompt: String,
}

impl TooltipContent {
    pub fn from_metadata(meta: &PoiMetadata, mode: TooltipMode, method: InputMethod) -> Self {
        Self {
            title: meta.title.clone(),
            category_label: get_category_label(&meta.category),
            accent: get_category_accent(&meta.category),
            summary: meta.summary.clone(),
            status: meta.status.clone(),
            metrics: meta
                .metrics
                .iter()
                .map(|m| (m.label.clone(), m.value.clone()))
                .collect(),
            prompt: prompt_copy(mode, method).to_string(),
        }
    }
}

/// Interaction hint shown at the bottom of the panel, matched to the channel
/// that most recently moved the focus.
pub fn prompt_copy(mode: TooltipMode, method: InputMethod) -> &'static str {
    match (mode, method) {
        (TooltipMode::Selected, InputMethod::Touch) => "Tap empty space to close",
        (TooltipMode::Selected, _) => "Press Esc to close",
        (TooltipMode::Hovered, InputMethod::Pointer) => "Click to open",
        (TooltipMode::Hovered, InputMethod::Touch) => "Tap to open",
        (TooltipMode::Hovered, InputMethod::Keyboard) => "Press Enter to open",
        (TooltipMode::Recommended, InputMethod::Touch) => "Tap to visit",
        (TooltipMode::Recommended, InputMethod::Keyboard) => "Press Enter to visit",
        (TooltipMode::Recommended, InputMethod::Pointer) => "Click to visit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::poi_manifest::PoiMetric;

    fn meta() -> PoiMetadata {
        PoiMetadata {
            id: "greenhouse".into(),
            title: "Solar Greenhouse".into(),
            summary: "Automated greenhouse build.".into(),
            category: "environment".into(),
            status: Some("online".into()),
            metrics: vec![PoiMetric {
                label: "Plants".into(),
                value: "42".into(),
            }],
            links: vec![],
            revision: 3,
        }
    }

    #[test]
    fn content_carries_category_label_and_metrics() {
        let content =
            TooltipContent::from_metadata(&meta(), TooltipMode::Hovered, InputMethod::Pointer);
        assert_eq!(content.category_label, "Environment");
        assert_eq!(content.metrics, vec![("Plants".to_string(), "42".to_string())]);
        assert_eq!(content.status.as_deref(), Some("online"));
    }

    #[test]
    fn prompt_copy_tracks_the_input_channel() {
        assert_eq!(
            prompt_copy(TooltipMode::Hovered, InputMethod::Pointer),
            "Click to open"
        );
        assert_eq!(
            prompt_copy(TooltipMode::Hovered, InputMethod::Touch),
            "Tap to open"
        );
        assert_eq!(
            prompt_copy(TooltipMode::Hovered, InputMethod::Keyboard),
            "Press Enter to open"
        );
        assert_eq!(
            prompt_copy(TooltipMode::Selected, InputMethod::Touch),
            "Tap empty space to close"
        );
    }
}
