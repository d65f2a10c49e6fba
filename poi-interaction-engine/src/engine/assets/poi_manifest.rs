use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Labelled metric rendered on the tooltip (visitor counts, build years, …).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiMetric {
    pub label: String,
    pub value: String,
}

/// External link attached to an exhibit. Display-only metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiLink {
    pub label: String,
    pub url: String,
}

/// Descriptive exhibit metadata consumed only for display and event
/// payloads. `revision` increments whenever the frontend pushes a content
/// update, so cached tooltip renders can be invalidated without a target
/// change.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiMetadata {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<String>,
    #[serde(default)]
    pub metrics: Vec<PoiMetric>,
    #[serde(default)]
    pub links: Vec<PoiLink>,
    #[serde(default)]
    pub revision: u64,
}

fn default_anchor_height() -> f32 {
    1.4
}

/// One POI entry as authored in the manifest. Mirrors the JSON structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoiDefinition {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub category: String,
    /// Marker position in world coordinates.
    pub position: [f32; 3],
    /// Invisible hit-volume extents around the marker.
    pub hit_size: [f32; 3],
    #[serde(default = "default_anchor_height")]
    pub anchor_height: f32,
    /// Ordering slot in the idle guided tour, when the exhibit takes part.
    #[serde(default)]
    pub tour_stop: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub metrics: Vec<PoiMetric>,
    #[serde(default)]
    pub links: Vec<PoiLink>,
}

impl PoiDefinition {
    pub fn metadata(&self) -> PoiMetadata {
        PoiMetadata {
            id: self.id.clone(),
            title: self.title.clone(),
            summary: self.summary.clone(),
            category: self.category.clone(),
            status: self.status.clone(),
            metrics: self.metrics.clone(),
            links: self.links.clone(),
            revision: 0,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn hit_size(&self) -> Vec3 {
        Vec3::from_array(self.hit_size)
    }
}

/// Scene-wide settings carried by the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneInfo {
    pub name: String,
    pub ground_radius: f32,
}

/// Complete POI catalog as a Bevy asset. Loaded once at startup; POI
/// identity is immutable for the session afterwards.
#[derive(Asset, Debug, Clone, Serialize, Deserialize, TypePath)]
pub struct PoiManifest {
    pub scene: SceneInfo,
    pub pois: Vec<PoiDefinition>,
}

impl PoiManifest {
    pub fn scene_centre(&self) -> Vec3 {
        if self.pois.is_empty() {
            return Vec3::ZERO;
        }
        let sum: Vec3 = self.pois.iter().map(PoiDefinition::position).sum();
        sum / self.pois.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "scene": { "name": "night-garden", "ground_radius": 24.0 },
        "pois": [
            {
                "id": "greenhouse",
                "title": "Solar Greenhouse",
                "summary": "Automated greenhouse build.",
                "category": "environment",
                "position": [0.0, 0.0, 0.0],
                "hit_size": [2.0, 3.0, 2.0],
                "tour_stop": 1,
                "metrics": [ { "label": "Plants", "value": "42" } ]
            },
            {
                "id": "rocket",
                "title": "Model Rocket",
                "summary": "Two-stage flight computer.",
                "category": "engineering",
                "position": [3.0, 0.0, 0.0],
                "hit_size": [1.5, 4.0, 1.5]
            }
        ]
    }"#;

    #[test]
    fn manifest_parses_with_defaults() {
        let manifest: PoiManifest = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(manifest.scene.name, "night-garden");
        assert_eq!(manifest.pois.len(), 2);

        let rocket = &manifest.pois[1];
        assert_eq!(rocket.anchor_height, default_anchor_height());
        assert_eq!(rocket.tour_stop, None);
        assert!(rocket.metrics.is_empty());
        assert_eq!(rocket.position(), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn metadata_starts_at_revision_zero() {
        let manifest: PoiManifest = serde_json::from_str(SAMPLE).unwrap();
        let meta = manifest.pois[0].metadata();
        assert_eq!(meta.revision, 0);
        assert_eq!(meta.metrics[0].value, "42");
    }

    #[test]
    fn scene_centre_averages_poi_positions() {
        let manifest: PoiManifest = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(manifest.scene_centre(), Vec3::new(1.5, 0.0, 0.0));
    }
}
