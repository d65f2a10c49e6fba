use bevy::prelude::*;

use constants::category::get_category_accent;
use constants::interaction::{
    ACTIVATION_DECAY_RATE, FOCUS_EASE_RATE, MARKER_EMISSIVE_ACTIVATION_BOOST,
    MARKER_EMISSIVE_BASE, MARKER_EMISSIVE_FOCUS_BOOST, MARKER_FOCUS_SCALE_BOOST, MARKER_HEIGHT,
    MARKER_RADIUS,
};
use serde::Deserialize;

use crate::engine::assets::poi_manifest::{PoiManifest, PoiMetadata, PoiMetric};
use crate::interaction::events::PoiSelectedEvent;
use crate::interaction::state::PoiIndex;

// Components

/// Marks a POI marker entity with its registry position.
#[derive(Component)]
pub struct Poi {
    pub index: PoiIndex,
}

/// Invisible box extents used only for ray intersection, decoupled from the
/// visible marker mesh.
#[derive(Component)]
pub struct PoiHitVolume {
    pub size: Vec3,
}

/// Tooltip anchor height above the marker origin.
#[derive(Component)]
pub struct PoiAnchor {
    pub height: f32,
}

/// Axis-aligned world X/Z rectangle for movement and analytics collaborators.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PoiCollider2d {
    pub min: Vec2,
    pub max: Vec2,
}

impl PoiCollider2d {
    pub fn from_centre_size(centre: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: centre - half,
            max: centre + half,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn centre(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Animated highlight state. The interaction core writes `target` only;
/// `focus` and `activation` are smoothed here, in the render loop.
#[derive(Component, Default)]
pub struct PoiFocus {
    pub target: f32,
    pub focus: f32,
    pub activation: f32,
}

/// Per-marker visual tuning resolved from the exhibit category.
#[derive(Component)]
pub struct MarkerVisual {
    pub accent: LinearRgba,
}

// Registry

struct RegistryEntry {
    entity: Entity,
    id: String,
    tour_stop: Option<u32>,
}

/// Ordered POI list built once at spawn. Keyboard cycling and all event
/// payloads resolve through it; iteration order doubles as the hit-test
/// tie-break order.
#[derive(Resource, Default)]
pub struct PoiRegistry {
    entries: Vec<RegistryEntry>,
}

impl PoiRegistry {
    pub fn push(&mut self, entity: Entity, id: String, tour_stop: Option<u32>) -> PoiIndex {
        self.entries.push(RegistryEntry {
            entity,
            id,
            tour_stop,
        });
        self.entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entity(&self, index: PoiIndex) -> Option<Entity> {
        self.entries.get(index).map(|e| e.entity)
    }

    pub fn id(&self, index: PoiIndex) -> Option<&str> {
        self.entries.get(index).map(|e| e.id.as_str())
    }

    pub fn index_of_id(&self, id: &str) -> Option<PoiIndex> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PoiIndex, Entity)> + '_ {
        self.entries.iter().enumerate().map(|(i, e)| (i, e.entity))
    }

    /// Indices taking part in the guided tour, in ascending stop order.
    pub fn tour_route(&self) -> Vec<PoiIndex> {
        let mut route: Vec<(u32, PoiIndex)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.tour_stop.map(|stop| (stop, i)))
            .collect();
        route.sort_unstable();
        route.into_iter().map(|(_, i)| i).collect()
    }
}

// Spawning

/// Spawn one glowing marker per manifest entry and build the registry.
pub fn spawn_poi_markers(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    manifest: &PoiManifest,
) -> PoiRegistry {
    let mut registry = PoiRegistry::default();
    let marker_mesh = meshes.add(Sphere::new(MARKER_RADIUS));

    for definition in &manifest.pois {
        let accent = get_category_accent(&definition.category);
        let material = materials.add(StandardMaterial {
            base_color: Color::srgb(0.08, 0.09, 0.12),
            emissive: accent * MARKER_EMISSIVE_BASE,
            perceptual_roughness: 0.4,
            ..default()
        });

        let position = definition.position() + Vec3::Y * MARKER_HEIGHT;
        let footprint = Vec2::new(definition.hit_size[0], definition.hit_size[2]);
        let entity = commands
            .spawn((
                Mesh3d(marker_mesh.clone()),
                MeshMaterial3d(material),
                Transform::from_translation(position),
                PoiHitVolume {
                    size: definition.hit_size(),
                },
                PoiAnchor {
                    height: definition.anchor_height,
                },
                PoiCollider2d::from_centre_size(
                    Vec2::new(definition.position[0], definition.position[2]),
                    footprint,
                ),
                PoiFocus::default(),
                MarkerVisual { accent },
                definition.metadata(),
            ))
            .id();

        let index = registry.push(entity, definition.id.clone(), definition.tour_stop);
        commands.entity(entity).insert(Poi { index });
    }

    info!("Spawned {} POI markers", registry.len());
    registry
}

// Animation

/// Render-loop owner of the smoothed focus values: eases `focus` toward the
/// target written by the interaction core, decays the selection pulse, and
/// feeds both into marker glow and scale.
pub fn animate_poi_focus(
    time: Res<Time>,
    mut markers: Query<
        (
            &mut PoiFocus,
            &mut Transform,
            &MarkerVisual,
            &MeshMaterial3d<StandardMaterial>,
        ),
        With<Poi>,
    >,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let dt = time.delta_secs();
    let ease = 1.0 - (-FOCUS_EASE_RATE * dt).exp();
    let decay = (-ACTIVATION_DECAY_RATE * dt).exp();

    for (mut focus, mut transform, visual, material) in &mut markers {
        let target = focus.target;
        focus.focus += (target - focus.focus) * ease;
        focus.activation *= decay;

        transform.scale = Vec3::splat(
            1.0 + MARKER_FOCUS_SCALE_BOOST * focus.focus + 0.1 * focus.activation,
        );
        if let Some(mat) = materials.get_mut(&material.0) {
            mat.emissive = visual.accent
                * (MARKER_EMISSIVE_BASE
                    + MARKER_EMISSIVE_FOCUS_BOOST * focus.focus
                    + MARKER_EMISSIVE_ACTIVATION_BOOST * focus.activation);
        }
    }
}

/// Kick the activation pulse when a selection lands.
pub fn pulse_on_selection(
    mut events: EventReader<PoiSelectedEvent>,
    registry: Res<PoiRegistry>,
    mut markers: Query<&mut PoiFocus>,
) {
    for event in events.read() {
        let Some(meta) = &event.poi else { continue };
        let Some(index) = registry.index_of_id(&meta.id) else { continue };
        let Some(entity) = registry.entity(index) else { continue };
        if let Ok(mut focus) = markers.get_mut(entity) {
            focus.activation = 1.0;
        }
    }
}

// Content updates

/// Live metadata change pushed by the frontend. Invalidates cached tooltip
/// renders through the revision bump, without a target change.
#[derive(Event, Debug, Clone, Deserialize)]
pub struct PoiContentUpdate {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub metrics: Option<Vec<PoiMetric>>,
}

pub fn apply_content_updates(
    mut events: EventReader<PoiContentUpdate>,
    registry: Res<PoiRegistry>,
    mut metadata: Query<&mut PoiMetadata>,
) {
    for update in events.read() {
        let Some(index) = registry.index_of_id(&update.id) else {
            warn!("Content update for unknown POI: {}", update.id);
            continue;
        };
        let Some(entity) = registry.entity(index) else { continue };
        let Ok(mut meta) = metadata.get_mut(entity) else { continue };

        if let Some(summary) = &update.summary {
            meta.summary = summary.clone();
        }
        if let Some(status) = &update.status {
            meta.status = Some(status.clone());
        }
        if let Some(metrics) = &update.metrics {
            meta.metrics = metrics.clone();
        }
        meta.revision += 1;
        info!("POI content updated: {} (revision {})", meta.id, meta.revision);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_of(ids: &[(&str, Option<u32>)]) -> PoiRegistry {
        let mut registry = PoiRegistry::default();
        for (i, (id, stop)) in ids.iter().enumerate() {
            registry.push(Entity::from_raw(i as u32), id.to_string(), *stop);
        }
        registry
    }

    #[test]
    fn registry_resolves_ids_both_ways() {
        let registry = registry_of(&[("greenhouse", None), ("rocket", Some(2))]);
        assert_eq!(registry.index_of_id("rocket"), Some(1));
        assert_eq!(registry.id(1), Some("rocket"));
        assert_eq!(registry.index_of_id("lantern"), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn tour_route_orders_by_stop_not_registry_position() {
        let registry = registry_of(&[
            ("last", Some(9)),
            ("skipped", None),
            ("first", Some(1)),
            ("middle", Some(4)),
        ]);
        assert_eq!(registry.tour_route(), vec![2, 3, 0]);
    }

    #[test]
    fn collider_contains_its_footprint() {
        let collider = PoiCollider2d::from_centre_size(Vec2::new(3.0, 0.0), Vec2::new(2.0, 4.0));
        assert!(collider.contains(Vec2::new(3.5, 1.5)));
        assert!(collider.contains(Vec2::new(2.0, -2.0)));
        assert!(!collider.contains(Vec2::new(4.5, 0.0)));
        assert_eq!(collider.centre(), Vec2::new(3.0, 0.0));
    }
}
