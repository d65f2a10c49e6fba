use bevy::prelude::*;

use constants::interaction::{TOOLTIP_ANCHOR_LIFT, TOOLTIP_PANEL_HEIGHT, TOOLTIP_PANEL_WIDTH};

use crate::engine::assets::poi_manifest::PoiMetadata;
use crate::engine::scene::markers::{PoiAnchor, PoiRegistry};
use crate::engine::systems::idle::{Recommendation, SceneIdle};
use crate::interaction::capabilities::{SharedTourPreference, TourPreference};
use crate::interaction::manager::InteractionManager;
use crate::interaction::state::InputMethod;
use crate::tooltip::content::TooltipContent;
use crate::tooltip::presenter::{TooltipInputs, TooltipMode, TooltipPresenter};
use crate::tooltip::surface::TooltipSurface;

/// World-space panel entity the presenter drives.
#[derive(Component)]
pub struct TooltipRoot;

/// Rasterization collaborator. Non-send because the browser canvas context
/// is not thread-safe; on the web build everything runs on the main thread
/// anyway.
pub struct TooltipSurfaceHandle(pub Box<dyn TooltipSurface>);

/// Presenter state plus the scene-graph handles it owns.
#[derive(Resource, Default)]
pub struct TooltipDisplay {
    pub presenter: TooltipPresenter,
    root: Option<Entity>,
    material: Option<Handle<StandardMaterial>>,
}

impl TooltipDisplay {
    /// Remove the panel from the scene graph and release its handles.
    /// Repeated disposal is a no-op.
    pub fn dispose(&mut self, commands: &mut Commands) {
        if let Some(root) = self.root.take() {
            commands.entity(root).despawn();
        }
        self.material = None;
        self.presenter = TooltipPresenter::default();
    }

    pub fn is_live(&self) -> bool {
        self.root.is_some()
    }
}

/// Spawn the hidden panel once the scene is running.
pub fn setup_tooltip(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut display: ResMut<TooltipDisplay>,
) {
    if display.root.is_some() {
        return;
    }

    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE.with_alpha(0.0),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        cull_mode: None,
        ..default()
    });
    let root = commands
        .spawn((
            Mesh3d(meshes.add(Rectangle::new(TOOLTIP_PANEL_WIDTH, TOOLTIP_PANEL_HEIGHT))),
            MeshMaterial3d(material.clone()),
            Transform::default(),
            Visibility::Hidden,
            TooltipRoot,
        ))
        .id();

    display.root = Some(root);
    display.material = Some(material);
}

/// Per-frame presenter drive: resolve mode from the interaction state, fade,
/// re-rasterize when the cache says so, and push opacity/visibility onto the
/// panel material.
pub fn update_tooltip(
    mut display: ResMut<TooltipDisplay>,
    mut surface: NonSendMut<TooltipSurfaceHandle>,
    manager: Res<InteractionManager>,
    recommendation: Res<Recommendation>,
    idle: Res<SceneIdle>,
    preference: Res<SharedTourPreference>,
    registry: Res<PoiRegistry>,
    metadata: Query<&PoiMetadata>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    mut roots: Query<&mut Visibility, With<TooltipRoot>>,
    time: Res<Time>,
) {
    if display.root.is_none() {
        return;
    }

    let inputs = TooltipInputs {
        hovered: manager.state().hovered,
        selected: manager.state().selected,
        recommended: recommendation.target,
        idle: idle.0,
        tour_enabled: preference.is_enabled(),
    };
    let revision_of = |index| {
        registry
            .entity(index)
            .and_then(|entity| metadata.get(entity).ok())
            .map(|meta| meta.revision)
    };
    let frame = display
        .presenter
        .update(&inputs, &revision_of, time.delta_secs());

    if let Some(index) = frame.render {
        let meta = registry
            .entity(index)
            .and_then(|entity| metadata.get(entity).ok());
        if let Some(meta) = meta {
            let content = TooltipContent::from_metadata(
                meta,
                frame.mode.unwrap_or(TooltipMode::Hovered),
                manager.state().last_method.unwrap_or(InputMethod::Pointer),
            );
            match surface.0.draw(&content, &mut images) {
                Ok(texture) => {
                    if let Some(material) = display
                        .material
                        .as_ref()
                        .and_then(|handle| materials.get_mut(handle))
                    {
                        material.base_color_texture = Some(texture);
                    }
                }
                Err(e) => warn!("Tooltip rasterization failed: {e}"),
            }
        }
    }

    if let Some(material) = display
        .material
        .as_ref()
        .and_then(|handle| materials.get_mut(handle))
    {
        material.base_color = material.base_color.with_alpha(frame.opacity);
    }
    if let Some(root) = display.root {
        if let Ok(mut visibility) = roots.get_mut(root) {
            *visibility = if frame.visible {
                Visibility::Visible
            } else {
                Visibility::Hidden
            };
        }
    }
}

/// Anchor tracking and billboarding, every frame regardless of fade state:
/// POI positions may move, so the anchor is re-queried rather than cached.
pub fn anchor_tooltip(
    display: Res<TooltipDisplay>,
    registry: Res<PoiRegistry>,
    anchors: Query<(&GlobalTransform, &PoiAnchor)>,
    cameras: Query<&GlobalTransform, (With<Camera3d>, Without<TooltipRoot>)>,
    mut roots: Query<&mut Transform, With<TooltipRoot>>,
) {
    let Some(target) = display.presenter.target() else { return };
    let Some(entity) = registry.entity(target) else { return };
    let Ok((anchor_xf, anchor)) = anchors.get(entity) else { return };
    let Ok(camera_xf) = cameras.single() else { return };
    let Some(root) = display.root else { return };
    let Ok(mut transform) = roots.get_mut(root) else { return };

    transform.translation =
        anchor_xf.translation() + Vec3::Y * (anchor.height + TOOLTIP_ANCHOR_LIFT);

    // Full billboard: the panel's +Z face turns toward the camera.
    let camera_pos = camera_xf.translation();
    transform.look_at(camera_pos, Vec3::Y);
    transform.rotate_local_y(std::f32::consts::PI);
}

/// Dispose the panel when the app shuts down.
pub fn dispose_on_exit(
    mut exit_events: EventReader<AppExit>,
    mut display: ResMut<TooltipDisplay>,
    mut commands: Commands,
) {
    if exit_events.is_empty() {
        return;
    }
    exit_events.clear();
    display.dispose(&mut commands);
}
