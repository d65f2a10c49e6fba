use bevy::prelude::*;

use crate::engine::assets::poi_manifest::PoiManifest;
use crate::engine::camera::viewport_camera::ViewportCamera;
use crate::engine::core::app_state::LoadingProgress;
use crate::engine::scene::ground::spawn_ground;
use crate::engine::scene::markers::spawn_poi_markers;

#[derive(Resource, Default)]
pub struct ManifestLoader {
    handle: Option<Handle<PoiManifest>>,
}

// Start the loading process
pub fn start_loading(mut manifest_loader: ResMut<ManifestLoader>, asset_server: Res<AssetServer>) {
    manifest_loader.handle = Some(asset_server.load("poi_manifest.json"));
}

/// Populate the scene once the manifest asset is available: floor, markers,
/// registry, and a camera framed on the exhibit centre.
pub fn spawn_scene_when_ready(
    mut progress: ResMut<LoadingProgress>,
    manifest_loader: Res<ManifestLoader>,
    manifests: Res<Assets<PoiManifest>>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if progress.markers_spawned {
        return;
    }
    let Some(handle) = &manifest_loader.handle else {
        return;
    };
    let Some(manifest) = manifests.get(handle) else {
        return;
    };

    println!("✓ POI manifest loaded: {} exhibits", manifest.pois.len());
    progress.manifest_loaded = true;

    spawn_ground(
        &mut commands,
        &mut meshes,
        &mut materials,
        manifest.scene.ground_radius,
    );
    let registry = spawn_poi_markers(&mut commands, &mut meshes, &mut materials, manifest);
    commands.insert_resource(registry);
    commands.insert_resource(ViewportCamera::with_scene(
        manifest.scene_centre(),
        manifest.scene.ground_radius,
    ));

    progress.markers_spawned = true;
}
