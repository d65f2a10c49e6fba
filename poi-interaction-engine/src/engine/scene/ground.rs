use bevy::prelude::*;

#[derive(Component)]
pub struct GroundDisc;

/// Flat exhibit floor under the markers. Unlit and translucent so the
/// markers' glow reads against a dark scene.
pub fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    radius: f32,
) {
    let ground_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.16, 0.18, 0.22, 0.55),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    commands.spawn((
        Mesh3d(meshes.add(Circle::new(radius))),
        MeshMaterial3d(ground_material),
        Transform::from_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)),
        GroundDisc,
    ));
}
