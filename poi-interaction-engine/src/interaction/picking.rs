use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::engine::scene::markers::{PoiHitVolume, PoiRegistry};
use crate::interaction::state::PoiIndex;

/// Ray/OBB intersection in the volume's local space.
pub fn ray_hits_volume(origin: Vec3, dir: Vec3, xf: &GlobalTransform, size: Vec3) -> Option<f32> {
    let inv = xf.compute_matrix().inverse();
    let o_local = inv.transform_point3(origin);
    let d_local = inv.transform_vector3(dir);
    let he = size * 0.5;
    ray_aabb_hit_t(o_local, d_local, -he, he)
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = Vec3::new(
        if ray_direction.x != 0.0 { 1.0 / ray_direction.x } else { f32::INFINITY },
        if ray_direction.y != 0.0 { 1.0 / ray_direction.y } else { f32::INFINITY },
        if ray_direction.z != 0.0 { 1.0 / ray_direction.z } else { f32::INFINITY },
    );

    let (mut tmin, mut tmax) = ((min.x - ray_origin.x) * inv.x, (max.x - ray_origin.x) * inv.x);
    if tmin > tmax { std::mem::swap(&mut tmin, &mut tmax); }

    let (mut tymin, mut tymax) = ((min.y - ray_origin.y) * inv.y, (max.y - ray_origin.y) * inv.y);
    if tymin > tymax { std::mem::swap(&mut tymin, &mut tymax); }

    if (tmin > tymax) || (tymin > tmax) { return None; }
    if tymin > tmin { tmin = tymin; }
    if tymax < tmax { tmax = tymax; }

    let (mut tzmin, mut tzmax) = ((min.z - ray_origin.z) * inv.z, (max.z - ray_origin.z) * inv.z);
    if tzmin > tzmax { std::mem::swap(&mut tzmin, &mut tzmax); }

    if (tmin > tzmax) || (tzmin > tmax) { return None; }
    if tzmin > tmin { tmin = tzmin; }
    if tzmax < tmax { tmax = tzmax; }

    if tmax < 0.0 { return None; }
    Some(if tmin >= 0.0 { tmin } else { tmax })
}

/// Cast against every registered hit volume and return the nearest hit.
/// Registry order breaks ties, so equal distances resolve to the first
/// registered POI.
pub fn nearest_hit<'a>(
    origin: Vec3,
    dir: Vec3,
    volumes: impl Iterator<Item = (PoiIndex, &'a GlobalTransform, Vec3)>,
) -> Option<PoiIndex> {
    let mut best: Option<(PoiIndex, f32)> = None;
    for (index, xf, size) in volumes {
        if let Some(t) = ray_hits_volume(origin, dir, xf, size) {
            if t > 0.0 && best.is_none_or(|(_, best_t)| t < best_t) {
                best = Some((index, t));
            }
        }
    }
    best.map(|(index, _)| index)
}

/// Resolve a cursor position (window coordinates) to the POI under it.
///
/// Returns `None` both for a miss and for a frame where the surface has no
/// layout yet (zero-area window) or the viewport conversion fails; picking
/// silently skips such frames rather than erroring.
pub fn pick_poi(
    cursor_pos: Vec2,
    window: &Window,
    camera: &Camera,
    camera_xf: &GlobalTransform,
    registry: &PoiRegistry,
    volumes: &Query<(&GlobalTransform, &PoiHitVolume)>,
) -> Option<PoiIndex> {
    if window.width() <= 0.0 || window.height() <= 0.0 {
        return None;
    }
    let ray = camera.viewport_to_world(camera_xf, cursor_pos).ok()?;

    nearest_hit(
        ray.origin,
        ray.direction.as_vec3(),
        registry.iter().filter_map(|(index, entity)| {
            let (xf, volume) = volumes.get(entity).ok()?;
            Some((index, xf, volume.size))
        }),
    )
}

/// Convenience wrapper for the input systems: resolve the primary window
/// and active camera, then cast from `position`.
pub fn pick_at(
    position: Vec2,
    windows: &Query<&Window, With<PrimaryWindow>>,
    cameras: &Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    registry: &PoiRegistry,
    volumes: &Query<(&GlobalTransform, &PoiHitVolume)>,
) -> Option<PoiIndex> {
    let window = windows.single().ok()?;
    let (camera_xf, camera) = cameras.single().ok()?;
    pick_poi(position, window, camera, camera_xf, registry, volumes)
}
