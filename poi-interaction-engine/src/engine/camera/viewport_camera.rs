use bevy::input::mouse::MouseScrollUnit;
use bevy::math::EulerRot;
use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
};

/// Orbit camera around the exhibit floor: right-drag to look, scroll to
/// dolly, smoothed toward the target pose each frame.
#[derive(Resource)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl ViewportCamera {
    pub fn with_scene(centre: Vec3, radius: f32) -> Self {
        Self {
            focus_point: centre,
            distance: (radius * 1.6).max(6.0),
            pitch: -0.55,
            yaw: 0.0,
        }
    }
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self {
            focus_point: Vec3::ZERO,
            distance: 18.0,
            pitch: -0.55,
            yaw: 0.0,
        }
    }
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut vp_camera: ResMut<ViewportCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    // Mouse motion with right click (look around)
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        vp_camera.yaw += -mouse_delta.x * yaw_sens;
        vp_camera.pitch = (vp_camera.pitch - mouse_delta.y * pitch_sens).clamp(-1.45, -0.08);
    }

    // Mouse wheel scroll accumulation (pixel and line scroll)
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y * 1.0,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }
    if scroll_accum.abs() > f32::EPSILON {
        let dolly = 1.0 - scroll_accum * 0.08;
        vp_camera.distance = (vp_camera.distance * dolly).clamp(4.0, 80.0);
    }

    // Smooth toward the target pose
    let target_rot = Quat::from_euler(EulerRot::YXZ, vp_camera.yaw, vp_camera.pitch, 0.0);
    let forward = (target_rot * Vec3::NEG_Z).normalize();
    let target_pos = vp_camera.focus_point - forward * vp_camera.distance;

    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target_pos, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target_rot, lerp_speed);
}
