use bevy::input::touch::TouchInput;
use bevy::prelude::*;
use bevy::window::CursorMoved;

use constants::interaction::{IDLE_AFTER_SECS, RECOMMENDATION_ROTATE_SECS};

use crate::engine::scene::markers::PoiRegistry;
use crate::interaction::state::PoiIndex;

/// Timestamp of the most recent pointer/touch/keyboard activity.
#[derive(Resource, Default)]
pub struct ActivityClock {
    pub last_activity: f64,
}

/// Idle flag consumed by the tooltip presenter: ambient recommendation is
/// only permitted while the scene is otherwise quiet.
#[derive(Resource, Default)]
pub struct SceneIdle(pub bool);

/// Current recommended tour stop, rotated on a fixed cadence while idle.
#[derive(Resource, Default)]
pub struct Recommendation {
    pub target: Option<PoiIndex>,
    cursor: usize,
    last_advance: f64,
}

pub fn is_idle(now: f64, last_activity: f64, quiet_secs: f64) -> bool {
    now - last_activity >= quiet_secs
}

/// Next position in the tour route: hold the first stop on entry, then step.
pub fn advance_cursor(cursor: usize, route_len: usize, already_running: bool) -> usize {
    if route_len == 0 {
        return 0;
    }
    if already_running {
        (cursor + 1) % route_len
    } else {
        cursor % route_len
    }
}

pub fn track_activity(
    mut cursor_moved: EventReader<CursorMoved>,
    mut touches: EventReader<TouchInput>,
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut clock: ResMut<ActivityClock>,
) {
    let active = cursor_moved.read().next().is_some()
        || touches.read().next().is_some()
        || buttons.get_just_pressed().next().is_some()
        || keys.get_just_pressed().next().is_some();
    if active {
        clock.last_activity = time.elapsed_secs_f64();
    }
}

pub fn update_idle(clock: Res<ActivityClock>, time: Res<Time>, mut idle: ResMut<SceneIdle>) {
    idle.0 = is_idle(time.elapsed_secs_f64(), clock.last_activity, IDLE_AFTER_SECS);
}

/// Rotate the recommendation through the manifest's tour stops while idle;
/// any activity clears it immediately.
pub fn update_recommendation(
    idle: Res<SceneIdle>,
    registry: Res<PoiRegistry>,
    time: Res<Time>,
    mut recommendation: ResMut<Recommendation>,
) {
    if !idle.0 {
        recommendation.target = None;
        return;
    }

    let route = registry.tour_route();
    if route.is_empty() {
        recommendation.target = None;
        return;
    }

    let now = time.elapsed_secs_f64();
    let due = recommendation.target.is_none()
        || now - recommendation.last_advance >= RECOMMENDATION_ROTATE_SECS;
    if due {
        recommendation.cursor =
            advance_cursor(recommendation.cursor, route.len(), recommendation.target.is_some());
        recommendation.target = Some(route[recommendation.cursor]);
        recommendation.last_advance = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_threshold_is_inclusive() {
        assert!(!is_idle(5.9, 0.0, 6.0));
        assert!(is_idle(6.0, 0.0, 6.0));
        assert!(is_idle(100.0, 10.0, 6.0));
        assert!(!is_idle(12.0, 10.0, 6.0));
    }

    #[test]
    fn cursor_holds_first_stop_then_wraps() {
        // Entering idle keeps whatever slot the cursor points at.
        assert_eq!(advance_cursor(0, 3, false), 0);
        // Subsequent rotations step and wrap.
        assert_eq!(advance_cursor(0, 3, true), 1);
        assert_eq!(advance_cursor(2, 3, true), 0);
        // An emptied route never panics.
        assert_eq!(advance_cursor(7, 0, true), 0);
    }
}
