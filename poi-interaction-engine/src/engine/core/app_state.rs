use bevy::prelude::*;

/// Application lifecycle: manifest loading, then the interactive scene.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

#[derive(Resource, Default)]
pub struct LoadingProgress {
    pub manifest_loaded: bool,
    pub markers_spawned: bool,
}

#[derive(Component)]
pub struct FpsText;

// Final transition once the scene is populated
pub fn transition_to_running(
    progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if progress.markers_spawned {
        println!("→ Scene ready, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}
