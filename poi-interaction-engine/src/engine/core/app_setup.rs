use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::assets::poi_manifest::PoiManifest;
use crate::engine::camera::viewport_camera::{ViewportCamera, camera_controller};
use crate::engine::core::app_state::{AppState, FpsText, LoadingProgress, transition_to_running};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::{ManifestLoader, spawn_scene_when_ready, start_loading};
use crate::engine::scene::markers::{
    PoiContentUpdate, animate_poi_focus, apply_content_updates, pulse_on_selection,
};
use crate::engine::systems::fps_tracking::{fps_notification_system, fps_text_update_system};
use crate::engine::systems::idle::{
    ActivityClock, Recommendation, SceneIdle, track_activity, update_idle, update_recommendation,
};
use crate::interaction::InteractionPlugin;
use crate::interaction::capabilities::{LogAnalytics, SharedTourPreference};
use crate::interaction::dispatcher::InteractionDispatcher;
use crate::rpc::dom_events::DomEventsPlugin;
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::tooltip::TooltipPlugin;
use crate::tooltip::display::TooltipSurfaceHandle;
use crate::tooltip::surface::TooltipSurface;

/// Create the application with the interaction core and browser adapters.
pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(JsonAssetPlugin::<PoiManifest>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(DomEventsPlugin)
        .add_plugins(InteractionPlugin)
        .add_plugins(TooltipPlugin);

    app.init_state::<AppState>()
        .init_resource::<LoadingProgress>()
        .init_resource::<ManifestLoader>()
        .init_resource::<ActivityClock>()
        .init_resource::<SceneIdle>()
        .init_resource::<Recommendation>()
        .init_resource::<SharedTourPreference>()
        .add_event::<PoiContentUpdate>()
        .add_systems(Startup, (setup, start_loading))
        .add_systems(
            Update,
            (spawn_scene_when_ready, transition_to_running)
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            Update,
            (
                camera_controller,
                animate_poi_focus,
                pulse_on_selection,
                apply_content_updates,
                track_activity,
                update_idle,
                update_recommendation,
                fps_text_update_system,
                fps_notification_system,
            )
                .run_if(in_state(AppState::Running)),
        );

    install_tooltip_surface(&mut app);

    app.world_mut()
        .resource_mut::<InteractionDispatcher>()
        .set_analytics(LogAnalytics);

    app
}

/// Pick the rasterizer for the platform. A browser without a 2D canvas
/// context is an unsupported environment; fail fast rather than degrade.
fn install_tooltip_surface(app: &mut App) {
    #[cfg(target_arch = "wasm32")]
    let surface: Box<dyn TooltipSurface> = Box::new(
        crate::tooltip::canvas_surface::CanvasSurface::new()
            .expect("tooltip canvas: 2d context unavailable"),
    );

    #[cfg(not(target_arch = "wasm32"))]
    let surface: Box<dyn TooltipSurface> =
        Box::new(crate::tooltip::surface::PanelSurface::default());

    app.insert_non_send_resource(TooltipSurfaceHandle(surface));
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

fn setup(mut commands: Commands) {
    println!("=== POI INTERACTION ENGINE ===");

    spawn_lighting(&mut commands);
    spawn_camera(&mut commands);
    spawn_ui(&mut commands);
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 2_400.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn spawn_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-4.0, 9.0, 16.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.insert_resource(ViewportCamera::default());
}

fn spawn_ui(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.6, 0.9, 0.6)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}
