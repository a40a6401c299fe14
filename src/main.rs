//! duar - a walkable field of portals under a live day/night sky, built with Bevy 0.18
//!
//! - Portals arranged on concentric rings that open, close and can be entered
//! - Sun and moon driven by a celestial clock that grades every light in the scene
//! - Orbit camera with choreographed flights to portals, home and random discoveries
//! - Bevy Remote Protocol (BRP) support for debugging

mod asset_loader;
mod camera;
mod celestial;
mod explorer_input;
mod interaction;
mod physics;
mod portal;
mod schedule;
mod state;
mod traits;
mod tween;

use bevy::gltf::GltfPlugin;
use bevy::gltf::convert_coordinates::GltfConvertCoordinates;
use bevy::prelude::*;
#[cfg(target_arch = "wasm32")]
use bevy::window::WindowMode;
use bevy_brp_extras::BrpExtrasPlugin;
use bevy_inspector_egui::bevy_egui::EguiPlugin;

use crate::asset_loader::AssetLoaderPlugin;
use crate::camera::CameraPlugin;
use crate::celestial::CelestialPlugin;
use crate::explorer_input::ExplorerInputPlugin;
use crate::interaction::InteractionPlugin;
use crate::physics::PhysicsPlugin;
use crate::portal::PortalPlugin;
use crate::schedule::SchedulePlugin;
use crate::state::StatePlugin;
use crate::tween::TweenPlugin;

fn main() {
    let mut app = App::new();

    // Get effective port from BrpExtrasPlugin to include in window title if non-default
    let brp_plugin = BrpExtrasPlugin::default();
    let (effective_port, _) = brp_plugin.get_effective_port();
    let window_title = if effective_port == bevy_brp_extras::DEFAULT_REMOTE_PORT {
        "duar".to_string()
    } else {
        format!("duar - {effective_port}")
    };

    #[cfg(not(target_arch = "wasm32"))]
    app.add_plugins(
        DefaultPlugins
            .set(GltfPlugin {
                convert_coordinates: GltfConvertCoordinates {
                    rotate_scene_entity: true,
                    rotate_meshes: true,
                },
                ..default()
            })
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: window_title,
                    ..default()
                }),
                ..default()
            }),
    );

    #[cfg(target_arch = "wasm32")]
    app.add_plugins(
        DefaultPlugins
            .set(GltfPlugin {
                convert_coordinates: GltfConvertCoordinates {
                    rotate_scene_entity: true,
                    rotate_meshes: true,
                },
                ..default()
            })
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: window_title,
                    mode: WindowMode::BorderlessFullscreen(MonitorSelection::Current),
                    ..default()
                }),
                ..default()
            }),
    );

    app.add_plugins((
        EguiPlugin::default(),
        brp_plugin,
        AssetLoaderPlugin,
        CameraPlugin,
        CelestialPlugin,
        ExplorerInputPlugin,
        InteractionPlugin,
        PhysicsPlugin,
        PortalPlugin,
        SchedulePlugin,
        StatePlugin,
        TweenPlugin,
    ))
    .run();
}
