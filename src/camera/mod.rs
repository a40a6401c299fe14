mod choreographer;
mod config;
mod constants;
mod orbit;

use bevy::prelude::*;
pub use choreographer::CameraFlight;
pub use config::CameraConfig;
use config::CameraConfigPlugin;
pub use orbit::OrbitLimits;
pub use orbit::OrbitRig;

use crate::schedule::FrameSet;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(CameraConfigPlugin)
            .add_systems(Startup, orbit::spawn_camera)
            .add_systems(Update, orbit::zoom_camera.in_set(FrameSet::UserInput))
            .add_systems(
                Update,
                (orbit::log_camera_arrivals, orbit::step_camera_flights)
                    .chain()
                    .in_set(FrameSet::EntityAnimation),
            )
            .add_systems(
                Update,
                (orbit::update_camera_settings, orbit::apply_orbit_rig).in_set(FrameSet::CameraUpdate),
            );
    }
}
