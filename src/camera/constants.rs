use std::f32::consts::FRAC_PI_2;

use bevy::math::Vec3;

/// Start pose, also where "return home" flies back to
pub const HOME_EYE: Vec3 = Vec3::new(0.0, 1.6, 25.0);
pub const HOME_FOCUS: Vec3 = Vec3::new(0.0, 1.6, 0.0);

/// Eye height used whenever the camera is placed programmatically
pub const EYE_HEIGHT: f32 = 1.6;

/// Height of the point the camera looks at when framing a portal
pub const PORTAL_FOCUS_HEIGHT: f32 = 1.75;
pub const PORTAL_STANDOFF: f32 = 6.0;

/// Distance from the origin the camera stops at when discovering a portal
pub const DISCOVERY_DISTANCE: f32 = 25.0;

pub const FOCUS_FLIGHT_SECS: f32 = 2.5;
pub const HOME_FLIGHT_SECS: f32 = 2.0;
pub const DISCOVERY_FLIGHT_SECS: f32 = 1.5;

pub const CAMERA_FOV_DEGREES: f32 = 50.0;
pub const CAMERA_FAR: f32 = 2500.0;

/// The orbit never passes below the focus' horizon
pub const MIN_ELEVATION: f32 = 0.05;
/// Stops just short of straight down so `looking_at` keeps a valid up vector
pub const MAX_ELEVATION: f32 = FRAC_PI_2 - 0.01;
