use bevy::math::curve::easing::EaseFunction;
use bevy::prelude::*;

use super::constants::DISCOVERY_DISTANCE;
use super::constants::DISCOVERY_FLIGHT_SECS;
use super::constants::EYE_HEIGHT;
use super::constants::FOCUS_FLIGHT_SECS;
use super::constants::HOME_EYE;
use super::constants::HOME_FOCUS;
use super::constants::HOME_FLIGHT_SECS;
use super::constants::PORTAL_FOCUS_HEIGHT;
use super::constants::PORTAL_STANDOFF;
use super::orbit::OrbitRig;
use crate::tween::TweenHandle;

/// Where the camera should end up and how it gets there
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFlight {
    pub eye:   Vec3,
    pub focus: Vec3,
    pub secs:  f32,
    pub ease:  EaseFunction,
}

impl CameraFlight {
    /// Frames a portal from a fixed standoff, keeping the direction the camera was already
    /// looking from
    pub fn focus_portal(current_eye: Vec3, portal_position: Vec3) -> Self {
        let focus = Vec3::new(portal_position.x, PORTAL_FOCUS_HEIGHT, portal_position.z);
        let approach = Vec3::new(focus.x - current_eye.x, 0.0, focus.z - current_eye.z)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z);
        let mut eye = focus - approach * PORTAL_STANDOFF;
        eye.y = EYE_HEIGHT;

        Self {
            eye,
            focus,
            secs: FOCUS_FLIGHT_SECS,
            ease: EaseFunction::CubicInOut,
        }
    }

    pub const fn home() -> Self {
        Self {
            eye:   HOME_EYE,
            focus: HOME_FOCUS,
            secs:  HOME_FLIGHT_SECS,
            ease:  EaseFunction::QuadraticInOut,
        }
    }

    /// Looks back toward the center from beyond the portal, on the portal's bearing
    pub fn discovery(portal_position: Vec3) -> Self {
        let bearing = portal_position.x.atan2(portal_position.z);
        Self {
            eye:   Vec3::new(
                bearing.sin() * DISCOVERY_DISTANCE,
                EYE_HEIGHT,
                bearing.cos() * DISCOVERY_DISTANCE,
            ),
            focus: HOME_FOCUS,
            secs:  DISCOVERY_FLIGHT_SECS,
            ease:  EaseFunction::QuadraticInOut,
        }
    }

    /// Hands the flight to the rig's animation slots; returns the eye tween's handle
    pub fn launch(self, rig: &mut OrbitRig) -> TweenHandle {
        let (eye_handle, _) = rig.fly_to(self.eye, self.focus, self.secs, self.ease);
        eye_handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_keeps_the_approach_direction() {
        let eye = Vec3::new(0.0, 1.6, 25.0);
        let portal = Vec3::new(0.0, 0.0, 15.0);
        let flight = CameraFlight::focus_portal(eye, portal);

        assert_eq!(flight.focus, Vec3::new(0.0, PORTAL_FOCUS_HEIGHT, 15.0));
        assert!((flight.eye - Vec3::new(0.0, EYE_HEIGHT, 21.0)).length() < 1e-4);

        let horizontal = Vec2::new(flight.eye.x - flight.focus.x, flight.eye.z - flight.focus.z);
        assert!((horizontal.length() - PORTAL_STANDOFF).abs() < 1e-4);
    }

    #[test]
    fn focus_from_directly_above_still_has_a_direction() {
        let portal = Vec3::new(4.0, 0.0, 4.0);
        let flight = CameraFlight::focus_portal(Vec3::new(4.0, 30.0, 4.0), portal);
        assert!(flight.eye.is_finite());
        assert!((flight.eye.y - EYE_HEIGHT).abs() < f32::EPSILON);
    }

    #[test]
    fn discovery_lies_on_the_portal_bearing() {
        let portal = Vec3::new(10.0, 0.0, -10.0);
        let flight = CameraFlight::discovery(portal);

        let eye_bearing = flight.eye.x.atan2(flight.eye.z);
        assert!((eye_bearing - portal.x.atan2(portal.z)).abs() < 1e-5);
        assert!((Vec2::new(flight.eye.x, flight.eye.z).length() - DISCOVERY_DISTANCE).abs() < 1e-3);
        assert_eq!(flight.focus, HOME_FOCUS);
        assert!((flight.secs - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn home_is_the_start_pose() {
        let flight = CameraFlight::home();
        assert_eq!(flight.eye, Vec3::new(0.0, 1.6, 25.0));
        assert_eq!(flight.focus, Vec3::new(0.0, 1.6, 0.0));
    }

    #[test]
    fn launch_supersedes_the_previous_flight() {
        let mut rig = OrbitRig::new(HOME_EYE, HOME_FOCUS);
        let first = CameraFlight::discovery(Vec3::new(15.0, 0.0, 0.0)).launch(&mut rig);
        rig.step(0.5);
        let second = CameraFlight::home().launch(&mut rig);
        assert_ne!(first, second);

        for _ in 0..200 {
            rig.step(1.0 / 60.0);
        }
        assert!((rig.eye - HOME_EYE).length() < 1e-4);
    }
}
