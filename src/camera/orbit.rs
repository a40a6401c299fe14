//! Orbit camera: an eye circling a focus point.
//!
//! The rig owns two animation slots, one for the eye and one for the focus. While either has
//! a flight in flight, pointer orbit and wheel zoom are ignored so the flight is not fought.

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::input::mouse::AccumulatedMouseScroll;
use bevy::input::mouse::MouseScrollUnit;
use bevy::light::AmbientLight;
use bevy::math::curve::easing::EaseFunction;
use bevy::post_process::bloom::Bloom;
use bevy::prelude::*;

use super::config::CameraConfig;
use super::constants::CAMERA_FAR;
use super::constants::CAMERA_FOV_DEGREES;
use super::constants::HOME_EYE;
use super::constants::HOME_FOCUS;
use super::constants::MAX_ELEVATION;
use super::constants::MIN_ELEVATION;
use crate::tween::AnimationSlot;
use crate::tween::Tween;
use crate::tween::TweenCompleted;
use crate::tween::TweenHandle;
use crate::tween::TweenTarget;

/// Bounds every orbit, zoom and flight result is pulled back into
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitLimits {
    pub min_distance:   f32,
    pub max_distance:   f32,
    pub min_eye_height: f32,
    pub min_elevation:  f32,
    pub max_elevation:  f32,
}

impl From<&CameraConfig> for OrbitLimits {
    fn from(config: &CameraConfig) -> Self {
        Self {
            min_distance:   config.min_distance,
            max_distance:   config.max_distance,
            min_eye_height: config.min_eye_height,
            min_elevation:  MIN_ELEVATION,
            max_elevation:  MAX_ELEVATION,
        }
    }
}

/// Spherical coordinates of `eye` around `focus`: (radius, yaw, elevation)
fn spherical(eye: Vec3, focus: Vec3) -> (f32, f32, f32) {
    let offset = eye - focus;
    let radius = offset.length();
    let yaw = offset.x.atan2(offset.z);
    let horizontal = offset.x.hypot(offset.z);
    let elevation = offset.y.atan2(horizontal);
    (radius, yaw, elevation)
}

fn from_spherical(focus: Vec3, radius: f32, yaw: f32, elevation: f32) -> Vec3 {
    focus
        + radius
            * Vec3::new(
                elevation.cos() * yaw.sin(),
                elevation.sin(),
                elevation.cos() * yaw.cos(),
            )
}

/// Swings the eye around the focus, keeping its distance
pub fn orbit(eye: Vec3, focus: Vec3, delta_yaw: f32, delta_elevation: f32, limits: &OrbitLimits) -> Vec3 {
    let (radius, yaw, elevation) = spherical(eye, focus);
    let elevation = (elevation + delta_elevation).clamp(limits.min_elevation, limits.max_elevation);
    clamp_eye(from_spherical(focus, radius, yaw + delta_yaw, elevation), focus, limits)
}

/// Scales the eye's distance to the focus by `factor`
pub fn zoom(eye: Vec3, focus: Vec3, factor: f32, limits: &OrbitLimits) -> Vec3 {
    let (radius, yaw, elevation) = spherical(eye, focus);
    let radius = (radius * factor).clamp(limits.min_distance, limits.max_distance);
    clamp_eye(from_spherical(focus, radius, yaw, elevation), focus, limits)
}

/// Keeps the eye inside the distance limits and above the floor
pub fn clamp_eye(eye: Vec3, focus: Vec3, limits: &OrbitLimits) -> Vec3 {
    let offset = eye - focus;
    let distance = offset.length();
    let mut eye = if distance > limits.max_distance {
        focus + offset * (limits.max_distance / distance)
    } else if distance < limits.min_distance && distance > f32::EPSILON {
        focus + offset * (limits.min_distance / distance)
    } else {
        eye
    };
    eye.y = eye.y.max(limits.min_eye_height);
    eye
}

#[derive(Component, Debug)]
pub struct OrbitRig {
    pub eye:      Vec3,
    pub focus:    Vec3,
    eye_flight:   AnimationSlot<Vec3>,
    focus_flight: AnimationSlot<Vec3>,
}

impl OrbitRig {
    pub fn new(eye: Vec3, focus: Vec3) -> Self {
        Self {
            eye,
            focus,
            eye_flight: AnimationSlot::default(),
            focus_flight: AnimationSlot::default(),
        }
    }

    pub const fn is_flying(&self) -> bool { self.eye_flight.is_active() || self.focus_flight.is_active() }

    /// Starts flying eye and focus to a new pose, superseding any flight already underway
    pub fn fly_to(&mut self, eye: Vec3, focus: Vec3, secs: f32, ease: EaseFunction) -> (TweenHandle, TweenHandle) {
        let eye_handle = self
            .eye_flight
            .start(Tween::new(self.eye, eye, secs).with_ease(ease));
        let focus_handle = self
            .focus_flight
            .start(Tween::new(self.focus, focus, secs).with_ease(ease));
        (eye_handle, focus_handle)
    }

    /// Pointer orbit; ignored mid-flight
    pub fn orbit(&mut self, delta_yaw: f32, delta_elevation: f32, limits: &OrbitLimits) {
        if !self.is_flying() {
            self.eye = orbit(self.eye, self.focus, delta_yaw, delta_elevation, limits);
        }
    }

    /// Wheel zoom; ignored mid-flight
    pub fn zoom(&mut self, factor: f32, limits: &OrbitLimits) {
        if !self.is_flying() {
            self.eye = zoom(self.eye, self.focus, factor, limits);
        }
    }

    pub fn step(&mut self, delta_secs: f32) -> Vec<TweenCompleted> {
        let mut completed = Vec::new();
        if let Some(step) = self.eye_flight.step(delta_secs) {
            self.eye = step.value;
            if let Some(handle) = step.completed {
                completed.push(TweenCompleted {
                    target: TweenTarget::CameraEye,
                    handle,
                });
            }
        }
        if let Some(step) = self.focus_flight.step(delta_secs) {
            self.focus = step.value;
            if let Some(handle) = step.completed {
                completed.push(TweenCompleted {
                    target: TweenTarget::CameraFocus,
                    handle,
                });
            }
        }
        completed
    }
}

pub fn spawn_camera(mut commands: Commands, config: Res<CameraConfig>) {
    let rig = OrbitRig::new(HOME_EYE, HOME_FOCUS);
    let transform = Transform::from_translation(rig.eye).looking_at(rig.focus, Vec3::Y);

    commands.spawn((
        Name::new("Explorer Camera"),
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            far: CAMERA_FAR,
            ..default()
        }),
        Tonemapping::TonyMcMapface,
        bloom_settings(&config),
        DistanceFog {
            falloff: FogFalloff::ExponentialSquared {
                density: config.fog_density,
            },
            ..default()
        },
        AmbientLight::default(),
        rig,
        transform,
    ));
}

fn bloom_settings(config: &CameraConfig) -> Bloom {
    let mut bloom = Bloom::NATURAL;
    bloom.intensity = config.bloom_intensity;
    bloom.low_frequency_boost = config.bloom_low_frequency_boost;
    bloom.high_pass_frequency = config.bloom_high_pass_frequency;
    bloom
}

pub fn update_camera_settings(
    config: Res<CameraConfig>,
    mut cameras: Query<(&mut Bloom, &mut DistanceFog), With<OrbitRig>>,
) {
    if !config.is_changed() {
        return;
    }
    for (mut bloom, mut fog) in &mut cameras {
        *bloom = bloom_settings(&config);
        fog.falloff = FogFalloff::ExponentialSquared {
            density: config.fog_density,
        };
    }
}

pub fn zoom_camera(
    scroll: Res<AccumulatedMouseScroll>,
    config: Res<CameraConfig>,
    mut rig: Single<&mut OrbitRig>,
) {
    let lines = match scroll.unit {
        MouseScrollUnit::Line => scroll.delta.y,
        MouseScrollUnit::Pixel => scroll.delta.y / 100.0,
    };
    if lines == 0.0 {
        return;
    }
    let factor = lines.mul_add(-config.zoom_sensitivity, 1.0).max(0.1);
    rig.zoom(factor, &OrbitLimits::from(&*config));
}

pub fn step_camera_flights(
    time: Res<Time>,
    mut rig: Single<&mut OrbitRig>,
    mut completions: MessageWriter<TweenCompleted>,
) {
    completions.write_batch(rig.step(time.delta_secs()));
}

pub fn log_camera_arrivals(mut completions: MessageReader<TweenCompleted>) {
    for completed in completions.read() {
        if completed.target == TweenTarget::CameraEye {
            debug!("camera flight {:?} arrived", completed.handle);
        }
    }
}

/// Last step of the frame: place the camera from the rig
pub fn apply_orbit_rig(config: Res<CameraConfig>, mut camera: Single<(&mut OrbitRig, &mut Transform)>) {
    let (ref mut rig, ref mut transform) = *camera;
    if !rig.is_flying() {
        rig.eye = clamp_eye(rig.eye, rig.focus, &OrbitLimits::from(&*config));
    }
    if rig.eye.distance_squared(rig.focus) > f32::EPSILON {
        **transform = Transform::from_translation(rig.eye).looking_at(rig.focus, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> OrbitLimits { OrbitLimits::from(&CameraConfig::default()) }

    #[test]
    fn orbit_keeps_distance() {
        let focus = Vec3::new(0.0, 1.6, 0.0);
        let eye = Vec3::new(0.0, 5.0, 20.0);
        let moved = orbit(eye, focus, 0.7, 0.1, &limits());
        assert!((moved.distance(focus) - eye.distance(focus)).abs() < 1e-3);
        assert!((moved.x).abs() > 1.0);
    }

    #[test]
    fn orbit_never_drops_below_the_horizon() {
        let focus = Vec3::new(0.0, 1.6, 0.0);
        let moved = orbit(Vec3::new(0.0, 3.0, 10.0), focus, 0.0, -5.0, &limits());
        assert!(moved.y > focus.y);
        assert!(moved.y >= limits().min_eye_height);
    }

    #[test]
    fn zoom_is_clamped() {
        let focus = Vec3::new(0.0, 1.6, 0.0);
        let eye = focus + Vec3::new(0.0, 10.0, 10.0);
        let far = zoom(eye, focus, 1_000.0, &limits());
        assert!((far.distance(focus) - 100.0).abs() < 1e-3);

        let near = zoom(eye, focus, 0.0001, &limits());
        assert!((near.distance(focus) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn eye_stays_above_the_floor() {
        let clamped = clamp_eye(Vec3::new(3.0, -2.0, 4.0), Vec3::ZERO, &limits());
        assert!((clamped.y - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn flight_reaches_pose_and_blocks_orbit() {
        let mut rig = OrbitRig::new(HOME_EYE, HOME_FOCUS);
        let (eye_handle, _) = rig.fly_to(
            Vec3::new(10.0, 1.6, 10.0),
            Vec3::ZERO,
            1.0,
            EaseFunction::QuadraticInOut,
        );
        assert!(rig.is_flying());

        let before = rig.eye;
        rig.orbit(1.0, 0.0, &limits());
        assert_eq!(rig.eye, before);

        let mut arrived = Vec::new();
        for _ in 0..120 {
            arrived.extend(rig.step(1.0 / 60.0));
        }
        assert!(!rig.is_flying());
        assert!((rig.eye - Vec3::new(10.0, 1.6, 10.0)).length() < 1e-4);
        assert!(rig.focus.length() < 1e-4);
        assert!(arrived.iter().any(|done| done.handle == eye_handle && done.target == TweenTarget::CameraEye));
    }
}
