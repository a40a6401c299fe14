use std::f32::consts::FRAC_PI_2;
use std::f32::consts::PI;
use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy_inspector_egui::inspector_options::std_options::NumberDisplay;
use bevy_inspector_egui::prelude::*;
use chrono::Timelike;

/// Radians added per tick for a rate of 1.0
pub const RATE_SCALE: f32 = 0.1;

/// Ticks are counted against a 60 Hz reference frame so the sky moves at the same speed
/// regardless of the actual frame rate
pub const REFERENCE_TICKS_PER_SECOND: f32 = 60.0;

const NOON: f32 = FRAC_PI_2;
const MIDNIGHT: f32 = 3.0 * FRAC_PI_2;

#[derive(Resource, Reflect, InspectorOptions, Debug, PartialEq, Clone, Copy)]
#[reflect(Resource, InspectorOptions)]
pub struct ClockConfig {
    #[inspector(min = 0.0, max = 0.5, display = NumberDisplay::Slider)]
    pub initial_rate:      f32,
    /// Multiplier applied to the rate per reference tick the accelerate action is held
    #[inspector(min = 1.0, max = 1.5, display = NumberDisplay::Slider)]
    pub accelerate_growth: f32,
    #[inspector(min = 0.0, max = 2.0, display = NumberDisplay::Slider)]
    pub accelerate_cap:    f32,
    /// Rate magnitude that accelerating starts from when the clock is stopped
    #[inspector(min = 0.0001, max = 0.1, display = NumberDisplay::Slider)]
    pub accelerate_floor:  f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            initial_rate:      0.02,
            accelerate_growth: 1.05,
            accelerate_cap:    0.5,
            accelerate_floor:  0.01,
        }
    }
}

/// The simulated time of day.
///
/// `angle` is the sun's position on its orbit: 0 is sunrise, π/2 noon, π sunset and 3π/2
/// midnight. It is never wrapped; use [`CelestialClock::normalized_angle`] when a value in
/// `[0, 2π)` is needed.
#[derive(Resource, Reflect, InspectorOptions, Debug, PartialEq, Clone, Copy)]
#[reflect(Resource, InspectorOptions)]
pub struct CelestialClock {
    angle: f32,
    #[inspector(min = 0.0, max = 0.5, display = NumberDisplay::Slider)]
    rate:  f32,
}

impl CelestialClock {
    pub const fn new(angle: f32, rate: f32) -> Self { Self { angle, rate } }

    /// 06:00 maps to sunrise and 12:00 to noon
    pub fn from_hours(hours: f32, rate: f32) -> Self { Self::new((hours - 6.0) / 24.0 * TAU, rate) }

    pub fn from_wall_clock(rate: f32) -> Self {
        let now = chrono::Local::now();
        #[allow(clippy::cast_precision_loss, reason = "hours and minutes are tiny integers")]
        let hours = now.hour() as f32 + now.minute() as f32 / 60.0;
        Self::from_hours(hours, rate)
    }

    pub const fn angle(&self) -> f32 { self.angle }

    pub const fn rate(&self) -> f32 { self.rate }

    /// Moves the angle forward by `rate * RATE_SCALE` per reference tick elapsed in `delta_secs`
    pub fn advance(&mut self, delta_secs: f32) {
        let ticks = delta_secs * REFERENCE_TICKS_PER_SECOND;
        self.angle += self.rate * RATE_SCALE * ticks;
    }

    /// "Hold to speed up" for `delta_secs`, compounding `growth` once per reference tick. The
    /// day only ever runs forward, so the result is always positive and never above `cap`.
    pub fn accelerate(&mut self, delta_secs: f32, growth: f32, cap: f32, floor: f32) {
        let ticks = delta_secs * REFERENCE_TICKS_PER_SECOND;
        let magnitude = self.rate.abs().max(floor);
        self.rate = (magnitude * growth.powf(ticks)).min(cap.abs());
    }

    pub const fn set_angle(&mut self, angle: f32) { self.angle = angle; }

    pub const fn set_rate(&mut self, rate: f32) { self.rate = rate; }

    pub const fn set_noon(&mut self) {
        self.set_angle(NOON);
        self.set_rate(0.0);
    }

    pub const fn set_midnight(&mut self) {
        self.set_angle(MIDNIGHT);
        self.set_rate(0.0);
    }

    pub fn sun_height(&self) -> f32 { self.angle.sin().max(0.0) }

    pub fn moon_height(&self) -> f32 { (-self.angle.sin()).max(0.0) }

    pub fn normalized_angle(&self) -> f32 { self.angle.rem_euclid(TAU) }

    /// True while the sun is on the upper half of its orbit
    pub fn is_day(&self) -> bool { self.normalized_angle() <= PI }

    /// Sun and moon sit on opposite sides of the same circular orbit
    pub fn sun_position(&self, orbit_radius: f32, depth: f32) -> Vec3 {
        Vec3::new(
            self.angle.cos() * orbit_radius,
            self.angle.sin() * orbit_radius,
            depth,
        )
    }

    pub fn moon_position(&self, orbit_radius: f32, depth: f32) -> Vec3 {
        let sun = self.sun_position(orbit_radius, depth);
        Vec3::new(-sun.x, -sun.y, depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep() -> impl Iterator<Item = f32> { (-720..=720).map(|step| step as f32 * 0.0173) }

    #[test]
    fn heights_follow_the_sine_and_never_overlap() {
        for angle in sweep() {
            let clock = CelestialClock::new(angle, 0.0);
            assert!((clock.sun_height() - angle.sin().max(0.0)).abs() < f32::EPSILON);
            assert!((clock.moon_height() - (-angle.sin()).max(0.0)).abs() < f32::EPSILON);
            assert!(clock.sun_height().min(clock.moon_height()) == 0.0);
            assert!((0.0..=1.0).contains(&clock.sun_height()));
            assert!((0.0..=1.0).contains(&clock.moon_height()));
        }
    }

    #[test]
    fn normalized_angle_stays_in_range() {
        for angle in sweep() {
            let normalized = CelestialClock::new(angle * 7.0, 0.0).normalized_angle();
            assert!((0.0..TAU).contains(&normalized), "{angle} -> {normalized}");
        }
    }

    #[test]
    fn noon_and_midnight() {
        let mut clock = CelestialClock::new(1.234, 0.3);
        clock.set_angle(FRAC_PI_2);
        clock.set_rate(0.0);
        assert!((clock.sun_height() - 1.0).abs() < 1e-6);
        assert!(clock.moon_height() == 0.0);

        clock.set_angle(3.0 * FRAC_PI_2);
        clock.set_rate(0.0);
        assert!((clock.moon_height() - 1.0).abs() < 1e-6);
        assert!(clock.sun_height() == 0.0);

        clock.set_noon();
        assert!(clock.rate() == 0.0);
        assert!((clock.sun_height() - 1.0).abs() < 1e-6);

        clock.set_midnight();
        assert!((clock.moon_height() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn advance_scales_rate_per_reference_tick() {
        let mut clock = CelestialClock::new(0.0, 0.02);
        clock.advance(1.0 / REFERENCE_TICKS_PER_SECOND);
        assert!((clock.angle() - 0.002).abs() < 1e-7);

        let mut stopped = CelestialClock::new(1.0, 0.0);
        stopped.advance(10.0);
        assert!((stopped.angle() - 1.0).abs() < f32::EPSILON);
    }

    const TICK: f32 = 1.0 / REFERENCE_TICKS_PER_SECOND;

    #[test]
    fn accelerate_grows_forward_and_respects_cap() {
        let mut clock = CelestialClock::new(0.0, 0.02);
        clock.accelerate(TICK, 1.5, 0.5, 0.01);
        assert!((clock.rate() - 0.03).abs() < 1e-6);

        for _ in 0..200 {
            clock.accelerate(TICK, 1.5, 0.5, 0.01);
            assert!(clock.rate() > 0.0);
            assert!(clock.rate() <= 0.5);
        }
        assert!((clock.rate() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn accelerate_starts_from_floor_when_stopped() {
        let mut clock = CelestialClock::new(0.0, 0.0);
        clock.accelerate(TICK, 2.0, 0.5, 0.01);
        assert!((clock.rate() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn accelerate_grows_by_elapsed_time_not_frame_count() {
        let mut fast_frames = CelestialClock::new(0.0, 0.02);
        let mut slow_frames = CelestialClock::new(0.0, 0.02);
        for _ in 0..120 {
            fast_frames.accelerate(1.0 / 120.0, 1.05, 10.0, 0.01);
        }
        for _ in 0..30 {
            slow_frames.accelerate(1.0 / 30.0, 1.05, 10.0, 0.01);
        }

        let one_second = 0.02 * 1.05_f32.powf(REFERENCE_TICKS_PER_SECOND);
        assert!((fast_frames.rate() - one_second).abs() < 1e-3);
        assert!((slow_frames.rate() - one_second).abs() < 1e-3);
    }

    #[test]
    fn accelerate_holds_at_the_cap_for_long_frames() {
        let mut clock = CelestialClock::new(0.0, 0.02);
        clock.accelerate(5.0, 1.05, 0.5, 0.01);
        assert!((clock.rate() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn hours_seed_the_angle() {
        assert!(CelestialClock::from_hours(6.0, 0.0).angle().abs() < 1e-6);
        assert!((CelestialClock::from_hours(12.0, 0.0).angle() - FRAC_PI_2).abs() < 1e-6);
        assert!((CelestialClock::from_hours(0.0, 0.0).normalized_angle() - 3.0 * FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn moon_mirrors_the_sun() {
        let clock = CelestialClock::new(0.7, 0.0);
        let sun = clock.sun_position(600.0, -240.0);
        let moon = clock.moon_position(600.0, -240.0);
        assert!((sun.x + moon.x).abs() < 1e-3);
        assert!((sun.y + moon.y).abs() < 1e-3);
        assert!((sun.z - moon.z).abs() < f32::EPSILON);
    }
}
