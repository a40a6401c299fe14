use std::f32::consts::FRAC_PI_3;
use std::f32::consts::PI;

use bevy::color::Mix;
use bevy::prelude::*;
use bevy_inspector_egui::inspector_options::std_options::NumberDisplay;
use bevy_inspector_egui::prelude::*;

use super::clock::CelestialClock;

#[derive(Resource, Reflect, InspectorOptions, Debug, PartialEq, Clone, Copy)]
#[reflect(Resource, InspectorOptions)]
pub struct GradingConfig {
    /// Angular width of the band around each horizon crossing where colors blend
    #[inspector(min = 0.01, max = 1.5, display = NumberDisplay::Slider)]
    pub transition_zone:    f32,
    pub sun_disc_zenith:    Color,
    pub sun_disc_horizon:   Color,
    pub sun_light_zenith:   Color,
    pub sun_light_horizon:  Color,
    pub moon_zenith:        Color,
    pub moon_horizon:       Color,
    pub sky_day:            Color,
    pub sky_night:          Color,
    /// How strongly the moon pulls the sky toward `sky_night`
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub night_dampening:    f32,
    pub ambient_night:      Color,
    pub ambient_day:        Color,
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub ambient_base:       f32,
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub ambient_day_gain:   f32,
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub ambient_night_gain: f32,
    #[inspector(min = 0.0, max = 10.0, display = NumberDisplay::Slider)]
    pub sun_gain:           f32,
    #[inspector(min = 0.0, max = 10.0, display = NumberDisplay::Slider)]
    pub moon_gain:          f32,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            transition_zone:    FRAC_PI_3,
            sun_disc_zenith:    Color::WHITE,
            sun_disc_horizon:   Color::srgb_u8(0xff, 0x88, 0x33),
            sun_light_zenith:   Color::srgb_u8(0xff, 0xdd, 0xaa),
            sun_light_horizon:  Color::srgb_u8(0xff, 0x77, 0x22),
            moon_zenith:        Color::WHITE,
            moon_horizon:       Color::srgb_u8(0xd0, 0xe0, 0xff),
            sky_day:            Color::srgb_u8(0x2c, 0x3e, 0x50),
            sky_night:          Color::srgb_u8(0x05, 0x05, 0x10),
            night_dampening:    0.4,
            ambient_night:      Color::srgb_u8(0x44, 0x44, 0xff),
            ambient_day:        Color::WHITE,
            ambient_base:       0.15,
            ambient_day_gain:   0.3,
            ambient_night_gain: 0.15,
            sun_gain:           5.0,
            moon_gain:          3.5,
        }
    }
}

/// Everything the renderer needs for one frame of sky, all derived from the clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grading {
    pub sun_height:        f32,
    pub moon_height:       f32,
    pub sun_disc:          LinearRgba,
    pub sun_light:         LinearRgba,
    pub moon_disc:         LinearRgba,
    pub sky:               LinearRgba,
    pub ambient:           LinearRgba,
    pub ambient_intensity: f32,
    pub sun_intensity:     f32,
    pub moon_intensity:    f32,
}

/// 1 exactly on the horizon, falling linearly to 0 at the inner edge of the zone.
/// `half_angle` is the body's position within its own half orbit, in `[0, π]`.
fn horizon_weight(half_angle: f32, zone: f32) -> f32 {
    if zone <= 0.0 || !(0.0..=PI).contains(&half_angle) {
        return 0.0;
    }
    if half_angle < zone {
        1.0 - half_angle / zone
    } else if half_angle > PI - zone {
        (half_angle - (PI - zone)) / zone
    } else {
        0.0
    }
}

fn blend(zenith: Color, horizon: Color, weight: f32) -> LinearRgba {
    LinearRgba::from(zenith).mix(&LinearRgba::from(horizon), weight)
}

/// Pure mapping from clock state to lighting
pub fn grade(clock: &CelestialClock, config: &GradingConfig) -> Grading {
    let sun_height = clock.sun_height();
    let moon_height = clock.moon_height();
    let angle = clock.normalized_angle();

    let sun_weight = horizon_weight(angle, config.transition_zone);
    let moon_weight = horizon_weight(angle - PI, config.transition_zone);

    let sky = LinearRgba::BLACK
        .mix(&LinearRgba::from(config.sky_day), sun_height)
        .mix(&LinearRgba::from(config.sky_night), moon_height * config.night_dampening);

    let ambient_intensity = sun_height.mul_add(
        config.ambient_day_gain,
        moon_height.mul_add(config.ambient_night_gain, config.ambient_base),
    );

    Grading {
        sun_height,
        moon_height,
        sun_disc: blend(config.sun_disc_zenith, config.sun_disc_horizon, sun_weight),
        sun_light: blend(config.sun_light_zenith, config.sun_light_horizon, sun_weight),
        moon_disc: blend(config.moon_zenith, config.moon_horizon, moon_weight),
        sky,
        ambient: LinearRgba::from(config.ambient_night)
            .mix(&LinearRgba::from(config.ambient_day), sun_height),
        ambient_intensity,
        sun_intensity: sun_height * config.sun_gain,
        moon_intensity: moon_height * config.moon_gain,
    }
}
