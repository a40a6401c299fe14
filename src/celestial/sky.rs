use bevy::light::AmbientLight;
use bevy::prelude::*;
use bevy_inspector_egui::inspector_options::std_options::NumberDisplay;
use bevy_inspector_egui::prelude::*;

use super::clock::CelestialClock;
use super::grading::Grading;
use super::grading::GradingConfig;
use super::grading::grade;

#[derive(Resource, Reflect, InspectorOptions, Debug, PartialEq, Clone, Copy)]
#[reflect(Resource, InspectorOptions)]
pub struct SkyConfig {
    #[inspector(min = 50.0, max = 2000.0, display = NumberDisplay::Slider)]
    pub orbit_radius:           f32,
    /// Distance behind the scene the orbit plane sits at
    #[inspector(min = -1000.0, max = 0.0, display = NumberDisplay::Slider)]
    pub orbit_depth:            f32,
    #[inspector(min = 1.0, max = 100.0, display = NumberDisplay::Slider)]
    pub sun_radius:             f32,
    #[inspector(min = 1.0, max = 100.0, display = NumberDisplay::Slider)]
    pub moon_radius:            f32,
    /// Illuminance per unit of graded sun intensity
    #[inspector(min = 0.0, max = 10_000.0, display = NumberDisplay::Slider)]
    pub sun_lux:                f32,
    #[inspector(min = 0.0, max = 2_000.0, display = NumberDisplay::Slider)]
    pub moon_lux:               f32,
    /// Camera ambient brightness per unit of graded ambient intensity
    #[inspector(min = 0.0, max = 5_000.0, display = NumberDisplay::Slider)]
    pub ambient_brightness:     f32,
    #[inspector(min = 0.0, max = 40.0, display = NumberDisplay::Slider)]
    pub disc_emissive_strength: f32,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            orbit_radius:           600.0,
            orbit_depth:            -240.0,
            sun_radius:             30.0,
            moon_radius:            20.0,
            sun_lux:                2_000.0,
            moon_lux:               150.0,
            ambient_brightness:     1_000.0,
            disc_emissive_strength: 4.0,
        }
    }
}

#[derive(Component, Reflect, Debug)]
#[reflect(Component)]
pub struct Sun;

#[derive(Component, Reflect, Debug)]
#[reflect(Component)]
pub struct Moon;

/// Most recent grading, kept so other systems can read the sky without regrading
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CurrentGrading(pub Grading);

pub fn spawn_celestial_bodies(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    clock: Res<CelestialClock>,
    grading_config: Res<GradingConfig>,
    config: Res<SkyConfig>,
) {
    let grading = grade(&clock, &grading_config);

    commands.spawn((
        Name::new("Sun"),
        Sun,
        Mesh3d(meshes.add(Sphere::new(config.sun_radius))),
        MeshMaterial3d(materials.add(disc_material(grading.sun_disc, config.disc_emissive_strength))),
        DirectionalLight {
            illuminance: grading.sun_intensity * config.sun_lux,
            color: Color::from(grading.sun_light),
            shadows_enabled: true,
            ..default()
        },
        body_transform(clock.sun_position(config.orbit_radius, config.orbit_depth)),
    ));

    commands.spawn((
        Name::new("Moon"),
        Moon,
        Mesh3d(meshes.add(Sphere::new(config.moon_radius))),
        MeshMaterial3d(materials.add(disc_material(grading.moon_disc, config.disc_emissive_strength))),
        DirectionalLight {
            illuminance: grading.moon_intensity * config.moon_lux,
            color: Color::from(grading.moon_disc),
            shadows_enabled: false,
            ..default()
        },
        body_transform(clock.moon_position(config.orbit_radius, config.orbit_depth)),
    ));
}

fn disc_material(color: LinearRgba, emissive_strength: f32) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::from(color),
        emissive: color * emissive_strength,
        unlit: true,
        ..default()
    }
}

/// Directional lights shine along their forward axis, so each body looks at the origin
fn body_transform(position: Vec3) -> Transform { Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y) }

pub fn regrade(
    clock: Res<CelestialClock>,
    grading_config: Res<GradingConfig>,
    mut current: ResMut<CurrentGrading>,
) {
    let grading = grade(&clock, &grading_config);
    if current.0 != grading {
        current.0 = grading;
    }
}

pub fn move_celestial_bodies(
    clock: Res<CelestialClock>,
    config: Res<SkyConfig>,
    mut sun: Query<&mut Transform, (With<Sun>, Without<Moon>)>,
    mut moon: Query<&mut Transform, (With<Moon>, Without<Sun>)>,
) {
    if let Ok(mut transform) = sun.single_mut() {
        *transform = body_transform(clock.sun_position(config.orbit_radius, config.orbit_depth));
    }
    if let Ok(mut transform) = moon.single_mut() {
        *transform = body_transform(clock.moon_position(config.orbit_radius, config.orbit_depth));
    }
}

/// Pushes the current grading into lights, disc materials and the background
pub fn apply_grading(
    current: Res<CurrentGrading>,
    config: Res<SkyConfig>,
    mut clear_color: ResMut<ClearColor>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut sun: Query<(&mut DirectionalLight, &MeshMaterial3d<StandardMaterial>), (With<Sun>, Without<Moon>)>,
    mut moon: Query<(&mut DirectionalLight, &MeshMaterial3d<StandardMaterial>), (With<Moon>, Without<Sun>)>,
    mut cameras: Query<(&mut DistanceFog, &mut AmbientLight), With<Camera3d>>,
) {
    if !current.is_changed() && !config.is_changed() {
        return;
    }
    let grading = current.0;

    if let Ok((mut light, material)) = sun.single_mut() {
        light.illuminance = grading.sun_intensity * config.sun_lux;
        light.color = Color::from(grading.sun_light);
        if let Some(material) = materials.get_mut(&material.0) {
            *material = disc_material(grading.sun_disc, config.disc_emissive_strength);
        }
    }

    if let Ok((mut light, material)) = moon.single_mut() {
        light.illuminance = grading.moon_intensity * config.moon_lux;
        light.color = Color::from(grading.moon_disc);
        if let Some(material) = materials.get_mut(&material.0) {
            *material = disc_material(grading.moon_disc, config.disc_emissive_strength);
        }
    }

    let sky = Color::from(grading.sky);
    clear_color.0 = sky;

    for (mut fog, mut ambient) in &mut cameras {
        fog.color = sky;
        ambient.color = Color::from(grading.ambient);
        ambient.brightness = grading.ambient_intensity * config.ambient_brightness;
    }
}
