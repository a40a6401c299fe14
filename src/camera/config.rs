use bevy::prelude::*;
use bevy_inspector_egui::inspector_options::std_options::NumberDisplay;
use bevy_inspector_egui::prelude::*;
use bevy_inspector_egui::quick::ResourceInspectorPlugin;

use crate::explorer_input::InspectorPanel;
use crate::explorer_input::inspector_open;

pub struct CameraConfigPlugin;

impl Plugin for CameraConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(
            ResourceInspectorPlugin::<CameraConfig>::default()
                .run_if(inspector_open(InspectorPanel::Camera)),
        )
        .init_resource::<CameraConfig>();
    }
}

#[derive(Resource, Reflect, InspectorOptions, Debug, PartialEq, Clone, Copy)]
#[reflect(Resource, InspectorOptions)]
pub struct CameraConfig {
    /// Radians of orbit per pixel of pointer movement
    #[inspector(min = 0.001, max = 0.05, display = NumberDisplay::Slider)]
    pub orbit_sensitivity:         f32,
    /// Fraction of the distance covered per scroll line
    #[inspector(min = 0.01, max = 0.5, display = NumberDisplay::Slider)]
    pub zoom_sensitivity:          f32,
    #[inspector(min = 0.1, max = 10.0, display = NumberDisplay::Slider)]
    pub min_distance:              f32,
    #[inspector(min = 10.0, max = 500.0, display = NumberDisplay::Slider)]
    pub max_distance:              f32,
    #[inspector(min = 0.0, max = 5.0, display = NumberDisplay::Slider)]
    pub min_eye_height:            f32,
    #[inspector(min = 0.0, max = 0.02, display = NumberDisplay::Slider)]
    pub fog_density:               f32,
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub bloom_intensity:           f32,
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub bloom_low_frequency_boost: f32,
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub bloom_high_pass_frequency: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            orbit_sensitivity:         0.005,
            zoom_sensitivity:          0.1,
            min_distance:              0.5,
            max_distance:              100.0,
            min_eye_height:            0.5,
            fog_density:               0.002,
            bloom_intensity:           0.15,
            bloom_low_frequency_boost: 0.5,
            bloom_high_pass_frequency: 0.5,
        }
    }
}
