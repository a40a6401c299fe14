//! Day/night simulation: a single angle drives sun and moon placement, light colors, sky and
//! ambient fill.

mod clock;
mod grading;
mod sky;

use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;
use bevy_inspector_egui::quick::ResourceInspectorPlugin;
pub use clock::CelestialClock;
pub use clock::ClockConfig;
pub use grading::GradingConfig;
use grading::grade;
pub use sky::CurrentGrading;
pub use sky::SkyConfig;

use crate::explorer_input::Accelerate;
use crate::explorer_input::HighNoon;
use crate::explorer_input::InspectorPanel;
use crate::explorer_input::Midnight;
use crate::explorer_input::inspector_open;
use crate::schedule::FrameSet;

pub struct CelestialPlugin;

impl Plugin for CelestialPlugin {
    fn build(&self, app: &mut App) {
        let clock_config = ClockConfig::default();
        let clock = CelestialClock::from_wall_clock(clock_config.initial_rate);
        let grading_config = GradingConfig::default();
        info!(
            "celestial clock seeded at angle {:.3} (day: {})",
            clock.normalized_angle(),
            clock.is_day()
        );

        app.insert_resource(clock_config)
            .insert_resource(clock)
            .insert_resource(CurrentGrading(grade(&clock, &grading_config)))
            .insert_resource(grading_config)
            .init_resource::<SkyConfig>()
            .add_plugins(
                ResourceInspectorPlugin::<CelestialClock>::default()
                    .run_if(inspector_open(InspectorPanel::Clock)),
            )
            .add_plugins(
                ResourceInspectorPlugin::<ClockConfig>::default()
                    .run_if(inspector_open(InspectorPanel::Clock)),
            )
            .add_plugins(
                ResourceInspectorPlugin::<GradingConfig>::default()
                    .run_if(inspector_open(InspectorPanel::Grading)),
            )
            .add_plugins(
                ResourceInspectorPlugin::<SkyConfig>::default()
                    .run_if(inspector_open(InspectorPanel::Grading)),
            )
            .add_systems(Startup, sky::spawn_celestial_bodies)
            .add_systems(Update, advance_clock.in_set(FrameSet::ClockAdvance))
            .add_systems(
                Update,
                (sky::regrade, sky::move_celestial_bodies, sky::apply_grading)
                    .chain()
                    .in_set(FrameSet::ColorGrading),
            )
            .add_observer(set_high_noon)
            .add_observer(set_midnight)
            .add_observer(accelerate_clock);
    }
}

fn advance_clock(time: Res<Time>, mut clock: ResMut<CelestialClock>) {
    if clock.rate() != 0.0 {
        clock.advance(time.delta_secs());
    }
}

fn set_high_noon(_start: On<Start<HighNoon>>, mut clock: ResMut<CelestialClock>) {
    clock.set_noon();
    info!("high noon");
}

fn set_midnight(_start: On<Start<Midnight>>, mut clock: ResMut<CelestialClock>) {
    clock.set_midnight();
    info!("midnight");
}

fn accelerate_clock(
    _fire: On<Fire<Accelerate>>,
    time: Res<Time>,
    config: Res<ClockConfig>,
    mut clock: ResMut<CelestialClock>,
) {
    clock.accelerate(
        time.delta_secs(),
        config.accelerate_growth,
        config.accelerate_cap,
        config.accelerate_floor,
    );
}
