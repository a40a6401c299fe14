use bevy::prelude::*;

/// Per-frame ordering: input is handled before the clock moves, the sky is regraded before
/// animations step, and the camera is placed last so it sees this frame's animated values
#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub enum FrameSet {
    UserInput,
    ClockAdvance,
    ColorGrading,
    EntityAnimation,
    CameraUpdate,
}

pub struct SchedulePlugin;

impl Plugin for SchedulePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                FrameSet::UserInput,
                FrameSet::ClockAdvance,
                FrameSet::ColorGrading,
                FrameSet::EntityAnimation,
                FrameSet::CameraUpdate,
            )
                .chain(),
        );
    }
}
