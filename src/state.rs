use bevy::dev_tools::states::*;
use bevy::prelude::*;

/// How long the scene waits for panel models before revealing itself anyway
pub const REVEAL_TIMEOUT_SECS: f32 = 2.5;

pub struct StatePlugin;

impl Plugin for StatePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<SceneState>()
            .insert_resource(RevealTimeout(Timer::from_seconds(
                REVEAL_TIMEOUT_SECS,
                TimerMode::Once,
            )))
            .add_systems(
                Update,
                tick_reveal_timeout.run_if(in_state(SceneState::Loading)),
            )
            .add_systems(Update, log_transitions::<SceneState>);
    }
}

/// `Loading` lasts until every panel model has resolved or the reveal timeout fires.
/// Interaction and lighting run in both states; only the landmark waits for `Revealed`.
#[derive(States, Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Reflect)]
pub enum SceneState {
    #[default]
    Loading,
    Revealed,
}

#[derive(Resource, Debug)]
pub struct RevealTimeout(pub Timer);

impl RevealTimeout {
    pub fn expired(&self) -> bool { self.0.is_finished() }
}

fn tick_reveal_timeout(
    time: Res<Time>,
    mut timeout: ResMut<RevealTimeout>,
    mut next_state: ResMut<NextState<SceneState>>,
) {
    if timeout.0.tick(time.delta()).just_finished() {
        warn!("panel models still pending after {REVEAL_TIMEOUT_SECS}s, revealing the scene anyway");
        next_state.set(SceneState::Revealed);
    }
}
