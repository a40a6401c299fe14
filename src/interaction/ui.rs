use std::time::Duration;

use bevy::prelude::*;

use crate::celestial::CelestialClock;

/// Idle time after which the HUD hides itself
pub const UI_AUTO_HIDE_SECS: f32 = 5.0;

const HUD_COMMANDS: &str = "H home  R discover  N noon  M midnight  F hold to accelerate  F1-F4 inspectors  F5 colliders";

/// Whether the HUD strip is showing. Any interaction restarts the idle countdown.
#[derive(Resource, Debug)]
pub struct UiVisibility {
    visible: bool,
    idle:    Timer,
}

impl Default for UiVisibility {
    fn default() -> Self {
        Self {
            visible: true,
            idle:    Timer::from_seconds(UI_AUTO_HIDE_SECS, TimerMode::Once),
        }
    }
}

impl UiVisibility {
    pub const fn is_visible(&self) -> bool { self.visible }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        self.idle.reset();
    }

    pub fn touch(&mut self) { self.idle.reset(); }

    /// Hides the HUD once the idle countdown runs out; returns true on the frame it hides
    pub fn tick(&mut self, delta: Duration) -> bool {
        if !self.visible {
            return false;
        }
        if self.idle.tick(delta).just_finished() {
            self.visible = false;
            return true;
        }
        false
    }
}

#[derive(Component)]
pub struct Hud;

pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("HUD"),
        Hud,
        Text::new(HUD_COMMANDS),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.8)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
    ));
}

pub fn tick_ui_visibility(time: Res<Time>, mut ui: ResMut<UiVisibility>) {
    if ui.tick(time.delta()) {
        debug!("HUD hidden after {UI_AUTO_HIDE_SECS}s idle");
    }
}

pub fn update_hud(
    ui: Res<UiVisibility>,
    clock: Res<CelestialClock>,
    mut hud: Single<(&mut Text, &mut Visibility), With<Hud>>,
) {
    let (ref mut text, ref mut visibility) = *hud;
    let wanted = if ui.is_visible() {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    if **visibility != wanted {
        **visibility = wanted;
    }
    if clock.is_changed() || ui.is_changed() {
        text.0 = format!("{HUD_COMMANDS}    clock rate {:.3}", clock.rate());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hides_after_idle_period() {
        let mut ui = UiVisibility::default();
        assert!(ui.is_visible());
        assert!(!ui.tick(Duration::from_secs_f32(4.9)));
        assert!(ui.is_visible());
        assert!(ui.tick(Duration::from_secs_f32(0.2)));
        assert!(!ui.is_visible());
    }

    #[test]
    fn interaction_restarts_the_countdown() {
        let mut ui = UiVisibility::default();
        ui.tick(Duration::from_secs(4));
        ui.touch();
        ui.tick(Duration::from_secs(4));
        assert!(ui.is_visible());
    }

    #[test]
    fn toggle_shows_again_with_a_fresh_countdown() {
        let mut ui = UiVisibility::default();
        ui.toggle();
        assert!(!ui.is_visible());
        // hidden HUD does not count down
        assert!(!ui.tick(Duration::from_secs(10)));

        ui.toggle();
        assert!(ui.is_visible());
        assert!(!ui.tick(Duration::from_secs(4)));
        assert!(ui.is_visible());
    }
}
