//! Mouse and touch input reduced to a single pointer stream.
//!
//! Only one pointer is tracked at a time: whichever device presses first owns the gesture
//! until it is released or cancelled.

use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The device gave up the gesture (touch cancelled, button released outside the window)
    Cancel,
}

/// Window-space pointer sample; `delta` is relative to the previous sample of the same gesture
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub phase:     PointerPhase,
    pub position:  Vec2,
    pub delta:     Vec2,
    pub secondary: bool,
    pub modifier:  bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PointerSource {
    Mouse,
    Touch(u64),
}

#[derive(Default, Debug)]
pub struct PointerTrail {
    source:    Option<PointerSource>,
    last:      Vec2,
    secondary: bool,
}

impl PointerTrail {
    #[cfg(test)]
    const fn is_active(&self) -> bool { self.source.is_some() }

    fn down(&mut self, source: PointerSource, position: Vec2, secondary: bool, modifier: bool) -> PointerEvent {
        self.source = Some(source);
        self.last = position;
        self.secondary = secondary;
        PointerEvent {
            phase: PointerPhase::Down,
            position,
            delta: Vec2::ZERO,
            secondary,
            modifier,
        }
    }

    /// `None` when the pointer has not moved since the last sample
    fn motion(&mut self, position: Vec2, modifier: bool) -> Option<PointerEvent> {
        let delta = position - self.last;
        if delta == Vec2::ZERO {
            return None;
        }
        self.last = position;
        Some(PointerEvent {
            phase: PointerPhase::Move,
            position,
            delta,
            secondary: self.secondary,
            modifier,
        })
    }

    fn end(&mut self, phase: PointerPhase, position: Vec2, modifier: bool) -> PointerEvent {
        let delta = position - self.last;
        self.source = None;
        PointerEvent {
            phase,
            position,
            delta,
            secondary: self.secondary,
            modifier,
        }
    }
}

const POINTER_BUTTONS: [MouseButton; 2] = [MouseButton::Left, MouseButton::Right];

pub fn translate_pointer_input(
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    touches: Res<Touches>,
    window: Single<&Window, With<PrimaryWindow>>,
    mut trail: Local<PointerTrail>,
    mut events: MessageWriter<PointerEvent>,
) {
    let modifier = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);

    let source = trail.source;
    match source {
        None => {
            if let Some(position) = window.cursor_position()
                && mouse.any_just_pressed(POINTER_BUTTONS)
            {
                let secondary = mouse.just_pressed(MouseButton::Right);
                events.write(trail.down(PointerSource::Mouse, position, secondary, modifier));
            } else if let Some(touch) = touches.iter_just_pressed().next() {
                events.write(trail.down(
                    PointerSource::Touch(touch.id()),
                    touch.position(),
                    false,
                    modifier,
                ));
            }
        },
        Some(PointerSource::Mouse) => {
            let released = mouse.any_just_released(POINTER_BUTTONS) || !mouse.any_pressed(POINTER_BUTTONS);
            match (window.cursor_position(), released) {
                (Some(position), true) => {
                    events.write(trail.end(PointerPhase::Up, position, modifier));
                },
                (None, true) => {
                    let last = trail.last;
                    events.write(trail.end(PointerPhase::Cancel, last, modifier));
                },
                (Some(position), false) => {
                    if let Some(event) = trail.motion(position, modifier) {
                        events.write(event);
                    }
                },
                (None, false) => {},
            }
        },
        Some(PointerSource::Touch(id)) => {
            if let Some(touch) = touches.get_released(id) {
                events.write(trail.end(PointerPhase::Up, touch.position(), modifier));
            } else if touches.just_canceled(id) || touches.get_pressed(id).is_none() {
                let last = trail.last;
                events.write(trail.end(PointerPhase::Cancel, last, modifier));
            } else if let Some(touch) = touches.get_pressed(id)
                && let Some(event) = trail.motion(touch.position(), modifier)
            {
                events.write(event);
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_reports_deltas_between_samples() {
        let mut trail = PointerTrail::default();
        let down = trail.down(PointerSource::Mouse, Vec2::new(10.0, 10.0), true, false);
        assert_eq!(down.phase, PointerPhase::Down);
        assert_eq!(down.delta, Vec2::ZERO);
        assert!(trail.is_active());

        let first = trail.motion(Vec2::new(14.0, 7.0), false).unwrap();
        assert_eq!(first.delta, Vec2::new(4.0, -3.0));
        assert!(first.secondary);

        let second = trail.motion(Vec2::new(20.0, 7.0), true).unwrap();
        assert_eq!(second.delta, Vec2::new(6.0, 0.0));
        assert!(second.modifier);
    }

    #[test]
    fn stationary_pointer_emits_nothing() {
        let mut trail = PointerTrail::default();
        trail.down(PointerSource::Touch(3), Vec2::ONE, false, false);
        assert!(trail.motion(Vec2::ONE, false).is_none());
    }

    #[test]
    fn release_ends_the_gesture() {
        let mut trail = PointerTrail::default();
        trail.down(PointerSource::Mouse, Vec2::ZERO, false, false);
        let up = trail.end(PointerPhase::Up, Vec2::new(2.0, 0.0), false);
        assert_eq!(up.phase, PointerPhase::Up);
        assert_eq!(up.delta, Vec2::new(2.0, 0.0));
        assert!(!trail.is_active());
    }
}
