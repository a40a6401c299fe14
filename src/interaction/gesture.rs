use bevy::prelude::*;

use crate::portal::PortalId;

/// A press that ends closer than this to where it started is a click
pub const CLICK_THRESHOLD_PX: f32 = 10.0;

pub fn is_click(down: Vec2, up: Vec2) -> bool { down.distance(up) < CLICK_THRESHOLD_PX }

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Move,
    Rotate,
}

/// Secondary button or the modifier key rotates; anything else moves
pub const fn drag_mode(secondary: bool, modifier: bool) -> DragMode {
    if secondary || modifier {
        DragMode::Rotate
    } else {
        DragMode::Move
    }
}

/// Exists only between a press on a portal and the matching release
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragSession {
    pub portal: PortalId,
    pub mode:   DragMode,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Gesture {
    #[default]
    Idle,
    Pressed {
        origin:   Vec2,
        /// Latched once the pointer has strayed past the click threshold
        dragging: bool,
        session:  Option<DragSession>,
    },
}

/// How a pointer movement should be interpreted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragUpdate {
    /// Still within click range
    Undecided,
    Portal(DragSession),
    /// Press started off any portal
    Orbit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureEnd {
    pub origin:  Vec2,
    pub click:   bool,
    pub session: Option<DragSession>,
}

/// Click versus drag disambiguation for the one active pointer
#[derive(Resource, Default, Debug)]
pub struct GestureTracker {
    gesture: Gesture,
}

impl GestureTracker {
    pub const fn press(&mut self, origin: Vec2, session: Option<DragSession>) {
        self.gesture = Gesture::Pressed {
            origin,
            dragging: false,
            session,
        };
    }

    /// `None` while no press is active
    pub fn moved(&mut self, position: Vec2) -> Option<DragUpdate> {
        let Gesture::Pressed {
            origin,
            dragging,
            session,
        } = &mut self.gesture
        else {
            return None;
        };

        if !*dragging && !is_click(*origin, position) {
            *dragging = true;
        }
        if !*dragging {
            return Some(DragUpdate::Undecided);
        }
        Some(session.map_or(DragUpdate::Orbit, DragUpdate::Portal))
    }

    /// A click depends only on where the press started and ended, however far the pointer
    /// wandered in between
    pub fn release(&mut self, position: Vec2) -> Option<GestureEnd> {
        let Gesture::Pressed { origin, session, .. } = std::mem::take(&mut self.gesture) else {
            return None;
        };
        Some(GestureEnd {
            origin,
            click: is_click(origin, position),
            session,
        })
    }

    pub fn cancel(&mut self) { self.gesture = Gesture::Idle; }

    #[cfg(test)]
    pub const fn is_pressed(&self) -> bool { matches!(self.gesture, Gesture::Pressed { .. }) }
}
