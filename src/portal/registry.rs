//! Authoritative state of every portal.
//!
//! The registry owns each portal's open/close state machine
//! (`Closed → Opening → Open → Closing → Closed`) together with the animation slots that
//! drive its hinge and glow. A portal is `Opening` or `Closing` only while its hinge slot has
//! a tween in flight; the state settles when that tween's completion comes back through
//! [`PortalRegistry::settle`].

use std::f32::consts::FRAC_PI_2;

use bevy::ecs::entity::EntityHashMap;
use bevy::math::curve::easing::EaseFunction;
use bevy::prelude::*;
use bevy_inspector_egui::inspector_options::std_options::NumberDisplay;
use bevy_inspector_egui::prelude::*;

use super::layout::Placement;
use super::layout::PortalCatalog;
use crate::tween::AnimationSlot;
use crate::tween::Tween;
use crate::tween::TweenCompleted;
use crate::tween::TweenHandle;
use crate::tween::TweenTarget;

/// Hinge yaw of a fully open door
pub const HINGE_OPEN: f32 = -FRAC_PI_2;
pub const HINGE_CLOSED: f32 = 0.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct PortalId(usize);

impl PortalId {
    /// Ids are positions in the registry's placement order
    pub const fn from_index(index: usize) -> Self { Self(index) }

    pub const fn index(self) -> usize { self.0 }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect)]
pub enum PortalState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl PortalState {
    #[cfg(test)]
    pub const fn is_animating(self) -> bool { matches!(self, Self::Opening | Self::Closing) }

    /// The single legal successor in the open/close cycle
    pub const fn next(self) -> Self {
        match self {
            Self::Closed => Self::Opening,
            Self::Opening => Self::Open,
            Self::Open => Self::Closing,
            Self::Closing => Self::Closed,
        }
    }
}

/// What a toggle request did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Opening(TweenHandle),
    Closing(TweenHandle),
    /// The portal was mid-animation or does not exist
    Ignored,
}

#[derive(Resource, Reflect, InspectorOptions, Debug, PartialEq, Clone, Copy)]
#[reflect(Resource, InspectorOptions)]
pub struct PortalConfig {
    #[inspector(min = 0.1, max = 5.0, display = NumberDisplay::Slider)]
    pub open_secs:       f32,
    /// Lets the camera arrive before the door swings
    #[inspector(min = 0.0, max = 3.0, display = NumberDisplay::Slider)]
    pub open_delay_secs: f32,
    #[inspector(min = 0.1, max = 5.0, display = NumberDisplay::Slider)]
    pub close_secs:      f32,
    #[inspector(min = 0.1, max = 5.0, display = NumberDisplay::Slider)]
    pub close_all_secs:  f32,
    #[inspector(min = 0.0, max = 4.0, display = NumberDisplay::Slider)]
    pub glow_rest:       f32,
    #[inspector(min = 0.0, max = 20.0, display = NumberDisplay::Slider)]
    pub glow_peak:       f32,
    /// Length of one leg of the glow flare; the flare plays up then back down
    #[inspector(min = 0.1, max = 5.0, display = NumberDisplay::Slider)]
    pub glow_leg_secs:   f32,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            open_secs:       2.0,
            open_delay_secs: 0.5,
            close_secs:      2.0,
            close_all_secs:  1.5,
            glow_rest:       1.0,
            glow_peak:       8.0,
            glow_leg_secs:   2.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Portal {
    pub id:                PortalId,
    pub label:             String,
    pub archetype:         usize,
    pub ring:              usize,
    pub slot:              usize,
    pub destination:       String,
    pub static_position:   Vec3,
    pub static_rotation_y: f32,
    /// Where the portal currently stands; only drag sessions move it away from the static
    /// placement and it is never persisted
    pub live_position:     Vec3,
    pub live_rotation_y:   f32,
    state:                 PortalState,
    hinge_rotation_y:      f32,
    glow:                  f32,
    hinge_slot:            AnimationSlot<f32>,
    glow_slot:             AnimationSlot<f32>,
    root:                  Option<Entity>,
}

impl Portal {
    pub const fn state(&self) -> PortalState { self.state }

    pub const fn hinge_rotation_y(&self) -> f32 { self.hinge_rotation_y }

    pub const fn glow(&self) -> f32 { self.glow }

    pub const fn root(&self) -> Option<Entity> { self.root }

    /// Ground distance and yaw between where the portal stands and its placement
    pub fn displacement(&self) -> (f32, f32) {
        (
            self.live_position.distance(self.static_position),
            self.live_rotation_y - self.static_rotation_y,
        )
    }

    /// Handle of the hinge tween currently in flight, if any
    #[cfg(test)]
    pub const fn hinge_in_flight(&self) -> Option<TweenHandle> { self.hinge_slot.in_flight() }
}

#[derive(Resource, Default, Debug)]
pub struct PortalRegistry {
    portals: Vec<Portal>,
    handles: EntityHashMap<PortalId>,
}

impl PortalRegistry {
    /// Creates one closed portal per placement; ids follow placement order
    pub fn from_layout(catalog: &PortalCatalog, placements: &[Placement], config: &PortalConfig) -> Self {
        let portals = placements
            .iter()
            .enumerate()
            .map(|(index, placement)| {
                let archetype = catalog.get(placement.archetype);
                Portal {
                    id:                PortalId::from_index(index),
                    label:             archetype.map(|a| a.label.clone()).unwrap_or_default(),
                    archetype:         placement.archetype,
                    ring:              placement.ring,
                    slot:              placement.slot,
                    destination:       archetype.map(|a| a.destination.clone()).unwrap_or_default(),
                    static_position:   placement.position,
                    static_rotation_y: placement.rotation_y,
                    live_position:     placement.position,
                    live_rotation_y:   placement.rotation_y,
                    state:             PortalState::Closed,
                    hinge_rotation_y:  HINGE_CLOSED,
                    glow:              config.glow_rest,
                    hinge_slot:        AnimationSlot::default(),
                    glow_slot:         AnimationSlot::default(),
                    root:              None,
                }
            })
            .collect();

        Self {
            portals,
            handles: EntityHashMap::default(),
        }
    }

    pub fn get(&self, id: PortalId) -> Option<&Portal> { self.portals.get(id.0) }

    pub fn all(&self) -> impl Iterator<Item = &Portal> { self.portals.iter() }

    pub fn ids(&self) -> impl Iterator<Item = PortalId> + '_ { self.portals.iter().map(|portal| portal.id) }

    pub fn len(&self) -> usize { self.portals.len() }

    pub fn is_empty(&self) -> bool { self.portals.is_empty() }

    pub fn id_at(&self, index: usize) -> Option<PortalId> { self.portals.get(index).map(|portal| portal.id) }

    /// Records the root entity of a portal's scene hierarchy
    pub fn register_root(&mut self, id: PortalId, root: Entity) {
        if let Some(portal) = self.portals.get_mut(id.0) {
            portal.root = Some(root);
            self.handles.insert(root, id);
        }
    }

    /// Records any further entity (frame post, panel, entry plane) that stands for the portal
    pub fn register_part(&mut self, id: PortalId, part: Entity) {
        if self.portals.get(id.0).is_some() {
            self.handles.insert(part, id);
        }
    }

    /// Maps a scene entity back to the portal it belongs to; many entities map to one portal
    pub fn find_by_handle(&self, handle: Entity) -> Option<PortalId> { self.handles.get(&handle).copied() }

    /// Applies `next` only if it is the legal successor of the current state
    pub fn set_state(&mut self, id: PortalId, next: PortalState) -> bool {
        let Some(portal) = self.portals.get_mut(id.0) else {
            return false;
        };
        if portal.state.next() != next {
            return false;
        }
        debug!("portal {} {:?} -> {next:?}", portal.label, portal.state);
        portal.state = next;
        true
    }

    /// Starts opening a closed portal or closing an open one. Requests while the portal is
    /// mid-animation are ignored and leave both the state and the in-flight handle alone.
    pub fn toggle(&mut self, id: PortalId, config: &PortalConfig) -> ToggleOutcome {
        let Some(state) = self.get(id).map(Portal::state) else {
            return ToggleOutcome::Ignored;
        };

        match state {
            PortalState::Closed => {
                let handle = self.start_hinge(
                    id,
                    HINGE_OPEN,
                    config.open_secs,
                    config.open_delay_secs,
                );
                self.flare(id, config);
                self.set_state(id, PortalState::Opening);
                handle.map_or(ToggleOutcome::Ignored, ToggleOutcome::Opening)
            },
            PortalState::Open => {
                let handle = self.start_hinge(id, HINGE_CLOSED, config.close_secs, 0.0);
                self.flare(id, config);
                self.set_state(id, PortalState::Closing);
                handle.map_or(ToggleOutcome::Ignored, ToggleOutcome::Closing)
            },
            PortalState::Opening | PortalState::Closing => ToggleOutcome::Ignored,
        }
    }

    /// Starts closing every portal that is open or still opening, superseding any hinge
    /// tween already in flight
    pub fn close_all(&mut self, config: &PortalConfig) -> Vec<(PortalId, TweenHandle)> {
        let targets: Vec<PortalId> = self
            .portals
            .iter()
            .filter(|portal| matches!(portal.state, PortalState::Open | PortalState::Opening))
            .map(|portal| portal.id)
            .collect();

        targets
            .into_iter()
            .filter_map(|id| {
                let handle = self.start_hinge(id, HINGE_CLOSED, config.close_all_secs, 0.0)?;
                if let Some(portal) = self.portals.get_mut(id.0) {
                    debug!("portal {} {:?} -> Closing", portal.label, portal.state);
                    portal.state = PortalState::Closing;
                }
                Some((id, handle))
            })
            .collect()
    }

    /// Completion entry point for a hinge tween. A handle from a superseded tween is stale and
    /// changes nothing. Returns the state the portal settled into.
    pub fn settle(&mut self, id: PortalId, handle: TweenHandle) -> Option<PortalState> {
        let portal = self.portals.get(id.0)?;
        if !portal.hinge_slot.is_current(handle) || portal.hinge_slot.is_active() {
            return None;
        }

        let (next, hinge) = match portal.state {
            PortalState::Opening => (PortalState::Open, HINGE_OPEN),
            PortalState::Closing => (PortalState::Closed, HINGE_CLOSED),
            PortalState::Closed | PortalState::Open => return None,
        };

        if !self.set_state(id, next) {
            return None;
        }
        if let Some(portal) = self.portals.get_mut(id.0) {
            portal.hinge_rotation_y = hinge;
        }
        Some(next)
    }

    /// Advances every hinge and glow tween and reports the ones that finished this frame
    pub fn step(&mut self, delta_secs: f32) -> Vec<TweenCompleted> {
        let mut completed = Vec::new();

        for portal in &mut self.portals {
            if let Some(step) = portal.hinge_slot.step(delta_secs) {
                portal.hinge_rotation_y = step.value;
                if let Some(handle) = step.completed {
                    completed.push(TweenCompleted {
                        target: TweenTarget::Hinge(portal.id),
                        handle,
                    });
                }
            }
            if let Some(step) = portal.glow_slot.step(delta_secs) {
                portal.glow = step.value;
                if let Some(handle) = step.completed {
                    completed.push(TweenCompleted {
                        target: TweenTarget::Glow(portal.id),
                        handle,
                    });
                }
            }
        }

        completed
    }

    pub fn set_live_position(&mut self, id: PortalId, position: Vec3) {
        if let Some(portal) = self.portals.get_mut(id.0) {
            portal.live_position = position;
        }
    }

    pub fn rotate_live(&mut self, id: PortalId, delta_yaw: f32) {
        if let Some(portal) = self.portals.get_mut(id.0) {
            portal.live_rotation_y += delta_yaw;
        }
    }

    fn start_hinge(&mut self, id: PortalId, to: f32, secs: f32, delay_secs: f32) -> Option<TweenHandle> {
        let portal = self.portals.get_mut(id.0)?;
        let tween = Tween::new(portal.hinge_rotation_y, to, secs)
            .with_delay(delay_secs)
            .with_ease(EaseFunction::QuadraticInOut);
        Some(portal.hinge_slot.start(tween))
    }

    fn flare(&mut self, id: PortalId, config: &PortalConfig) {
        if let Some(portal) = self.portals.get_mut(id.0) {
            let tween = Tween::new(config.glow_rest, config.glow_peak, config.glow_leg_secs)
                .with_delay(config.open_delay_secs)
                .with_ease(EaseFunction::QuadraticInOut)
                .yoyo();
            portal.glow_slot.start(tween);
        }
    }
}
