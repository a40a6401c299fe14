//! Time-based property interpolation.
//!
//! Every animatable field owns exactly one [`AnimationSlot`]. Starting a tween in a slot
//! supersedes whatever was in flight there and bumps the slot's generation, so a completion
//! reported for an older [`TweenHandle`] can be recognised as stale and ignored.
//!
//! Completions are published as [`TweenCompleted`] messages and consumed on the next frame.

use bevy::math::StableInterpolate;
use bevy::math::curve::Curve;
use bevy::math::curve::easing::EaseFunction;
use bevy::prelude::*;

use crate::portal::PortalId;

pub struct TweenPlugin;

impl Plugin for TweenPlugin {
    fn build(&self, app: &mut App) { app.add_message::<TweenCompleted>(); }
}

/// Identifies one tween started in one slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub struct TweenHandle(u32);

/// The field a tween was animating
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TweenTarget {
    CameraEye,
    CameraFocus,
    Glow(PortalId),
    Hinge(PortalId),
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TweenCompleted {
    pub target: TweenTarget,
    pub handle: TweenHandle,
}

/// Interpolates from one value to another over a fixed duration, optionally delayed and
/// optionally returning to the start (yoyo) once it reaches the end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween<V> {
    from:          V,
    to:            V,
    duration_secs: f32,
    delay_secs:    f32,
    elapsed_secs:  f32,
    ease:          EaseFunction,
    yoyo:          bool,
}

impl<V: StableInterpolate + Copy> Tween<V> {
    pub const fn new(from: V, to: V, duration_secs: f32) -> Self {
        Self {
            from,
            to,
            duration_secs,
            delay_secs: 0.0,
            elapsed_secs: 0.0,
            ease: EaseFunction::Linear,
            yoyo: false,
        }
    }

    pub const fn with_delay(mut self, delay_secs: f32) -> Self {
        self.delay_secs = delay_secs;
        self
    }

    pub const fn with_ease(mut self, ease: EaseFunction) -> Self {
        self.ease = ease;
        self
    }

    /// Play forward then backward, ending where it started
    pub const fn yoyo(mut self) -> Self {
        self.yoyo = true;
        self
    }

    pub fn total_secs(&self) -> f32 {
        let legs = if self.yoyo { 2.0 } else { 1.0 };
        self.duration_secs.mul_add(legs, self.delay_secs)
    }

    pub fn is_finished(&self) -> bool { self.elapsed_secs >= self.total_secs() }

    pub fn value(&self) -> V {
        let active_secs = (self.elapsed_secs - self.delay_secs).max(0.0);
        let mut progress = if self.duration_secs <= 0.0 {
            if self.yoyo { 2.0 } else { 1.0 }
        } else {
            active_secs / self.duration_secs
        };
        if self.yoyo && progress > 1.0 {
            progress = 2.0 - progress;
        }
        let eased = self.ease.sample_clamped(progress.clamp(0.0, 1.0));
        self.from.interpolate_stable(&self.to, eased)
    }

    fn advance(&mut self, delta_secs: f32) { self.elapsed_secs += delta_secs; }
}

/// Result of stepping a slot by one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotStep<V> {
    pub value:     V,
    pub completed: Option<TweenHandle>,
}

/// Single owner of one animatable field.
#[derive(Clone, Debug)]
pub struct AnimationSlot<V> {
    generation: u32,
    active:     Option<Tween<V>>,
}

impl<V> Default for AnimationSlot<V> {
    fn default() -> Self {
        Self {
            generation: 0,
            active:     None,
        }
    }
}

impl<V: StableInterpolate + Copy> AnimationSlot<V> {
    /// Starts `tween`, superseding anything already in flight in this slot
    pub fn start(&mut self, tween: Tween<V>) -> TweenHandle {
        self.generation = self.generation.wrapping_add(1);
        self.active = Some(tween);
        TweenHandle(self.generation)
    }

    /// Handle of the tween currently in flight
    #[cfg(test)]
    pub const fn in_flight(&self) -> Option<TweenHandle> {
        match self.active {
            Some(_) => Some(TweenHandle(self.generation)),
            None => None,
        }
    }

    pub const fn is_active(&self) -> bool { self.active.is_some() }

    /// True when `handle` belongs to the most recently started tween, finished or not
    pub const fn is_current(&self, handle: TweenHandle) -> bool { handle.0 == self.generation }

    /// Advances the in-flight tween. Returns `None` when the slot is idle.
    pub fn step(&mut self, delta_secs: f32) -> Option<SlotStep<V>> {
        let tween = self.active.as_mut()?;
        tween.advance(delta_secs);
        let value = tween.value();
        let finished = tween.is_finished();

        let completed = if finished {
            self.active = None;
            Some(TweenHandle(self.generation))
        } else {
            None
        };

        Some(SlotStep { value, completed })
    }
}
