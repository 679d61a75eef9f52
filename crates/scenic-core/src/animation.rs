//! # Animation Module
//!
//! Easing curves, keyframe sequences and the per-node animation slot table.
//!
//! ## Key Types
//! - `EasingType`: named easing curves backed by the `keyframe` crate.
//! - `Animated<T>`: a keyframe track sampled at absolute times (storyboard tracks).
//! - `Animation`: something that drives node properties from a progress value in `[0, 1]`.
//! - `AnimationController`: one running animation with delay, direction and completion callback.
//! - `AnimationSlots`: the fixed `MAX_ANIMATIONS` slots of a node.

use crate::scene::SceneNode;
use crate::types::AnimateFlags;
use keyframe::{CanTween, EasingFunction};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of independent animation slots per node.
pub const MAX_ANIMATIONS: usize = 4;

/// Supported easing functions for animations.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl EasingFunction for EasingType {
    fn y(&self, x: f64) -> f64 {
        match self {
            EasingType::Linear => keyframe::functions::Linear.y(x),
            EasingType::EaseIn => keyframe::functions::EaseIn.y(x),
            EasingType::EaseOut => keyframe::functions::EaseOut.y(x),
            EasingType::EaseInOut => keyframe::functions::EaseInOut.y(x),
        }
    }
}

impl EasingType {
    /// Evaluates the easing curve at a specific point `x` (0.0 to 1.0).
    pub fn eval(&self, x: f32) -> f32 {
        self.y(x as f64) as f32
    }
}

/// A keyframe track sampled at absolute times.
///
/// Keyframes sharing a time form a step: sampling at or after that time
/// yields the later one. The easing of a keyframe shapes the segment that
/// starts at it.
#[derive(Clone)]
pub struct Animated<T>
where
    T: Clone + CanTween + Default,
{
    /// Keyframes as (value, absolute_time, easing), ordered by time.
    pub keyframes: Vec<(T, f64, EasingType)>,
    /// The current calculated value for the last updated time.
    pub current_value: T,
}

impl<T> Animated<T>
where
    T: Clone + CanTween + Default,
{
    /// Builds a track from keyframes at absolute times.
    ///
    /// Returns `None` for an empty list.
    pub fn from_keyframes(mut frames: Vec<(T, f64, EasingType)>) -> Option<Self> {
        frames.sort_by(|a, b| a.1.total_cmp(&b.1));
        let initial = frames.first()?.0.clone();
        Some(Self {
            keyframes: frames,
            current_value: initial,
        })
    }

    /// Time of the last keyframe.
    pub fn duration(&self) -> f64 {
        self.keyframes.last().map_or(0.0, |k| k.1)
    }

    /// Updates `current_value` based on the provided absolute time.
    pub fn update(&mut self, time: f64) {
        self.current_value = self.sample(time);
    }

    /// The value at `time`. Before the first keyframe it holds the first
    /// value, at or after the last one it holds the last value exactly.
    pub fn sample(&self, time: f64) -> T {
        let reached = self.keyframes.partition_point(|k| k.1 <= time);
        let Some(index) = reached.checked_sub(1) else {
            return self.keyframes.first().map(|k| k.0.clone()).unwrap_or_default();
        };
        let (from, start, easing) = &self.keyframes[index];
        let Some((to, stop, _)) = self.keyframes.get(index + 1) else {
            return from.clone();
        };
        let progress = ((time - start) / (stop - start)).clamp(0.0, 1.0);
        T::ease(from.clone(), to.clone(), easing.y(progress))
    }
}

impl<T> fmt::Debug for Animated<T>
where
    T: Clone + CanTween + Default + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animated")
            .field("current_value", &self.current_value)
            .finish()
    }
}

/// One-shot completion callback of an animation slot.
///
/// Receives the node so it can chain another animation into the slot it just vacated.
pub type FinishedCallback = Box<dyn FnOnce(&mut SceneNode)>;

/// Drives node properties from a progress value.
pub trait Animation {
    /// Total duration in milliseconds.
    fn duration(&self) -> f64;

    /// Applies the state at progress `t` (0.0 to 1.0) through the node's setters.
    fn apply(&mut self, node: &mut SceneNode, t: f32);

    /// Properties this animation writes.
    fn targets(&self) -> AnimateFlags {
        AnimateFlags::ALL
    }
}

/// An animation backed by a closure.
pub struct LambdaAnimation<F>
where
    F: FnMut(&mut SceneNode, f32),
{
    func: F,
    duration: f64,
    targets: AnimateFlags,
}

impl<F> LambdaAnimation<F>
where
    F: FnMut(&mut SceneNode, f32),
{
    pub fn new(duration: f64, func: F) -> Self {
        Self {
            func,
            duration,
            targets: AnimateFlags::ALL,
        }
    }

    pub fn with_targets(mut self, targets: AnimateFlags) -> Self {
        self.targets = targets;
        self
    }
}

impl<F> Animation for LambdaAnimation<F>
where
    F: FnMut(&mut SceneNode, f32),
{
    fn duration(&self) -> f64 {
        self.duration
    }

    fn apply(&mut self, node: &mut SceneNode, t: f32) {
        (self.func)(node, t)
    }

    fn targets(&self) -> AnimateFlags {
        self.targets
    }
}

/// A running animation in one slot.
pub struct AnimationController {
    animation: Box<dyn Animation>,
    /// Elapsed time; negative while the start delay is pending.
    time: f64,
    reverse: bool,
    callback: Option<FinishedCallback>,
}

impl AnimationController {
    pub fn new(
        animation: Box<dyn Animation>,
        delay: f64,
        callback: Option<FinishedCallback>,
        reverse: bool,
    ) -> Self {
        Self {
            animation,
            time: -delay.max(0.0),
            reverse,
            callback,
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn is_reversed(&self) -> bool {
        self.reverse
    }

    pub fn targets(&self) -> AnimateFlags {
        self.animation.targets()
    }

    /// Advances by `dt` and applies the interpolated state.
    ///
    /// Returns `true` once the animation has reached its end.
    pub fn update(&mut self, node: &mut SceneNode, dt: f64) -> bool {
        self.time += dt;
        if self.time < 0.0 {
            return false;
        }

        let duration = self.animation.duration();
        let progress = if duration <= 0.0 {
            1.0
        } else {
            (self.time / duration).clamp(0.0, 1.0) as f32
        };
        self.apply(node, progress);
        self.time >= duration
    }

    /// Applies the final state.
    pub fn finish(&mut self, node: &mut SceneNode) {
        self.time = self.time.max(self.animation.duration());
        self.apply(node, 1.0);
    }

    pub fn take_callback(&mut self) -> Option<FinishedCallback> {
        self.callback.take()
    }

    fn apply(&mut self, node: &mut SceneNode, progress: f32) {
        let t = if self.reverse { 1.0 - progress } else { progress };
        self.animation.apply(node, t);
    }
}

impl fmt::Debug for AnimationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationController")
            .field("time", &self.time)
            .field("duration", &self.animation.duration())
            .field("reverse", &self.reverse)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

/// The fixed slot table of a node. At most one controller per slot.
#[derive(Debug, Default)]
pub struct AnimationSlots {
    slots: [Option<AnimationController>; MAX_ANIMATIONS],
}

impl AnimationSlots {
    pub fn get(&self, slot: usize) -> Option<&AnimationController> {
        self.slots.get(slot)?.as_ref()
    }

    pub fn is_occupied(&self, slot: usize) -> bool {
        self.get(slot).is_some()
    }

    /// Removes and returns the controller in `slot`.
    pub fn take(&mut self, slot: usize) -> Option<AnimationController> {
        self.slots.get_mut(slot)?.take()
    }

    /// Installs `controller`, returning whatever occupied the slot before.
    ///
    /// Out-of-range slots hand the controller back unchanged.
    pub fn put(
        &mut self,
        slot: usize,
        controller: AnimationController,
    ) -> Result<Option<AnimationController>, AnimationController> {
        match self.slots.get_mut(slot) {
            Some(entry) => Ok(entry.replace(controller)),
            None => Err(controller),
        }
    }
}
