//! Animation slot operations of [`SceneNode`].
//!
//! Callback contract per operation:
//! - `advance_animation`: fires once on natural completion.
//! - `stop_animation`: fires, without applying the final state.
//! - `finish_animation`: applies the final state, then fires.
//! - `cancel_animation`: never fires.

use super::SceneNode;
use crate::animation::{
    Animation, AnimationController, EasingType, FinishedCallback, LambdaAnimation, MAX_ANIMATIONS,
};
use crate::types::AnimateFlags;
use glam::Vec2;
use tracing::warn;

/// Starting scale factor of the zoom-in used by [`SceneNode::animate_to`].
const ANIMATE_TO_SCALE_FROM: f32 = 0.9;

impl SceneNode {
    /// Installs an animation in `slot`, silently discarding whatever ran there.
    ///
    /// `delay` defers the first application; `reverse` runs progress from 1 to 0.
    /// Returns `false` if `slot` is out of range.
    pub fn set_animation(
        &mut self,
        animation: impl Animation + 'static,
        delay: f64,
        callback: Option<FinishedCallback>,
        reverse: bool,
        slot: usize,
    ) -> bool {
        let controller = AnimationController::new(Box::new(animation), delay, callback, reverse);
        match self.animations.put(slot, controller) {
            Ok(_replaced) => true,
            Err(_) => {
                warn!(slot, "animation slot out of range");
                false
            }
        }
    }

    /// Advances the animation in `slot` by `dt`.
    ///
    /// On completion the callback fires once and the slot is freed.
    /// Returns whether a controller occupied the slot.
    pub fn advance_animation(&mut self, slot: usize, dt: f64) -> bool {
        let Some(mut controller) = self.animations.take(slot) else {
            return false;
        };

        if controller.update(self, dt) {
            if let Some(callback) = controller.take_callback() {
                callback(self);
            }
        } else if !self.animations.is_occupied(slot) {
            // Not reinstalled if the animation replaced itself while applying.
            let _ = self.animations.put(slot, controller);
        }
        true
    }

    /// Removes the animation and fires its callback at the current progress.
    pub fn stop_animation(&mut self, slot: usize) -> bool {
        let Some(mut controller) = self.animations.take(slot) else {
            return false;
        };
        if let Some(callback) = controller.take_callback() {
            callback(self);
        }
        true
    }

    /// Removes the animation, leaving properties as they are. The callback never fires.
    pub fn cancel_animation(&mut self, slot: usize) -> bool {
        self.animations.take(slot).is_some()
    }

    /// Skips to the end: applies the final state, fires the callback, frees the slot.
    pub fn finish_animation(&mut self, slot: usize) -> bool {
        let Some(mut controller) = self.animations.take(slot) else {
            return false;
        };
        controller.finish(self);
        if let Some(callback) = controller.take_callback() {
            callback(self);
        }
        true
    }

    pub fn stop_all_animations(&mut self) {
        for slot in 0..MAX_ANIMATIONS {
            self.stop_animation(slot);
        }
    }

    pub fn cancel_all_animations(&mut self) {
        for slot in 0..MAX_ANIMATIONS {
            self.cancel_animation(slot);
        }
    }

    pub fn is_animation_playing(&self, slot: usize) -> bool {
        self.animations.is_occupied(slot)
    }

    pub fn is_animation_reversed(&self, slot: usize) -> bool {
        self.animations
            .get(slot)
            .is_some_and(AnimationController::is_reversed)
    }

    /// Elapsed time of the animation in `slot` (negative while delayed), 0 when empty.
    pub fn animation_time(&self, slot: usize) -> f64 {
        self.animations.get(slot).map_or(0.0, AnimationController::time)
    }

    /// Moves from `from` to `to` over `duration` with an ease-out curve on slot 0.
    ///
    /// `flags` selects the driven properties: position, a fade in from
    /// transparent to the current opacity, and a zoom in to the current scale.
    /// On completion the final values are restored exactly, then `callback` fires.
    pub fn animate_to(
        &mut self,
        from: Vec2,
        to: Vec2,
        flags: AnimateFlags,
        duration: f64,
        callback: Option<FinishedCallback>,
    ) {
        let scale = self.state.scale;
        let opacity = self.state.opacity;
        let scale_from = scale * ANIMATE_TO_SCALE_FROM;

        if flags.contains(AnimateFlags::POSITION) {
            self.set_position_xy(from.x, from.y);
        }
        if flags.contains(AnimateFlags::OPACITY) {
            self.set_opacity(0);
        }
        if flags.contains(AnimateFlags::SCALE) {
            self.set_scale(scale_from);
        }

        let animation = LambdaAnimation::new(duration, move |node: &mut SceneNode, t: f32| {
            let pct = if t >= 1.0 {
                1.0
            } else {
                EasingType::EaseOut.eval(t)
            };
            if flags.contains(AnimateFlags::POSITION) {
                let p = from.lerp(to, pct);
                node.set_position_xy(p.x, p.y);
            }
            if flags.contains(AnimateFlags::OPACITY) {
                node.set_opacity((opacity as f32 * pct).round().clamp(0.0, 255.0) as u8);
            }
            if flags.contains(AnimateFlags::SCALE) {
                node.set_scale(scale_from + (scale - scale_from) * pct);
            }
        })
        .with_targets(flags);

        let restore: FinishedCallback = Box::new(move |node: &mut SceneNode| {
            if flags.contains(AnimateFlags::POSITION) {
                node.set_position_xy(to.x, to.y);
            }
            if flags.contains(AnimateFlags::OPACITY) {
                node.set_opacity(opacity);
            }
            if flags.contains(AnimateFlags::SCALE) {
                node.set_scale(scale);
            }
            if let Some(callback) = callback {
                callback(node);
            }
        });

        self.set_animation(animation, 0.0, Some(restore), false, 0);
    }
}
