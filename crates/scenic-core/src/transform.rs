//! # Transform Cache
//!
//! Lazily recomputed local transform of a node.
//!
//! The local matrix is always
//! `T(position) · T(-origin·size) · R(rotation about rotation_origin·size) · S(scale about scale_origin·size) · T(screen_offset)`.
//! Setters mark the cache dirty; reads recompute before returning.
//! World transforms are never cached: callers multiply `parent_world * local` on the fly.

use glam::{Mat4, Vec2, Vec3};
use std::cell::Cell;

/// The inputs of the local transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformInputs {
    pub position: Vec3,
    pub origin: Vec2,
    pub size: Vec2,
    pub rotation: f32,
    pub rotation_origin: Vec2,
    pub scale: f32,
    pub scale_origin: Vec2,
    pub screen_offset: Vec2,
}

/// Evaluates the local transform formula.
pub fn compose_local(i: &TransformInputs) -> Mat4 {
    let mut m = Mat4::from_translation(i.position);

    // 1. Recenter on origin
    m *= Mat4::from_translation((-i.origin * i.size).extend(0.0));

    // 2. Rotate about the rotation origin
    if i.rotation != 0.0 {
        let pivot = (i.rotation_origin * i.size).extend(0.0);
        m *= Mat4::from_translation(pivot);
        m *= Mat4::from_rotation_z(i.rotation);
        m *= Mat4::from_translation(-pivot);
    }

    // 3. Scale about the scale origin
    if i.scale != 1.0 {
        let pivot = (i.scale_origin * i.size).extend(0.0);
        m *= Mat4::from_translation(pivot);
        m *= Mat4::from_scale(Vec3::new(i.scale, i.scale, 1.0));
        m *= Mat4::from_translation(-pivot);
    }

    // 4. Screen offset
    m *= Mat4::from_translation(i.screen_offset.extend(0.0));
    m
}

/// Cached local transform with a dirty flag.
///
/// Interior mutability lets `&self` readers (render, hit testing) refresh the cache.
#[derive(Debug)]
pub struct TransformCache {
    matrix: Cell<Mat4>,
    dirty: Cell<bool>,
}

impl Default for TransformCache {
    fn default() -> Self {
        Self {
            matrix: Cell::new(Mat4::IDENTITY),
            dirty: Cell::new(true),
        }
    }
}

impl TransformCache {
    pub fn invalidate(&self) {
        self.dirty.set(true);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Returns the cached matrix, recomputing it from `inputs` first if dirty.
    pub fn get(&self, inputs: impl FnOnce() -> TransformInputs) -> Mat4 {
        if self.dirty.get() {
            self.matrix.set(compose_local(&inputs()));
            self.dirty.set(false);
        }
        self.matrix.get()
    }
}
