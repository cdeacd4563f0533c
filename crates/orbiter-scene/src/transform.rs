//! Model-view transform stack and per-body derived transforms.
//!
//! Draw code never pushes and pops by hand: [`TransformStack::scope`] returns
//! a guard that restores the saved transform when dropped, so the stack depth
//! always returns to where the frame started. The raw [`TransformStack::pop`]
//! stays available and reports underflow as an error.

use glam::{Mat3, Mat4, Vec3};

use crate::body::BodyPose;

/// Stack misuse. Always a programming error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransformStackError {
    /// `pop` was called with nothing saved.
    #[error("transform stack underflow: pop without matching push")]
    Underflow,
}

/// Current model-view transform plus saved copies.
#[derive(Debug, Clone)]
pub struct TransformStack {
    current: Mat4,
    saved: Vec<Mat4>,
}

impl TransformStack {
    /// Creates a stack whose current transform is `base`.
    #[must_use]
    pub fn new(base: Mat4) -> Self {
        Self {
            current: base,
            saved: Vec::new(),
        }
    }

    /// Save a copy of the current transform.
    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restore the most recently saved transform.
    pub fn pop(&mut self) -> Result<(), TransformStackError> {
        self.current = self.saved.pop().ok_or(TransformStackError::Underflow)?;
        Ok(())
    }

    /// Push, and pop again when the returned guard drops.
    pub fn scope(&mut self) -> TransformScope<'_> {
        self.push();
        TransformScope { stack: self }
    }

    /// Number of saved transforms.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// The current transform.
    #[must_use]
    pub fn current(&self) -> Mat4 {
        self.current
    }

    /// Post-multiply the current transform.
    pub fn multiply(&mut self, m: Mat4) {
        self.current *= m;
    }
}

/// Guard returned by [`TransformStack::scope`].
pub struct TransformScope<'a> {
    stack: &'a mut TransformStack,
}

impl TransformScope<'_> {
    /// Apply a body's local transform to the scoped model-view.
    pub fn apply_pose(&mut self, pose: &BodyPose) -> &mut Self {
        self.stack.multiply(pose.local_transform());
        self
    }

    /// Translate the scoped model-view.
    pub fn translate(&mut self, offset: Vec3) -> &mut Self {
        self.stack.multiply(Mat4::from_translation(offset));
        self
    }

    /// The scoped model-view.
    #[must_use]
    pub fn current(&self) -> Mat4 {
        self.stack.current()
    }
}

impl Drop for TransformScope<'_> {
    fn drop(&mut self) {
        let restored = self.stack.pop();
        debug_assert!(restored.is_ok(), "scope guard popped an empty stack");
    }
}

/// Matrices uploaded for one body draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTransform {
    /// World-to-camera transform including the body's local transform.
    pub model_view: Mat4,
    /// Inverse-transpose of the upper 3x3 of `model_view`.
    pub normal_matrix: Mat3,
}

impl BodyTransform {
    /// Derive the normal matrix from a model-view transform.
    #[must_use]
    pub fn from_model_view(model_view: Mat4) -> Self {
        Self {
            model_view,
            normal_matrix: normal_matrix(model_view),
        }
    }

    /// Base view composed with the body's local transform, without touching
    /// any shared stack.
    #[must_use]
    pub fn derive(base: Mat4, pose: &BodyPose) -> Self {
        Self::from_model_view(base * pose.local_transform())
    }
}

/// Inverse-transpose of the upper 3x3 part of `model_view`.
#[must_use]
pub fn normal_matrix(model_view: Mat4) -> Mat3 {
    Mat3::from_mat4(model_view).inverse().transpose()
}
