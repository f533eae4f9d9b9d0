//! Transform stack driven by traversal push/pop counts.

use crate::core::types::Mat4;

/// A stack of accumulated model matrices over an identity base.
#[derive(Clone, Debug)]
pub struct MatrixStack {
    stack: Vec<Mat4>,
}

impl MatrixStack {
    pub fn new() -> Self {
        Self {
            stack: vec![Mat4::IDENTITY],
        }
    }

    /// Push `local` composed onto the current top.
    pub fn push(&mut self, local: Mat4) {
        let top = self.top();
        self.stack.push(top * local);
    }

    /// Pop up to `count` entries, never the base. Returns how many were popped.
    pub fn pop(&mut self, count: usize) -> usize {
        let popped = count.min(self.depth());
        if popped < count {
            log::warn!("Matrix stack underflow: asked to pop {count}, only {popped} pushed");
        }
        self.stack.truncate(self.stack.len() - popped);
        popped
    }

    /// Current accumulated matrix.
    pub fn top(&self) -> Mat4 {
        self.stack.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    /// Number of pushes not yet popped.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}
