//! Renderer that records every call
//!
//! Used headless (the native binary logs through it) and in tests to check
//! what the simulation asked to draw.

use std::collections::BTreeMap;

use super::{DrawId, Drawable, Renderer};

/// A single renderer call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderCall {
    Draw(DrawId, Drawable),
    Remove(DrawId),
    Present,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    width: f32,
    height: f32,
    calls: Vec<RenderCall>,
    visible: BTreeMap<DrawId, Drawable>,
    frames: u64,
}

impl RecordingRenderer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// What is on screen right now
    pub fn visible(&self) -> impl Iterator<Item = (&DrawId, &Drawable)> {
        self.visible.iter()
    }

    pub fn get(&self, id: DrawId) -> Option<&Drawable> {
        self.visible.get(&id)
    }

    pub fn is_visible(&self, id: DrawId) -> bool {
        self.visible.contains_key(&id)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Drop the call log, keeping the screen state
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn arena_width(&self) -> f32 {
        self.width
    }

    fn arena_height(&self) -> f32 {
        self.height
    }

    fn draw_shape(&mut self, id: DrawId, shape: Drawable) {
        log::trace!("draw {:?} {:?}", id, shape);
        self.calls.push(RenderCall::Draw(id, shape));
        self.visible.insert(id, shape);
    }

    fn remove_shape(&mut self, id: DrawId) {
        log::trace!("remove {:?}", id);
        self.calls.push(RenderCall::Remove(id));
        self.visible.remove(&id);
    }

    fn present_frame(&mut self) {
        self.calls.push(RenderCall::Present);
        self.frames += 1;
    }
}
