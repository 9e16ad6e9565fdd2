//! Retained display list
//!
//! Backend-free [`Renderer`]: keeps every node and its transform in an arena.
//! Used headless on native and wrapped by the canvas presenter on the web.

use glam::Vec2;
use slotmap::SlotMap;

use super::{Layer, Primitive, RenderHandle, Renderer};
use crate::sim::Dimension;

/// A node in the display list
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayNode {
    pub primitive: Primitive,
    pub layer: Layer,
    pub position: Vec2,
    pub rotation: f32,
}

#[derive(Debug, Default)]
pub struct DisplayList {
    nodes: SlotMap<RenderHandle, DisplayNode>,
    wireframes: Vec<Vec<Vec2>>,
    frames_presented: u64,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, handle: RenderHandle) -> Option<&DisplayNode> {
        self.nodes.get(handle)
    }

    /// Nodes of one layer, in arena order
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &DisplayNode> + '_ {
        self.nodes.values().filter(move |n| n.layer == layer)
    }

    pub fn wireframes(&self) -> &[Vec<Vec2>] {
        &self.wireframes
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Renderer for DisplayList {
    fn create(&mut self, primitive: Primitive, layer: Layer) -> RenderHandle {
        self.nodes.insert(DisplayNode {
            primitive,
            layer,
            position: Vec2::ZERO,
            rotation: 0.0,
        })
    }

    fn set_transform(&mut self, handle: RenderHandle, position: Vec2, rotation: f32) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.position = position;
            node.rotation = rotation;
        }
    }

    fn destroy(&mut self, handle: RenderHandle) -> bool {
        self.nodes.remove(handle).is_some()
    }

    fn bounds(&self, handle: RenderHandle) -> Option<Dimension> {
        self.nodes.get(handle).map(|n| n.primitive.size())
    }

    fn set_wireframes(&mut self, wireframes: Vec<Vec<Vec2>>) {
        self.wireframes = wireframes;
    }

    fn present(&mut self) {
        self.frames_presented += 1;
    }
}
