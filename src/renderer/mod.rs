//! Rendering adapter
//!
//! The simulation creates, moves and destroys display nodes through
//! [`Renderer`] and never touches a concrete drawing backend. Nodes are
//! addressed by [`RenderHandle`] keys into an arena.

pub mod display_list;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use display_list::{DisplayList, DisplayNode};

use glam::Vec2;

use crate::sim::Dimension;

slotmap::new_key_type! {
    /// Stable handle to a display node
    pub struct RenderHandle;
}

/// Draw order bucket, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Parallax star fields
    Background,
    /// Ships, obstacles, projectiles
    Foreground,
    /// Text and HUD
    Overlay,
}

/// What a display node draws
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Textured quad, anchored at its center
    Sprite {
        texture: &'static str,
        width: f32,
        height: f32,
    },
    /// Filled rectangle, anchored at its center
    Rectangle { width: f32, height: f32, color: u32 },
    /// Filled circle
    Circle { radius: f32, color: u32, alpha: f32 },
    /// Single line of text, anchored at its top-left
    Text { content: String, size: f32 },
}

impl Primitive {
    /// Width/height of the primitive before rotation
    pub fn size(&self) -> Dimension {
        match self {
            Primitive::Sprite { width, height, .. } | Primitive::Rectangle { width, height, .. } => {
                Dimension::new(*width, *height)
            }
            Primitive::Circle { radius, .. } => Dimension::new(radius * 2.0, radius * 2.0),
            // Monospace approximation
            Primitive::Text { content, size } => {
                Dimension::new(content.chars().count() as f32 * size * 0.6, *size)
            }
        }
    }
}

/// Operations the simulation needs from a renderer
pub trait Renderer {
    fn create(&mut self, primitive: Primitive, layer: Layer) -> RenderHandle;

    /// Screen-space position (pixels, relative to the viewport) and rotation
    fn set_transform(&mut self, handle: RenderHandle, position: Vec2, rotation: f32);

    /// Free the node; returns false if it was already gone
    fn destroy(&mut self, handle: RenderHandle) -> bool;

    fn bounds(&self, handle: RenderHandle) -> Option<Dimension>;

    /// Replace the debug wireframe overlay (screen-space polylines)
    fn set_wireframes(&mut self, wireframes: Vec<Vec<Vec2>>);

    /// Draw the current display list
    fn present(&mut self);
}
