//! Physics engine adapter
//!
//! The simulation only talks to physics through [`PhysicsWorld`]. Bodies are
//! addressed by [`BodyHandle`] keys into an arena owned by the engine, so no
//! engine type leaks into entity state.

pub mod arcade;
pub mod contact;

pub use arcade::ArcadePhysics;
pub use contact::{Contact, shape_contact};

use glam::Vec2;

slotmap::new_key_type! {
    /// Stable handle to a body inside a [`PhysicsWorld`]
    pub struct BodyHandle;
}

/// Collision shape of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Rectangle { width: f32, height: f32 },
}

/// Parameters for creating a body
#[derive(Debug, Clone, Copy)]
pub struct BodyDesc {
    pub position: Vec2,
    pub angle: f32,
    pub velocity: Vec2,
    pub mass: f32,
    pub shape: Shape,
}

impl BodyDesc {
    pub fn circle(position: Vec2, radius: f32, mass: f32) -> Self {
        Self {
            position,
            angle: 0.0,
            velocity: Vec2::ZERO,
            mass,
            shape: Shape::Circle { radius },
        }
    }

    pub fn rectangle(position: Vec2, width: f32, height: f32, mass: f32) -> Self {
        Self {
            position,
            angle: 0.0,
            velocity: Vec2::ZERO,
            mass,
            shape: Shape::Rectangle { width, height },
        }
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }
}

/// Read-only snapshot of a body's transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyView {
    pub position: Vec2,
    /// Unbounded, radians
    pub angle: f32,
    pub velocity: Vec2,
}

/// Operations the simulation needs from a physics engine
pub trait PhysicsWorld {
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle;

    /// Returns false if the body was already gone
    fn remove_body(&mut self, handle: BodyHandle) -> bool;

    fn contains(&self, handle: BodyHandle) -> bool;

    /// Apply `force` at world-space `point` (off-center points induce torque)
    fn apply_force(&mut self, handle: BodyHandle, point: Vec2, force: Vec2);

    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2);

    fn body(&self, handle: BodyHandle) -> Option<BodyView>;

    /// World-space outline, for debug wireframes
    fn vertices(&self, handle: BodyHandle) -> Vec<Vec2>;

    /// Advance one fixed step; returns every pair overlapping after the step
    fn step(&mut self, dt: f32) -> Vec<(BodyHandle, BodyHandle)>;
}
