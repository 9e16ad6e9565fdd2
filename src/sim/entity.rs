//! Entity model
//!
//! Plain data shared by every stage. Physics-backed and display-only
//! entities are one type, discriminated once at creation by [`ElementKind`].

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::physics::BodyHandle;
use crate::renderer::RenderHandle;

/// Unique for the lifetime of an entity, never reused within a run
pub type EntityId = u64;

/// World-space position
pub type Coordinate = Vec2;

/// World-space linear velocity
pub type Velocity = Vec2;

/// Size in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub width: f32,
    pub height: f32,
}

impl Dimension {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn half(self) -> Vec2 {
        self.as_vec2() / 2.0
    }
}

/// Axis-aligned bounds in world-grid cells, inclusive on both corners.
/// `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRect {
    pub top_left: IVec2,
    pub bottom_right: IVec2,
}

impl GridRect {
    pub fn contains(&self, row: i32, col: i32) -> bool {
        (self.top_left.y..=self.bottom_right.y).contains(&row)
            && (self.top_left.x..=self.bottom_right.x).contains(&col)
    }

    /// Number of cells covered
    pub fn area(&self) -> i64 {
        let cols = (self.bottom_right.x - self.top_left.x + 1).max(0) as i64;
        let rows = (self.bottom_right.y - self.top_left.y + 1).max(0) as i64;
        cols * rows
    }
}

/// Anything drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayElement {
    /// World space for entities; stars keep their screen position here
    pub coordinate: Coordinate,
    /// Radians, 0 = facing +x
    pub rotation: f32,
    pub render: RenderHandle,
}

/// Who did the hitting decides the damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionKind {
    Body,
    Player,
    Projectile,
}

/// Link from an entity to its physics body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBinding {
    pub collision: CollisionKind,
    pub body: BodyHandle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementKind {
    /// Drawn only, never collides
    DisplayOnly,
    Physics(PhysicsBinding),
}

/// A tracked entity
#[derive(Debug, Clone, PartialEq)]
pub struct GameElement {
    pub id: EntityId,
    /// Timestamp (ms) the entity entered the world
    pub created_at: f64,
    /// `None` = indestructible
    pub health: Option<i32>,
    pub display: DisplayElement,
    pub kind: ElementKind,
}

impl GameElement {
    pub fn physics(&self) -> Option<PhysicsBinding> {
        match self.kind {
            ElementKind::Physics(binding) => Some(binding),
            ElementKind::DisplayOnly => None,
        }
    }

    pub fn collision_kind(&self) -> Option<CollisionKind> {
        self.physics().map(|b| b.collision)
    }

    /// Health depleted, due for removal
    pub fn is_destroyed(&self) -> bool {
        self.health.is_some_and(|h| h <= 0)
    }

    /// Subtract `amount` (floored at 0). Returns false for indestructible entities.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        match self.health.as_mut() {
            Some(health) => {
                *health = (*health - amount.max(0)).max(0);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn element(health: Option<i32>) -> GameElement {
        GameElement {
            id: 1,
            created_at: 0.0,
            health,
            display: DisplayElement {
                coordinate: Vec2::ZERO,
                rotation: 0.0,
                render: RenderHandle::from(KeyData::from_ffi(1)),
            },
            kind: ElementKind::DisplayOnly,
        }
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut e = element(Some(30));
        assert!(e.apply_damage(20));
        assert_eq!(e.health, Some(10));
        assert!(!e.is_destroyed());
        e.apply_damage(50);
        assert_eq!(e.health, Some(0));
        assert!(e.is_destroyed());
    }

    #[test]
    fn test_indestructible() {
        let mut e = element(None);
        assert!(!e.apply_damage(1000));
        assert_eq!(e.health, None);
        assert!(!e.is_destroyed());
        assert!(e.physics().is_none());
    }

    #[test]
    fn test_grid_rect() {
        let rect = GridRect {
            top_left: IVec2::new(-2, -1),
            bottom_right: IVec2::new(2, 1),
        };
        assert_eq!(rect.area(), 15);
        assert!(rect.contains(1, -2));
        assert!(!rect.contains(2, 0));
    }
}
