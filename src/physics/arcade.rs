//! Built-in arcade physics engine
//!
//! Small rigid-body world used by the game and its tests:
//! - Semi-implicit Euler, force and torque accumulators cleared every step
//! - Brute-force pair checks (scenes hold tens of bodies, not thousands)
//! - Positional separation plus a restitution impulse along the contact normal
//! - Every overlapping pair is reported every step while the overlap lasts

use glam::Vec2;
use slotmap::SlotMap;

use super::contact::{Posed, outline, shape_contact};
use super::{BodyDesc, BodyHandle, BodyView, PhysicsWorld, Shape};

/// Bounciness of contacts (0 = dead stop, 1 = perfectly elastic)
const RESTITUTION: f32 = 0.2;
/// Fraction of penetration corrected per step
const SEPARATION_PERCENT: f32 = 0.8;

#[derive(Debug, Clone)]
struct RigidBody {
    position: Vec2,
    angle: f32,
    velocity: Vec2,
    angular_velocity: f32,
    inv_mass: f32,
    inv_inertia: f32,
    shape: Shape,
    force: Vec2,
    torque: f32,
}

impl RigidBody {
    fn new(desc: BodyDesc) -> Self {
        let inertia = match desc.shape {
            Shape::Circle { radius } => 0.5 * desc.mass * radius * radius,
            Shape::Rectangle { width, height } => {
                desc.mass * (width * width + height * height) / 12.0
            }
        };
        Self {
            position: desc.position,
            angle: desc.angle,
            velocity: desc.velocity,
            angular_velocity: 0.0,
            inv_mass: inverse(desc.mass),
            inv_inertia: inverse(inertia),
            shape: desc.shape,
            force: Vec2::ZERO,
            torque: 0.0,
        }
    }

    fn posed(&self) -> Posed {
        Posed {
            shape: self.shape,
            position: self.position,
            angle: self.angle,
        }
    }

    fn integrate(&mut self, dt: f32) {
        self.velocity += self.force * self.inv_mass * dt;
        self.angular_velocity += self.torque * self.inv_inertia * dt;
        self.position += self.velocity * dt;
        self.angle += self.angular_velocity * dt;
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }
}

fn inverse(value: f32) -> f32 {
    if value > 0.0 { 1.0 / value } else { 0.0 }
}

/// Arena-backed rigid-body world
#[derive(Debug, Default)]
pub struct ArcadePhysics {
    bodies: SlotMap<BodyHandle, RigidBody>,
}

impl ArcadePhysics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Angular velocity of a body (rad/s)
    pub fn angular_velocity(&self, handle: BodyHandle) -> Option<f32> {
        self.bodies.get(handle).map(|b| b.angular_velocity)
    }

    fn resolve(&mut self, a: BodyHandle, b: BodyHandle, normal: Vec2, penetration: f32) {
        let Some([body_a, body_b]) = self.bodies.get_disjoint_mut([a, b]) else {
            return;
        };
        let inv_total = body_a.inv_mass + body_b.inv_mass;
        if inv_total <= 0.0 {
            return;
        }

        let correction = normal * (penetration * SEPARATION_PERCENT / inv_total);
        body_a.position -= correction * body_a.inv_mass;
        body_b.position += correction * body_b.inv_mass;

        let closing = (body_b.velocity - body_a.velocity).dot(normal);
        if closing < 0.0 {
            let impulse = -(1.0 + RESTITUTION) * closing / inv_total;
            body_a.velocity -= normal * impulse * body_a.inv_mass;
            body_b.velocity += normal * impulse * body_b.inv_mass;
        }
    }
}

impl PhysicsWorld for ArcadePhysics {
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle {
        self.bodies.insert(RigidBody::new(desc))
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.bodies.remove(handle).is_some()
    }

    fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(handle)
    }

    fn apply_force(&mut self, handle: BodyHandle, point: Vec2, force: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.force += force;
            body.torque += (point - body.position).perp_dot(force);
        }
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.velocity = velocity;
        }
    }

    fn body(&self, handle: BodyHandle) -> Option<BodyView> {
        self.bodies.get(handle).map(|b| BodyView {
            position: b.position,
            angle: b.angle,
            velocity: b.velocity,
        })
    }

    fn vertices(&self, handle: BodyHandle) -> Vec<Vec2> {
        self.bodies
            .get(handle)
            .map(|b| outline(&b.posed()))
            .unwrap_or_default()
    }

    fn step(&mut self, dt: f32) -> Vec<(BodyHandle, BodyHandle)> {
        for body in self.bodies.values_mut() {
            body.integrate(dt);
        }

        let posed: Vec<(BodyHandle, Posed)> =
            self.bodies.iter().map(|(h, b)| (h, b.posed())).collect();

        let mut pairs = Vec::new();
        for (i, (handle_a, shape_a)) in posed.iter().enumerate() {
            for (handle_b, shape_b) in &posed[i + 1..] {
                let contact = shape_contact(shape_a, shape_b);
                if contact.hit {
                    pairs.push((*handle_a, *handle_b));
                    self.resolve(*handle_a, *handle_b, contact.normal, contact.penetration);
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_integrates_to_velocity() {
        let mut world = ArcadePhysics::new();
        let body = world.create_body(BodyDesc::circle(Vec2::ZERO, 1.0, 2.0));
        world.apply_force(body, Vec2::ZERO, Vec2::new(120.0, 0.0));
        world.step(0.5);
        let view = world.body(body).unwrap();
        // a = 60, v = 30, x = 15
        assert!((view.velocity.x - 30.0).abs() < 1e-4);
        assert!((view.position.x - 15.0).abs() < 1e-4);

        // Forces do not carry over to the next step
        world.step(0.5);
        assert!((world.body(body).unwrap().velocity.x - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_off_center_force_spins() {
        let mut world = ArcadePhysics::new();
        let body = world.create_body(BodyDesc::circle(Vec2::ZERO, 10.0, 1.0));
        // Push +y at a point behind center: counter-clockwise torque is negative here
        world.apply_force(body, Vec2::new(-10.0, 0.0), Vec2::new(0.0, 100.0));
        world.step(1.0 / 60.0);
        assert!(world.angular_velocity(body).unwrap() < 0.0);

        let centered = world.create_body(BodyDesc::circle(Vec2::new(100.0, 0.0), 10.0, 1.0));
        world.apply_force(centered, Vec2::new(100.0, 0.0), Vec2::new(0.0, 100.0));
        world.step(1.0 / 60.0);
        assert_eq!(world.angular_velocity(centered), Some(0.0));
    }

    #[test]
    fn test_overlap_reported_every_step() {
        let mut world = ArcadePhysics::new();
        let a = world.create_body(BodyDesc::rectangle(Vec2::ZERO, 100.0, 100.0, 0.0));
        let b = world.create_body(BodyDesc::rectangle(Vec2::new(60.0, 0.0), 100.0, 100.0, 0.0));
        // Massless bodies never move, so the overlap is sustained
        for _ in 0..5 {
            assert_eq!(world.step(1.0 / 60.0), vec![(a, b)]);
        }
    }

    #[test]
    fn test_contact_pushes_apart() {
        let mut world = ArcadePhysics::new();
        let a = world.create_body(
            BodyDesc::circle(Vec2::ZERO, 10.0, 1.0).with_velocity(Vec2::new(100.0, 0.0)),
        );
        let b = world.create_body(BodyDesc::circle(Vec2::new(19.0, 0.0), 10.0, 1.0));
        let pairs = world.step(1.0 / 60.0);
        assert_eq!(pairs.len(), 1);
        let va = world.body(a).unwrap().velocity;
        let vb = world.body(b).unwrap().velocity;
        assert!(vb.x > 0.0);
        assert!(va.x < 100.0);
    }

    #[test]
    fn test_remove_body() {
        let mut world = ArcadePhysics::new();
        let body = world.create_body(BodyDesc::circle(Vec2::ZERO, 1.0, 1.0));
        assert!(world.contains(body));
        assert!(world.remove_body(body));
        assert!(!world.remove_body(body));
        assert!(world.body(body).is_none());
        assert!(world.vertices(body).is_empty());
        assert!(world.is_empty());
    }
}
