//! Overlap tests between posed shapes
//!
//! Circles and oriented rectangles only. Rectangles are separated with the
//! separating axis test over both boxes' local axes.

use glam::Vec2;

use super::Shape;

/// Result of an overlap check
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Whether the shapes overlap
    pub hit: bool,
    /// Unit normal pointing from the first shape toward the second
    pub normal: Vec2,
    /// Overlap depth along `normal`
    pub penetration: f32,
}

impl Contact {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// A shape placed in the world
#[derive(Debug, Clone, Copy)]
pub struct Posed {
    pub shape: Shape,
    pub position: Vec2,
    pub angle: f32,
}

/// Check overlap between two posed shapes
pub fn shape_contact(a: &Posed, b: &Posed) -> Contact {
    match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle(a.position, ra, b.position, rb)
        }
        (Shape::Circle { radius }, Shape::Rectangle { width, height }) => circle_rect(
            a.position,
            radius,
            b.position,
            b.angle,
            Vec2::new(width, height) * 0.5,
        ),
        (Shape::Rectangle { width, height }, Shape::Circle { radius }) => circle_rect(
            b.position,
            radius,
            a.position,
            a.angle,
            Vec2::new(width, height) * 0.5,
        )
        .flipped(),
        (
            Shape::Rectangle {
                width: wa,
                height: ha,
            },
            Shape::Rectangle {
                width: wb,
                height: hb,
            },
        ) => rect_rect(
            a.position,
            a.angle,
            Vec2::new(wa, ha) * 0.5,
            b.position,
            b.angle,
            Vec2::new(wb, hb) * 0.5,
        ),
    }
}

/// World-space outline of a posed shape
pub fn outline(posed: &Posed) -> Vec<Vec2> {
    let rotation = Vec2::from_angle(posed.angle);
    match posed.shape {
        Shape::Circle { radius } => (0..16)
            .map(|i| {
                let theta = i as f32 / 16.0 * std::f32::consts::TAU;
                posed.position + Vec2::from_angle(theta) * radius
            })
            .collect(),
        Shape::Rectangle { width, height } => {
            let half = Vec2::new(width, height) * 0.5;
            [
                Vec2::new(-half.x, -half.y),
                Vec2::new(half.x, -half.y),
                Vec2::new(half.x, half.y),
                Vec2::new(-half.x, half.y),
            ]
            .into_iter()
            .map(|corner| posed.position + rotation.rotate(corner))
            .collect()
        }
    }
}

fn circle_circle(pa: Vec2, ra: f32, pb: Vec2, rb: f32) -> Contact {
    let delta = pb - pa;
    let dist = delta.length();
    let reach = ra + rb;
    if dist >= reach {
        return Contact::miss();
    }
    let normal = if dist > 1e-6 { delta / dist } else { Vec2::X };
    Contact {
        hit: true,
        normal,
        penetration: reach - dist,
    }
}

/// Circle first, rectangle second
fn circle_rect(center: Vec2, radius: f32, rect_pos: Vec2, rect_angle: f32, half: Vec2) -> Contact {
    let to_local = Vec2::from_angle(-rect_angle);
    let to_world = Vec2::from_angle(rect_angle);
    let local = to_local.rotate(center - rect_pos);

    let closest = local.clamp(-half, half);
    let diff = local - closest;
    let dist_sq = diff.length_squared();

    if dist_sq > 1e-12 {
        if dist_sq >= radius * radius {
            return Contact::miss();
        }
        let dist = dist_sq.sqrt();
        return Contact {
            hit: true,
            normal: to_world.rotate(-diff / dist),
            penetration: radius - dist,
        };
    }

    // Center is inside the box: push out along the shallower axis
    let depth_x = half.x - local.x.abs();
    let depth_y = half.y - local.y.abs();
    let (normal_local, depth) = if depth_x < depth_y {
        (Vec2::new(-local.x.signum(), 0.0), depth_x)
    } else {
        (Vec2::new(0.0, -local.y.signum()), depth_y)
    };
    Contact {
        hit: true,
        normal: to_world.rotate(normal_local),
        penetration: radius + depth,
    }
}

fn rect_rect(pa: Vec2, angle_a: f32, half_a: Vec2, pb: Vec2, angle_b: f32, half_b: Vec2) -> Contact {
    let axes_a = [Vec2::from_angle(angle_a), Vec2::from_angle(angle_a).perp()];
    let axes_b = [Vec2::from_angle(angle_b), Vec2::from_angle(angle_b).perp()];
    let delta = pb - pa;

    let mut best = Contact {
        hit: true,
        normal: Vec2::X,
        penetration: f32::MAX,
    };

    for axis in axes_a.iter().chain(axes_b.iter()) {
        let extent_a = half_a.x * axes_a[0].dot(*axis).abs() + half_a.y * axes_a[1].dot(*axis).abs();
        let extent_b = half_b.x * axes_b[0].dot(*axis).abs() + half_b.y * axes_b[1].dot(*axis).abs();
        let distance = delta.dot(*axis);
        let overlap = extent_a + extent_b - distance.abs();
        if overlap <= 0.0 {
            return Contact::miss();
        }
        if overlap < best.penetration {
            best.penetration = overlap;
            best.normal = if distance < 0.0 { -*axis } else { *axis };
        }
    }

    best
}
