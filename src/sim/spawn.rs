//! Spawn factories and match setup
//!
//! Every entity enters the world in one step: physics body, display node
//! and tracking entry together.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::entity::{
    CollisionKind, Coordinate, DisplayElement, ElementKind, EntityId, GameElement, PhysicsBinding,
};
use super::lifecycle::destroy_element;
use super::state::{Engines, GameState, ShipRef};
use crate::audio::{SoundEffect, spatial_pan};
use crate::consts::*;
use crate::physics::{BodyDesc, BodyHandle, BodyView};
use crate::renderer::{Layer, Primitive};

/// Obstacles placed at the start of every match
pub const RECTANGLE_POSITIONS: [Vec2; 3] = [
    Vec2::new(600.0, -100.0),
    Vec2::new(-600.0, 100.0),
    Vec2::new(-1000.0, 100.0),
];

const RECTANGLE_COLOR: u32 = 0xb03a2e;
const LASER_COLOR: u32 = 0xff3355;
/// Gap between the ship's nose and a fresh laser bullet
const LASER_SPAWN_GAP: f32 = 5.0;

/// Create a physics-backed entity on the foreground layer
pub fn push_physics_element(
    state: &mut GameState,
    engines: &mut Engines<'_>,
    desc: BodyDesc,
    collision: CollisionKind,
    primitive: Primitive,
    health: Option<i32>,
    now: f64,
) -> (EntityId, BodyHandle) {
    let body = engines.physics.create_body(desc);
    let render = engines.renderer.create(primitive, Layer::Foreground);
    let id = state.allocate_id();
    state.insert(GameElement {
        id,
        created_at: now,
        health,
        display: DisplayElement {
            coordinate: desc.position,
            rotation: crate::bound_angle(desc.angle),
            render,
        },
        kind: ElementKind::Physics(PhysicsBinding { collision, body }),
    });
    (id, body)
}

/// Create a display-only entity (no body, never collides)
pub fn push_display_element(
    state: &mut GameState,
    engines: &mut Engines<'_>,
    primitive: Primitive,
    layer: Layer,
    coordinate: Coordinate,
    now: f64,
) -> EntityId {
    let render = engines.renderer.create(primitive, layer);
    let id = state.allocate_id();
    state.insert(GameElement {
        id,
        created_at: now,
        health: None,
        display: DisplayElement {
            coordinate,
            rotation: 0.0,
            render,
        },
        kind: ElementKind::DisplayOnly,
    });
    id
}

pub fn spawn_player(state: &mut GameState, engines: &mut Engines<'_>, position: Vec2, now: f64) -> EntityId {
    let (entity, body) = push_physics_element(
        state,
        engines,
        BodyDesc::circle(position, SHIP_RADIUS, SHIP_MASS),
        CollisionKind::Player,
        Primitive::Sprite {
            texture: "spaceship",
            width: SHIP_RADIUS * 2.0,
            height: SHIP_RADIUS * 2.0,
        },
        Some(PLAYER_HEALTH),
        now,
    );
    state.player.ship = Some(ShipRef { entity, body });
    log::info!("player ship {} spawned at {}", entity, position);
    entity
}

/// Obstacle with a random starting angle
pub fn spawn_rectangle(state: &mut GameState, engines: &mut Engines<'_>, position: Vec2, now: f64) -> EntityId {
    let angle = state.rng.random::<f32>() * TAU;
    let (id, _) = push_physics_element(
        state,
        engines,
        BodyDesc::rectangle(position, RECTANGLE_WIDTH, RECTANGLE_HEIGHT, RECTANGLE_MASS).with_angle(angle),
        CollisionKind::Body,
        Primitive::Rectangle {
            width: RECTANGLE_WIDTH,
            height: RECTANGLE_HEIGHT,
            color: RECTANGLE_COLOR,
        },
        Some(RECTANGLE_HEALTH),
        now,
    );
    id
}

/// Laser bullet just in front of the ship's nose, carrying the ship's velocity
/// plus the muzzle velocity along the heading
pub fn spawn_laser_bullet(
    state: &mut GameState,
    engines: &mut Engines<'_>,
    ship: &BodyView,
    ship_width: f32,
    now: f64,
) -> EntityId {
    let heading = Vec2::from_angle(ship.angle);
    let position = ship.position + heading * (ship_width / 2.0 + LASER_SPAWN_GAP);
    let velocity = ship.velocity + heading * state.tuning.muzzle_velocity;

    let (id, _) = push_physics_element(
        state,
        engines,
        BodyDesc::circle(position, LASER_RADIUS, LASER_MASS)
            .with_angle(ship.angle)
            .with_velocity(velocity),
        CollisionKind::Projectile,
        Primitive::Circle {
            radius: LASER_RADIUS,
            color: LASER_COLOR,
            alpha: 1.0,
        },
        Some(PROJECTILE_HEALTH),
        now,
    );
    engines
        .audio
        .play(SoundEffect::LaserBullet, spatial_pan(position, &state.viewport));
    id
}

/// Player plus the starting obstacles, camera centered on the player
pub fn setup_world(state: &mut GameState, engines: &mut Engines<'_>, now: f64) {
    spawn_player(state, engines, Vec2::ZERO, now);
    for position in RECTANGLE_POSITIONS {
        spawn_rectangle(state, engines, position, now);
    }
    state.viewport.coordinate = -state.viewport.dimension.half();
}

/// Tear down every tracked entity and start a fresh match
pub fn restart_match(state: &mut GameState, engines: &mut Engines<'_>, now: f64) {
    let ids: Vec<EntityId> = state.entities.keys().copied().collect();
    for id in ids {
        destroy_element(state, engines, id);
    }
    state.cooldowns.clear();
    state.player.detach_ship();
    state.match_state = Default::default();
    engines.audio.set_thruster(None);

    log::info!("match restarted");
    setup_world(state, engines, now);
}
