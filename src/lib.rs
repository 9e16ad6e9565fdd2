//! Catfish in Space - A 2D space-combat browser game
//!
//! Core modules:
//! - `sim`: Per-frame simulation (entities, collisions, starfield, player control)
//! - `physics`: Physics engine adapter and the built-in arcade engine
//! - `renderer`: Display list adapter and the browser canvas presenter
//! - `audio`: Sound effect adapter and the Web Audio synthesizer
//! - `settings`: Persisted preferences and data-driven tuning
//! - `game`: Driver tying the two clocks (physics step, render tick) together

pub mod audio;
pub mod error;
pub mod game;
pub mod input;
pub mod physics;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use game::Game;
pub use settings::{Settings, Tuning};

use std::f32::consts::{PI, TAU};

/// Game configuration constants
pub mod consts {
    /// Fixed physics timestep (60 Hz)
    pub const PHYSICS_DT: f32 = 1.0 / 60.0;
    /// Maximum physics substeps per render frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Minimum interval between damage applications for one entity pair (ms)
    pub const COLLISION_COOLDOWN_MS: f64 = 250.0;
    /// Projectiles are removed once this old (ms)
    pub const PROJECTILE_EXPIRATION_MS: f64 = 10_000.0;
    /// Minimum interval between two primary-fire shots (ms)
    pub const PRIMARY_FIRE_BUFFER_MS: f64 = 250.0;

    /// Damage dealt by the impacting side, per collision type
    pub const DAMAGE_FROM_PLAYER: i32 = 50;
    pub const DAMAGE_FROM_PROJECTILE: i32 = 10;
    pub const DAMAGE_FROM_BODY: i32 = 20;

    /// Starting health values
    pub const PLAYER_HEALTH: i32 = 100;
    pub const RECTANGLE_HEALTH: i32 = 200;
    pub const PROJECTILE_HEALTH: i32 = 1;

    /// Ship thrusters (force units: mass * px/s²)
    pub const STRAIGHT_THRUSTER_FORCE: f32 = 4000.0;
    pub const SIDE_THRUSTER_FORCE: f32 = 2000.0;
    pub const TURN_THRUSTER_FORCE: f32 = 2500.0;
    /// Thruster mount points along the heading, negative = behind center
    pub const STRAFE_THRUSTER_OFFSET: f32 = -2.5;
    pub const TURN_THRUSTER_OFFSET: f32 = -25.0;
    /// Laser speed added along the heading on top of ship velocity (px/s)
    pub const MUZZLE_VELOCITY: f32 = 600.0;

    /// Ship turn PID gains
    pub const PID_KP: f32 = 0.1;
    pub const PID_KI: f32 = 0.1;
    pub const PID_KD: f32 = 0.1;
    pub const PID_DT: f32 = 1.0 / 60.0;

    /// Body sizes and masses
    pub const SHIP_RADIUS: f32 = 24.0;
    pub const SHIP_MASS: f32 = 10.0;
    pub const RECTANGLE_WIDTH: f32 = 300.0;
    pub const RECTANGLE_HEIGHT: f32 = 200.0;
    pub const RECTANGLE_MASS: f32 = 550.0;
    pub const LASER_RADIUS: f32 = 4.0;
    pub const LASER_MASS: f32 = 0.1;

    /// Star field streaming
    pub const STAR_CHANCE: f64 = 1.0 / 10.0;
    /// Extra ring of cells kept around the visible area (stops edge pop-in)
    pub const STARFIELD_BUFFER: i32 = 32;
    pub const PARALLAX_SCALE_NEAR: f32 = 30.0;
    pub const PARALLAX_SCALE_FAR: f32 = 50.0;

    /// Free-look camera speed is min(width, height) / this, per tick
    pub const FREE_LOOK_SPEED_DIVISOR: f32 = 20.0;
}

/// Bound an angle into [0, 2π)
#[inline]
pub fn bound_angle(angle: f32) -> f32 {
    let bound = angle % TAU;
    if bound < 0.0 {
        (TAU + bound) % TAU
    } else {
        bound
    }
}

/// Smallest signed difference `a - b`, wrapped into [-π, π]
#[inline]
pub fn angle_between(a: f32, b: f32) -> f32 {
    let diff = a - b;
    if diff > PI {
        diff - TAU
    } else if diff < -PI {
        diff + TAU
    } else {
        diff
    }
}
