//! Player control loop
//!
//! W/S thrust along the heading, A/D strafe from a point behind the center
//! (which also yaws the ship), the pointer steers through the turn PID and
//! the primary button fires.

use glam::Vec2;

use super::pid::{PidConfig, aim_error, next_state};
use super::spawn::spawn_laser_bullet;
use super::state::{Engines, GameState};
use crate::audio::{SoundEffect, spatial_pan};
use crate::consts::SHIP_RADIUS;
use crate::error::SimError;
use crate::input::{FrameInput, KeyCode};

/// Thrust forces for one tick, in world space
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Thrust {
    /// Applied at the center
    pub straight: Vec2,
    /// Applied behind the center
    pub strafe: Vec2,
}

impl Thrust {
    pub fn is_active(&self) -> bool {
        self.straight != Vec2::ZERO || self.strafe != Vec2::ZERO
    }
}

/// Forces requested by the held movement keys for a ship facing `angle`
pub fn thrust_from_keys(input: &FrameInput, angle: f32, straight_force: f32, side_force: f32) -> Thrust {
    let heading = Vec2::from_angle(angle);
    let forward = input.keyboard.direction(KeyCode::S, KeyCode::W).sign();
    let side = input.keyboard.direction(KeyCode::A, KeyCode::D).sign();
    Thrust {
        straight: heading * forward * straight_force,
        strafe: heading.perp() * side * side_force,
    }
}

/// Clear the player and raise game over
fn game_over(state: &mut GameState, engines: &mut Engines<'_>) {
    state.player.detach_ship();
    state.match_state.game_over = true;
    engines.audio.set_thruster(None);
    log::info!("player ship lost: game over");
}

pub fn player_loop(state: &mut GameState, engines: &mut Engines<'_>, input: &FrameInput) -> Result<(), SimError> {
    let Some(ship) = state.player.ship else {
        return Ok(());
    };
    // The ship's body must still resolve to the ship's entity
    if state.entity_for_body(ship.body) != Some(ship.entity) || state.player_element().is_none() {
        game_over(state, engines);
        return Ok(());
    }
    let body = engines.physics.body(ship.body).ok_or(SimError::MissingBody {
        entity: ship.entity,
        body: ship.body,
    })?;
    let tuning = &state.tuning;
    let heading = Vec2::from_angle(body.angle);

    // Movement
    let thrust = thrust_from_keys(input, body.angle, tuning.straight_thruster_force, tuning.side_thruster_force);
    if thrust.straight != Vec2::ZERO {
        engines.physics.apply_force(ship.body, body.position, thrust.straight);
    }
    if thrust.strafe != Vec2::ZERO {
        let mount = body.position + heading * tuning.strafe_thruster_offset;
        engines.physics.apply_force(ship.body, mount, thrust.strafe);
    }
    if thrust.is_active() {
        let pan = spatial_pan(body.position, &state.viewport);
        if !state.player.thruster_active {
            engines.audio.play(SoundEffect::RocketThrust, pan);
        }
        engines.audio.set_thruster(Some(pan));
        state.player.thruster_active = true;
    } else if state.player.thruster_active {
        engines.audio.set_thruster(None);
        state.player.thruster_active = false;
    }

    // Steering: push the tail sideways so the nose swings toward the pointer
    let ship_on_screen = state.viewport.to_screen(body.position);
    let error = aim_error(body.angle, ship_on_screen, input.mouse.position);
    state.player.pid = next_state(&state.player.pid, error, &PidConfig::from_tuning(&state.tuning));
    let turn = -heading.perp() * state.player.pid.output * state.tuning.turn_thruster_force;
    let tail = body.position + heading * state.tuning.turn_thruster_offset;
    engines.physics.apply_force(ship.body, tail, turn);

    // Primary fire
    let now = input.now_ms;
    if input.mouse.primary && now > state.player.primary_fire_ms + state.tuning.primary_fire_buffer_ms {
        let ship_width = state
            .player_element()
            .and_then(|e| engines.renderer.bounds(e.display.render))
            .map_or(SHIP_RADIUS * 2.0, |d| d.width);
        spawn_laser_bullet(state, engines, &body, ship_width, now);
        state.player.primary_fire_ms = now;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PRIMARY_FIRE_BUFFER_MS;
    use crate::physics::PhysicsWorld;
    use crate::sim::CollisionKind;
    use crate::sim::lifecycle::destroy_element;
    use crate::sim::spawn::spawn_player;
    use crate::sim::testing::Harness;

    fn projectiles(h: &Harness) -> usize {
        h.state
            .entities
            .values()
            .filter(|e| e.collision_kind() == Some(CollisionKind::Projectile))
            .count()
    }

    #[test]
    fn test_thrust_directions() {
        let mut input = FrameInput::default();
        assert!(!thrust_from_keys(&input, 0.0, 10.0, 5.0).is_active());

        input.keyboard.key_down(KeyCode::W);
        input.keyboard.key_down(KeyCode::D);
        let thrust = thrust_from_keys(&input, 0.0, 10.0, 5.0);
        assert_eq!(thrust.straight, Vec2::new(10.0, 0.0));
        assert!((thrust.strafe - Vec2::new(0.0, 5.0)).length() < 1e-6);

        // Opposing keys cancel
        input.keyboard.key_down(KeyCode::S);
        let thrust = thrust_from_keys(&input, 0.0, 10.0, 5.0);
        assert_eq!(thrust.straight, Vec2::ZERO);
    }

    #[test]
    fn test_forward_thrust_moves_ship() {
        let mut h = Harness::new();
        let (state, mut engines) = h.split();
        spawn_player(state, &mut engines, Vec2::ZERO, 0.0);
        let body = state.player.ship.unwrap().body;

        let mut input = FrameInput::default();
        // Pointer dead ahead so steering stays quiet
        input.mouse.position = state.viewport.to_screen(Vec2::new(500.0, 0.0));
        input.keyboard.key_down(KeyCode::W);
        player_loop(state, &mut engines, &input).unwrap();
        assert!(state.player.thruster_active);

        h.physics.step(1.0 / 60.0);
        assert!(h.physics.body(body).unwrap().velocity.x > 0.0);
        assert!(h.audio.thruster.is_some());
    }

    #[test]
    fn test_thruster_sound_stops() {
        let mut h = Harness::new();
        let (state, mut engines) = h.split();
        spawn_player(state, &mut engines, Vec2::ZERO, 0.0);

        let mut input = FrameInput::default();
        input.keyboard.key_down(KeyCode::A);
        player_loop(state, &mut engines, &input).unwrap();
        // Held across frames: one ignition burst, then the loop
        player_loop(state, &mut engines, &input).unwrap();
        input.keyboard.key_up(KeyCode::A);
        player_loop(state, &mut engines, &input).unwrap();
        assert!(!state.player.thruster_active);
        assert!(h.audio.thruster.is_none());
        assert_eq!(h.audio.played, vec![SoundEffect::RocketThrust]);
    }

    #[test]
    fn test_steers_toward_pointer() {
        let mut h = Harness::new();
        let (state, mut engines) = h.split();
        spawn_player(state, &mut engines, Vec2::ZERO, 0.0);
        let body = state.player.ship.unwrap().body;

        // Pointer straight below the ship on screen (+y): positive error
        let mut input = FrameInput::default();
        input.mouse.position = state.viewport.to_screen(Vec2::new(0.0, 300.0));
        player_loop(state, &mut engines, &input).unwrap();
        assert!(state.player.pid.error > 0.0);

        h.physics.step(1.0 / 60.0);
        assert!(h.physics.angular_velocity(body).unwrap() > 0.0);
    }

    #[test]
    fn test_fire_cadence() {
        let mut h = Harness::new();
        let (state, mut engines) = h.split();
        spawn_player(state, &mut engines, Vec2::ZERO, 0.0);

        let mut input = FrameInput::default();
        input.mouse.primary = true;
        let mut last_fire = state.player.primary_fire_ms;
        // 1s of held fire at 60 Hz starting at t = 1000ms
        for frame in 0..60 {
            input.now_ms = 1000.0 + frame as f64 * 1000.0 / 60.0;
            player_loop(state, &mut engines, &input).unwrap();
            assert!(state.player.primary_fire_ms >= last_fire);
            last_fire = state.player.primary_fire_ms;
        }

        // Shots need strictly more than the buffer between them
        let shots = 1 + (1000.0 / (PRIMARY_FIRE_BUFFER_MS + 1000.0 / 60.0)) as usize;
        assert_eq!(projectiles(&h), shots);
        assert_eq!(
            h.audio.played.iter().filter(|e| **e == SoundEffect::LaserBullet).count(),
            shots
        );
    }

    #[test]
    fn test_missing_player_is_game_over() {
        let mut h = Harness::new();
        let (state, mut engines) = h.split();
        let id = spawn_player(state, &mut engines, Vec2::ZERO, 0.0);
        destroy_element(state, &mut engines, id);

        player_loop(state, &mut engines, &FrameInput::default()).unwrap();
        assert!(state.match_state.game_over);
        assert!(state.player.ship.is_none());

        // Nothing further runs without a ship
        player_loop(state, &mut engines, &FrameInput::default()).unwrap();
        assert!(state.match_state.game_over);
    }
}
