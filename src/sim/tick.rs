//! Frame orchestration
//!
//! `tick` runs once per render frame with a fixed stage order. Collisions do
//! not go through it: the physics runner calls `on_collision` for every
//! overlapping pair of every step, independently of render frames.

use super::collision::resolve_collision;
use super::debug::wireframe_loop;
use super::lifecycle::{health_loop, projectile_loop};
use super::player::player_loop;
use super::starfield::StarParams;
use super::state::{Engines, GameState};
use super::sync::{placement_loop, position_loop};
use super::ui::ui_loop;
use super::viewport::viewport_loop;
use crate::error::SimError;
use crate::input::FrameInput;
use crate::physics::BodyHandle;

/// Advance the game by one render frame.
///
/// The first failing stage aborts the rest of the frame.
pub fn tick(state: &mut GameState, engines: &mut Engines<'_>, input: &FrameInput) -> Result<(), SimError> {
    let now = input.now_ms;

    // Forces for the next physics step
    player_loop(state, engines, input)?;

    // Removals before anything reads handles
    projectile_loop(state, engines, now);
    health_loop(state, engines);

    position_loop(state, &*engines.physics)?;
    viewport_loop(state, input);

    let params = StarParams {
        chance: state.tuning.star_chance,
        buffer: state.tuning.starfield_buffer,
    };
    state
        .far_stars
        .update(&state.viewport, &mut *engines.renderer, &mut state.rng, params)?;
    state
        .near_stars
        .update(&state.viewport, &mut *engines.renderer, &mut state.rng, params)?;

    ui_loop(state, engines, input);

    // Present
    placement_loop(state, &mut *engines.renderer);
    wireframe_loop(state, engines);
    engines.renderer.present();

    Ok(())
}

/// Physics collision callback: one call per overlapping pair per step
pub fn on_collision(state: &mut GameState, engines: &mut Engines<'_>, body_a: BodyHandle, body_b: BodyHandle, now: f64) {
    resolve_collision(state, engines, body_a, body_b, now);
}
