//! Camera: locked on the player, or free-look with I/J/K/L. V toggles.

use glam::Vec2;

use super::state::GameState;
use crate::input::{Direction, FrameInput, KeyCode};

/// Fires once per press, on release
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyClick {
    was_active: bool,
}

impl KeyClick {
    /// Feed the current key state; true on the active -> inactive transition
    pub fn update(&mut self, active: bool) -> bool {
        let clicked = self.was_active && !active;
        self.was_active = active;
        clicked
    }
}

/// Free-look displacement for one tick
pub fn free_look_offset(horizontal: Direction, vertical: Direction, width: f32, height: f32, divisor: f32) -> Vec2 {
    let speed = width.min(height) / divisor;
    if horizontal != Direction::Neutral && vertical != Direction::Neutral {
        // Diagonal: split the speed along the screen diagonal
        let diagonal = height.atan2(width);
        Vec2::new(
            horizontal.sign() * speed * diagonal.cos(),
            vertical.sign() * speed * diagonal.sin(),
        )
    } else {
        Vec2::new(horizontal.sign() * speed, vertical.sign() * speed)
    }
}

pub fn viewport_loop(state: &mut GameState, input: &FrameInput) {
    if state.view_key.update(input.keyboard.is_active(KeyCode::V)) {
        state.player.viewport_locked = !state.player.viewport_locked;
        log::debug!("viewport lock: {}", state.player.viewport_locked);
    }

    let dimension = state.viewport.dimension;
    if state.player.viewport_locked {
        if let Some(coordinate) = state.player_element().map(|p| p.display.coordinate) {
            state.viewport.coordinate = coordinate - dimension.half();
        }
    } else {
        state.viewport.coordinate += free_look_offset(
            input.keyboard.direction(KeyCode::J, KeyCode::L),
            input.keyboard.direction(KeyCode::I, KeyCode::K),
            dimension.width,
            dimension.height,
            state.tuning.free_look_speed_divisor,
        );
    }
}
