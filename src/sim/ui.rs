//! Match UI: "GAME OVER" banner and click-to-restart

use super::lifecycle::destroy_element;
use super::spawn::{push_display_element, restart_match};
use super::state::{Engines, GameState};
use crate::input::FrameInput;
use crate::renderer::{Layer, Primitive};

pub const GAME_OVER_TEXT: &str = "GAME OVER";
const GAME_OVER_SIZE: f32 = 64.0;

pub fn ui_loop(state: &mut GameState, engines: &mut Engines<'_>, input: &FrameInput) {
    let clicked = state.restart_click.update(input.mouse.primary);
    if !state.match_state.game_over {
        return;
    }

    if clicked {
        if let Some(banner) = state.match_state.banner.take() {
            destroy_element(state, engines, banner);
        }
        restart_match(state, engines, input.now_ms);
        return;
    }

    let banner = match state.match_state.banner {
        Some(id) => id,
        None => {
            let origin = state.viewport.coordinate;
            let id = push_display_element(
                state,
                engines,
                Primitive::Text {
                    content: GAME_OVER_TEXT.to_string(),
                    size: GAME_OVER_SIZE,
                },
                Layer::Overlay,
                origin,
                input.now_ms,
            );
            state.match_state.banner = Some(id);
            id
        }
    };

    // Keep it centered as the viewport moves
    let Some(element) = state.entities.get_mut(&banner) else {
        return;
    };
    if let Some(size) = engines.renderer.bounds(element.display.render) {
        element.display.coordinate =
            state.viewport.coordinate + (state.viewport.dimension.as_vec2() - size.as_vec2()) / 2.0;
    }
}
