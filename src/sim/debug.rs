//! Debug wireframes of physics bodies

use glam::Vec2;

use super::state::{Engines, GameState};

/// Publish every body outline (viewport-relative) when wireframes are on,
/// or clear them when off
pub fn wireframe_loop(state: &GameState, engines: &mut Engines<'_>) {
    let wireframes: Vec<Vec<Vec2>> = if state.debug_wireframe {
        state
            .entities
            .values()
            .filter_map(|e| e.physics())
            .map(|binding| {
                engines
                    .physics
                    .vertices(binding.body)
                    .into_iter()
                    .map(|v| state.viewport.to_screen(v))
                    .collect()
            })
            .collect()
    } else {
        Vec::new()
    };
    engines.renderer.set_wireframes(wireframes);
}
