//! Physics to entity sync, and entity to display placement

use super::state::GameState;
use crate::bound_angle;
use crate::error::SimError;
use crate::physics::PhysicsWorld;
use crate::renderer::Renderer;

/// Copy each body's position and (bounded) angle into its entity
pub fn position_loop(state: &mut GameState, physics: &dyn PhysicsWorld) -> Result<(), SimError> {
    for element in state.entities.values_mut() {
        let Some(binding) = element.physics() else {
            continue;
        };
        let view = physics.body(binding.body).ok_or(SimError::MissingBody {
            entity: element.id,
            body: binding.body,
        })?;
        element.display.coordinate = view.position;
        element.display.rotation = bound_angle(view.angle);
    }
    Ok(())
}

/// Move every display node to its entity's viewport-relative position
pub fn placement_loop(state: &GameState, renderer: &mut dyn Renderer) {
    for element in state.entities.values() {
        renderer.set_transform(
            element.display.render,
            state.viewport.to_screen(element.display.coordinate),
            element.display.rotation,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::CollisionKind;
    use crate::sim::testing::Harness;
    use glam::Vec2;
    use std::f32::consts::TAU;

    #[test]
    fn test_sync_copies_transform() {
        let mut h = Harness::new();
        let (id, body) = h.spawn(CollisionKind::Body, Some(10), Vec2::ZERO);
        h.physics.set_velocity(body, Vec2::new(60.0, 0.0));
        h.physics.step(1.0);

        position_loop(&mut h.state, &h.physics).unwrap();
        let element = &h.state.entities[&id];
        assert!((element.display.coordinate.x - 60.0).abs() < 1e-4);
        assert!((0.0..TAU).contains(&element.display.rotation));
    }

    #[test]
    fn test_missing_body_is_error() {
        let mut h = Harness::new();
        let (id, body) = h.spawn(CollisionKind::Body, Some(10), Vec2::ZERO);
        h.physics.remove_body(body);

        let err = position_loop(&mut h.state, &h.physics).unwrap_err();
        assert!(matches!(err, SimError::MissingBody { entity, .. } if entity == id));
    }

    #[test]
    fn test_placement_is_viewport_relative() {
        let mut h = Harness::new();
        let (id, _) = h.spawn(CollisionKind::Body, Some(10), Vec2::new(50.0, 20.0));
        h.state.viewport.coordinate = Vec2::new(-100.0, -100.0);

        placement_loop(&h.state, &mut h.renderer);
        let render = h.state.entities[&id].display.render;
        assert_eq!(h.renderer.node(render).unwrap().position, Vec2::new(150.0, 120.0));
    }
}
