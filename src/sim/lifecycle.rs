//! Entity removal: depleted health and expired projectiles

use super::entity::{CollisionKind, EntityId, GameElement};
use super::state::{Engines, GameState};

/// Remove an entity everywhere at once: display node, physics body, body
/// index, cooldown entries and the tracking map. Returns the removed element.
pub fn destroy_element(
    state: &mut GameState,
    engines: &mut Engines<'_>,
    id: EntityId,
) -> Option<GameElement> {
    let element = state.entities.remove(&id)?;
    engines.renderer.destroy(element.display.render);
    if let Some(binding) = element.physics() {
        engines.physics.remove_body(binding.body);
        state.bodies.remove(binding.body);
    }
    state.cooldowns.purge(id);
    Some(element)
}

/// Destroy every entity whose health reached zero
pub fn health_loop(state: &mut GameState, engines: &mut Engines<'_>) {
    let dead: Vec<EntityId> = state
        .entities
        .values()
        .filter(|e| e.is_destroyed())
        .map(|e| e.id)
        .collect();

    for id in dead {
        if let Some(element) = destroy_element(state, engines, id) {
            log::debug!(
                "entity {} ({:?}) destroyed: health depleted",
                id,
                element.collision_kind()
            );
        }
    }
}

/// Destroy projectiles older than the configured lifetime
pub fn projectile_loop(state: &mut GameState, engines: &mut Engines<'_>, now: f64) {
    let lifetime = state.tuning.projectile_expiration_ms;
    let expired: Vec<EntityId> = state
        .entities
        .values()
        .filter(|e| e.collision_kind() == Some(CollisionKind::Projectile))
        .filter(|e| now - e.created_at >= lifetime)
        .map(|e| e.id)
        .collect();

    for id in expired {
        destroy_element(state, engines, id);
        log::debug!("projectile {} expired", id);
    }
}
