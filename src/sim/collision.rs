//! Collision cooldowns and damage
//!
//! The physics engine reports a pair every step while two bodies overlap.
//! A hit only counts once per cooldown window per unordered pair.

use std::collections::HashMap;

use super::entity::{CollisionKind, EntityId};
use super::state::{Engines, GameState};
use crate::audio::{SoundEffect, spatial_pan};
use crate::physics::BodyHandle;
use crate::settings::Tuning;

/// Last collision time per unordered entity pair
#[derive(Debug, Clone, Default)]
pub struct CooldownTable {
    last: HashMap<(EntityId, EntityId), f64>,
}

impl CooldownTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical key, so A-B and B-A share one entry
    pub fn key(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
        if a <= b { (a, b) } else { (b, a) }
    }

    pub fn last_collision(&self, a: EntityId, b: EntityId) -> Option<f64> {
        self.last.get(&Self::key(a, b)).copied()
    }

    /// Record a collision at `now` unless the pair is still cooling down.
    /// Returns whether the collision counts.
    pub fn try_record(&mut self, a: EntityId, b: EntityId, now: f64, period: f64) -> bool {
        if self.last_collision(a, b).is_some_and(|last| now - last < period) {
            return false;
        }
        self.last.insert(Self::key(a, b), now);
        true
    }

    /// Drop every entry involving `id`
    pub fn purge(&mut self, id: EntityId) {
        self.last.retain(|&(a, b), _| a != id && b != id);
    }

    pub fn clear(&mut self) {
        self.last.clear();
    }

    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}

/// Damage dealt to the other side by an impacting entity of `kind`
pub fn damage_for(kind: CollisionKind, tuning: &Tuning) -> i32 {
    match kind {
        CollisionKind::Player => tuning.damage_from_player,
        CollisionKind::Projectile => tuning.damage_from_projectile,
        CollisionKind::Body => tuning.damage_from_body,
    }
}

/// Handle one raw collision-pair event from the physics engine.
///
/// Safe to call any number of times between ticks.
pub fn resolve_collision(
    state: &mut GameState,
    engines: &mut Engines<'_>,
    body_a: BodyHandle,
    body_b: BodyHandle,
    now: f64,
) {
    let (Some(id_a), Some(id_b)) = (state.entity_for_body(body_a), state.entity_for_body(body_b))
    else {
        log::debug!("collision with untracked body ignored");
        return;
    };
    if id_a == id_b {
        return;
    }

    let (Some(a), Some(b)) = (state.entities.get(&id_a), state.entities.get(&id_b)) else {
        return;
    };
    let (Some(kind_a), Some(kind_b)) = (a.collision_kind(), b.collision_kind()) else {
        return;
    };
    let midpoint = (a.display.coordinate + b.display.coordinate) / 2.0;

    if !state
        .cooldowns
        .try_record(id_a, id_b, now, state.tuning.collision_cooldown_ms)
    {
        return;
    }

    let damage_to_b = damage_for(kind_a, &state.tuning);
    let damage_to_a = damage_for(kind_b, &state.tuning);
    if let Some(a) = state.entities.get_mut(&id_a) {
        a.apply_damage(damage_to_a);
    }
    if let Some(b) = state.entities.get_mut(&id_b) {
        b.apply_damage(damage_to_b);
    }
    log::debug!(
        "collision {} ({:?}) <-> {} ({:?}) at {:.0}ms: {} / {} damage",
        id_a,
        kind_a,
        id_b,
        kind_b,
        now,
        damage_to_a,
        damage_to_b
    );

    let effect = if kind_a == CollisionKind::Projectile || kind_b == CollisionKind::Projectile {
        SoundEffect::LaserBulletImpact
    } else {
        SoundEffect::HardCollision
    };
    engines
        .audio
        .play(effect, spatial_pan(midpoint, &state.viewport));
}
