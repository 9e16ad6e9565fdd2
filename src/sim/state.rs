//! Simulation state
//!
//! One explicit struct threaded through every stage. Stages mutate it in
//! place; only one stage runs at a time.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use slotmap::SecondaryMap;

use super::collision::CooldownTable;
use super::entity::{Coordinate, Dimension, EntityId, GameElement};
use super::pid::PidState;
use super::starfield::StarField;
use super::viewport::KeyClick;
use crate::audio::AudioSink;
use crate::physics::{BodyHandle, PhysicsWorld};
use crate::renderer::Renderer;
use crate::settings::Tuning;

/// The collaborators a stage may call into
pub struct Engines<'a> {
    pub physics: &'a mut dyn PhysicsWorld,
    pub renderer: &'a mut dyn Renderer,
    pub audio: &'a mut dyn AudioSink,
}

/// Last known handles of the player's ship
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipRef {
    pub entity: EntityId,
    pub body: BodyHandle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// `None` once the ship is gone (game over)
    pub ship: Option<ShipRef>,
    pub pid: PidState,
    pub viewport_locked: bool,
    /// Timestamp (ms) of the last primary-fire shot, never decreases
    pub primary_fire_ms: f64,
    /// Thruster sound currently playing
    pub thruster_active: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            ship: None,
            pid: PidState::default(),
            viewport_locked: true,
            primary_fire_ms: 0.0,
            thruster_active: false,
        }
    }
}

impl PlayerState {
    /// Forget the ship and its controller state. The fire timestamp and
    /// the camera lock survive.
    pub fn detach_ship(&mut self) {
        self.ship = None;
        self.pid = PidState::default();
        self.thruster_active = false;
    }
}

/// Camera
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportState {
    /// World-space top-left of the visible area
    pub coordinate: Coordinate,
    pub dimension: Dimension,
}

impl ViewportState {
    pub fn center(&self) -> Vec2 {
        self.coordinate + self.dimension.half()
    }

    /// World coordinate to viewport-local pixels
    pub fn to_screen(&self, coordinate: Coordinate) -> Vec2 {
        coordinate - self.coordinate
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchState {
    pub game_over: bool,
    /// "GAME OVER" text entity while shown
    pub banner: Option<EntityId>,
}

/// Complete simulation state
pub struct GameState {
    /// Live entities, iterated in id order
    pub entities: BTreeMap<EntityId, GameElement>,
    /// Reverse index from physics body to owning entity
    pub bodies: SecondaryMap<BodyHandle, EntityId>,
    pub player: PlayerState,
    pub viewport: ViewportState,
    pub match_state: MatchState,
    pub near_stars: StarField,
    pub far_stars: StarField,
    pub cooldowns: CooldownTable,
    /// Every random draw in the simulation comes from here
    pub rng: Pcg32,
    pub view_key: KeyClick,
    pub restart_click: KeyClick,
    pub debug_wireframe: bool,
    pub tuning: Tuning,
    next_id: EntityId,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning, dimension: Dimension) -> Self {
        Self {
            entities: BTreeMap::new(),
            bodies: SecondaryMap::new(),
            player: PlayerState::default(),
            viewport: ViewportState {
                coordinate: Vec2::ZERO,
                dimension,
            },
            match_state: MatchState::default(),
            near_stars: StarField::new(tuning.parallax_scale_near),
            far_stars: StarField::new(tuning.parallax_scale_far),
            cooldowns: CooldownTable::new(),
            rng: Pcg32::seed_from_u64(seed),
            view_key: KeyClick::default(),
            restart_click: KeyClick::default(),
            debug_wireframe: false,
            tuning,
            next_id: 1,
        }
    }

    pub fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Track an entity (and index its body, if any)
    pub fn insert(&mut self, element: GameElement) {
        if let Some(binding) = element.physics() {
            self.bodies.insert(binding.body, element.id);
        }
        self.entities.insert(element.id, element);
    }

    pub fn entity_for_body(&self, body: BodyHandle) -> Option<EntityId> {
        self.bodies.get(body).copied()
    }

    /// Player ship element, if the player is alive and still tracked
    pub fn player_element(&self) -> Option<&GameElement> {
        let ship = self.player.ship?;
        self.entities
            .get(&ship.entity)
            .filter(|e| e.physics().is_some_and(|b| b.body == ship.body))
    }
}
