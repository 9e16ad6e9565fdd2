//! Per-frame simulation
//!
//! All gameplay logic lives here. Stages only reach the outside world
//! through the adapter traits in [`Engines`]:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No concrete rendering, physics or audio types

pub mod collision;
pub mod debug;
pub mod entity;
pub mod lifecycle;
pub mod pid;
pub mod player;
pub mod spawn;
pub mod starfield;
pub mod state;
pub mod sync;
pub mod tick;
pub mod ui;
pub mod viewport;

pub use collision::{CooldownTable, damage_for, resolve_collision};
pub use entity::{
    CollisionKind, Coordinate, Dimension, DisplayElement, ElementKind, EntityId, GameElement, GridRect,
    PhysicsBinding, Velocity,
};
pub use pid::{PidConfig, PidState, next_state};
pub use starfield::{StarField, StarParams};
pub use state::{Engines, GameState, MatchState, PlayerState, ShipRef, ViewportState};
pub use tick::{on_collision, tick};
pub use viewport::KeyClick;

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for stage tests

    use glam::Vec2;

    use super::entity::{CollisionKind, EntityId};
    use super::spawn::push_physics_element;
    use super::state::{Engines, GameState};
    use super::Dimension;
    use crate::audio::{AudioSink, SoundEffect};
    use crate::physics::{ArcadePhysics, BodyDesc, BodyHandle};
    use crate::renderer::{DisplayList, Primitive};
    use crate::settings::Tuning;

    /// Audio sink that remembers what it was asked to play
    #[derive(Debug, Default)]
    pub struct RecordingAudio {
        pub played: Vec<SoundEffect>,
        pub thruster: Option<Vec2>,
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, effect: SoundEffect, _pan: Vec2) {
            self.played.push(effect);
        }

        fn set_thruster(&mut self, pan: Option<Vec2>) {
            self.thruster = pan;
        }
    }

    pub struct Harness {
        pub state: GameState,
        pub physics: ArcadePhysics,
        pub renderer: DisplayList,
        pub audio: RecordingAudio,
        /// Creation time given to `spawn`
        pub now: f64,
    }

    impl Harness {
        pub fn new() -> Self {
            Self {
                state: GameState::new(7, Tuning::default(), Dimension::new(800.0, 600.0)),
                physics: ArcadePhysics::new(),
                renderer: DisplayList::new(),
                audio: RecordingAudio::default(),
                now: 0.0,
            }
        }

        pub fn split(&mut self) -> (&mut GameState, Engines<'_>) {
            (
                &mut self.state,
                Engines {
                    physics: &mut self.physics,
                    renderer: &mut self.renderer,
                    audio: &mut self.audio,
                },
            )
        }

        /// Small circular entity with the given collision kind and health
        pub fn spawn(&mut self, kind: CollisionKind, health: Option<i32>, position: Vec2) -> (EntityId, BodyHandle) {
            let now = self.now;
            let (state, mut engines) = self.split();
            push_physics_element(
                state,
                &mut engines,
                BodyDesc::circle(position, 10.0, 1.0),
                kind,
                Primitive::Circle {
                    radius: 10.0,
                    color: 0xffffff,
                    alpha: 1.0,
                },
                health,
                now,
            )
        }
    }
}
