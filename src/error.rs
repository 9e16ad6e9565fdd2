//! Simulation error types
//!
//! Stages propagate these with `?`. An error aborts the rest of the tick it
//! happened in; the game driver logs it and keeps the render ticker alive.

use crate::physics::BodyHandle;
use crate::sim::EntityId;

#[derive(thiserror::Error, Debug)]
pub enum SimError {
    /// A tracked physics element whose body is gone from the physics world.
    #[error("entity {entity} references physics body {body:?} which is no longer in the world")]
    MissingBody { entity: EntityId, body: BodyHandle },

    /// Boundary query on a star field with no stars (prune/reposition ordering bug).
    #[error("star field (parallax scale {parallax_scale}) has no stars to bound")]
    EmptyStarField { parallax_scale: f32 },

    /// Settings JSON could not be parsed.
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}
