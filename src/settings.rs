//! Game settings and tuning
//!
//! Preferences are persisted in LocalStorage on the web. Every gameplay
//! number lives in [`Tuning`] so a settings file can override it; the
//! defaults mirror [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Gameplay numbers read by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Timing (ms) ===
    pub collision_cooldown_ms: f64,
    pub projectile_expiration_ms: f64,
    pub primary_fire_buffer_ms: f64,

    // === Damage dealt by the impacting side ===
    pub damage_from_player: i32,
    pub damage_from_projectile: i32,
    pub damage_from_body: i32,

    // === Ship ===
    pub straight_thruster_force: f32,
    pub side_thruster_force: f32,
    pub turn_thruster_force: f32,
    pub strafe_thruster_offset: f32,
    pub turn_thruster_offset: f32,
    pub muzzle_velocity: f32,

    // === Turn PID ===
    pub pid_kp: f32,
    pub pid_ki: f32,
    pub pid_kd: f32,
    pub pid_dt: f32,

    // === Star fields ===
    pub star_chance: f64,
    pub starfield_buffer: i32,
    pub parallax_scale_near: f32,
    pub parallax_scale_far: f32,

    // === Camera ===
    pub free_look_speed_divisor: f32,

    // === Physics clock ===
    pub physics_dt: f32,
    pub max_substeps: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            collision_cooldown_ms: COLLISION_COOLDOWN_MS,
            projectile_expiration_ms: PROJECTILE_EXPIRATION_MS,
            primary_fire_buffer_ms: PRIMARY_FIRE_BUFFER_MS,

            damage_from_player: DAMAGE_FROM_PLAYER,
            damage_from_projectile: DAMAGE_FROM_PROJECTILE,
            damage_from_body: DAMAGE_FROM_BODY,

            straight_thruster_force: STRAIGHT_THRUSTER_FORCE,
            side_thruster_force: SIDE_THRUSTER_FORCE,
            turn_thruster_force: TURN_THRUSTER_FORCE,
            strafe_thruster_offset: STRAFE_THRUSTER_OFFSET,
            turn_thruster_offset: TURN_THRUSTER_OFFSET,
            muzzle_velocity: MUZZLE_VELOCITY,

            pid_kp: PID_KP,
            pid_ki: PID_KI,
            pid_kd: PID_KD,
            pid_dt: PID_DT,

            star_chance: STAR_CHANCE,
            starfield_buffer: STARFIELD_BUFFER,
            parallax_scale_near: PARALLAX_SCALE_NEAR,
            parallax_scale_far: PARALLAX_SCALE_FAR,

            free_look_speed_divisor: FREE_LOOK_SPEED_DIVISOR,

            physics_dt: PHYSICS_DT,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Draw physics body outlines over the sprites
    pub debug_wireframe: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    /// Fixed RNG seed; random per run when unset
    pub seed: Option<u64>,

    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_wireframe: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,
            seed: None,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "catfish_in_space_settings";

    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No {} store on native, using defaults", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let tuning = Tuning::default();
        assert_eq!(tuning.collision_cooldown_ms, 250.0);
        assert_eq!(tuning.projectile_expiration_ms, 10_000.0);
        assert_eq!(tuning.damage_from_player, 50);
        assert_eq!(tuning.damage_from_projectile, 10);
        assert_eq!(tuning.damage_from_body, 20);
        assert_eq!(tuning.starfield_buffer, 32);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{"debug_wireframe": true, "tuning": {"muzzle_velocity": 900.0}}"#)
                .unwrap();
        assert!(settings.debug_wireframe);
        assert_eq!(settings.tuning.muzzle_velocity, 900.0);
        assert_eq!(settings.tuning.pid_kp, PID_KP);
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings {
            seed: Some(7),
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(SimError::Settings(_))
        ));
    }
}
